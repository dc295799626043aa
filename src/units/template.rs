//! Unit templates handed over by the army catalog
//!
//! A template is read once when the unit is created; the engine never looks
//! at it again.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::stats::{ModelRoles, Roles, Stats};
use super::unit::{Position, Rule, Unit, UnitId, Weapon};
use crate::abilities::{Ability, ModelAbility};
use crate::turn::PlayerId;

fn default_models() -> u32 {
    1
}

fn default_base() -> f32 {
    32.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitTemplate {
    pub name: String,
    #[serde(default)]
    pub faction: String,
    #[serde(default)]
    pub stats: Stats,
    #[serde(default)]
    pub roles: Roles,
    #[serde(default = "default_base")]
    pub base_size_mm: f32,
    #[serde(default = "default_models")]
    pub model_count: u32,
    #[serde(default)]
    pub models: ModelRoles,
    #[serde(default)]
    pub ward: u8,
    #[serde(default)]
    pub weapons: Vec<Weapon>,
    #[serde(default)]
    pub rules: BTreeSet<Rule>,
    #[serde(default)]
    pub unit_abilities: Vec<Ability>,
    #[serde(default)]
    pub model_abilities: Vec<ModelAbility>,
}

impl UnitTemplate {
    pub fn new(name: &str, stats: Stats) -> Self {
        Self {
            name: name.to_string(),
            faction: String::new(),
            stats,
            roles: Roles::default(),
            base_size_mm: default_base(),
            model_count: 1,
            models: ModelRoles::default(),
            ward: 0,
            weapons: Vec::new(),
            rules: BTreeSet::new(),
            unit_abilities: Vec::new(),
            model_abilities: Vec::new(),
        }
    }

    /// Create a live unit from this template, starting at full wounds
    pub fn instantiate(&self, id: UnitId, owner: PlayerId, position: Position) -> Unit {
        let mut unit = Unit::new(id, &self.name, owner);
        unit.faction = self.faction.clone();
        unit.stats = self.stats.clone();
        unit.stats.wounds = unit.stats.max_wounds;
        unit.roles = self.roles;
        unit.base_size_mm = self.base_size_mm;
        unit.model_count = self.model_count;
        unit.models = self.models;
        unit.ward = self.ward;
        unit.weapons = self.weapons.clone();
        unit.rules = self.rules.clone();
        unit.position = position;
        for ability in &self.unit_abilities {
            unit.add_unit_ability(ability.clone());
        }
        for ability in &self.model_abilities {
            unit.add_model_ability(ability.clone());
        }
        unit
    }
}
