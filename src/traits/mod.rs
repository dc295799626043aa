//! Heroic traits
//!
//! A hero may carry one trait from its own faction. A trait can:
//! - add permanent stat modifiers (folded into effective stats)
//! - grant rules
//! - give the hero an extra ability, run through the ability engine
//! - waive the cost of one command ability for its owner

mod catalog;

pub use catalog::builtin_traits;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::abilities::Ability;
use crate::error::ActionError;
use crate::units::{Rule, Stat, Unit};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeroicTrait {
    pub name: String,
    pub faction: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requires_general: bool,
    #[serde(default)]
    pub modifiers: BTreeMap<Stat, i32>,
    #[serde(default)]
    pub rules: BTreeSet<Rule>,
    /// Added to the hero's unit abilities while the trait is held
    #[serde(default)]
    pub ability: Option<Ability>,
    /// Command ability the owner may use for free
    #[serde(default)]
    pub free_command: Option<String>,
}

impl HeroicTrait {
    pub fn new(name: &str, faction: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            faction: faction.to_string(),
            description: description.to_string(),
            requires_general: false,
            modifiers: BTreeMap::new(),
            rules: BTreeSet::new(),
            ability: None,
            free_command: None,
        }
    }

    pub fn general_only(mut self) -> Self {
        self.requires_general = true;
        self
    }

    pub fn with_modifier(mut self, stat: Stat, value: i32) -> Self {
        *self.modifiers.entry(stat).or_default() += value;
        self
    }

    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.insert(rule);
        self
    }

    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.ability = Some(ability);
        self
    }

    pub fn waiving(mut self, command: &str) -> Self {
        self.free_command = Some(command.to_string());
        self
    }

    pub fn modifier(&self, stat: Stat) -> i32 {
        self.modifiers.get(&stat).copied().unwrap_or(0)
    }

    /// Whether the trait makes `command` free
    pub fn waives(&self, command: &str) -> bool {
        self.free_command
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(command))
    }
}

/// The traits heroes can choose from
#[derive(Debug, Clone)]
pub struct TraitCatalog {
    traits: Vec<HeroicTrait>,
}

impl Default for TraitCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TraitCatalog {
    /// Catalog holding the built-in traits
    pub fn new() -> Self {
        Self::with_traits(builtin_traits())
    }

    pub fn with_traits(traits: Vec<HeroicTrait>) -> Self {
        Self { traits }
    }

    pub fn all(&self) -> &[HeroicTrait] {
        &self.traits
    }

    pub fn get(&self, name: &str) -> Option<&HeroicTrait> {
        self.traits.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    pub fn for_faction(&self, faction: &str) -> Vec<&HeroicTrait> {
        self.traits.iter().filter(|t| t.faction == faction).collect()
    }
}

fn refuse(heroic: &HeroicTrait, reason: String) -> ActionError {
    ActionError::TraitNotAllowed {
        name: heroic.name.clone(),
        reason,
    }
}

/// Check that `unit` may take `heroic`: same faction, a hero, the general
/// when required, and no trait yet
pub fn can_take(unit: &Unit, heroic: &HeroicTrait) -> Result<(), ActionError> {
    if unit.faction != heroic.faction {
        return Err(refuse(
            heroic,
            format!("{} is not {}", unit.name, heroic.faction),
        ));
    }
    if !unit.is_hero() {
        return Err(refuse(heroic, format!("{} is not a hero", unit.name)));
    }
    if heroic.requires_general && !unit.roles.general {
        return Err(refuse(heroic, format!("{} is not the general", unit.name)));
    }
    if let Some(held) = &unit.heroic_trait {
        return Err(refuse(
            heroic,
            format!("{} already has {}", unit.name, held.name),
        ));
    }
    Ok(())
}

/// Give the trait to the unit
pub fn apply_trait(unit: &mut Unit, heroic: &HeroicTrait) -> Result<(), ActionError> {
    can_take(unit, heroic)?;
    if let Some(ability) = &heroic.ability {
        unit.add_unit_ability(ability.clone());
    }
    unit.heroic_trait = Some(heroic.clone());
    info!("{} takes the heroic trait {}", unit.name, heroic.name);
    Ok(())
}

/// Take the unit's trait away, with the ability it granted
pub fn remove_trait(unit: &mut Unit) -> Option<HeroicTrait> {
    let heroic = unit.heroic_trait.take()?;
    if let Some(ability) = &heroic.ability {
        unit.remove_unit_ability(&ability.name);
    }
    debug!("{} loses the heroic trait {}", unit.name, heroic.name);
    Some(heroic)
}
