//! Unit and model ability definitions

use serde::{Deserialize, Serialize};

use super::condition::AbilityCondition;
use super::effect::AbilityEffect;
use crate::turn::Phase;
use crate::units::ModelRole;

/// How an ability comes into play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AbilityCategory {
    /// Always on; permanent self modifiers fold into effective stats
    #[default]
    Passive,
    /// Must be activated
    Active,
    /// Triggered in response to an event
    Reactive,
}

/// An ability bound to a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: AbilityCategory,
    /// Phases in which it may be activated
    #[serde(default)]
    pub phases: Vec<Phase>,
    /// Range in inches (0 = self only, no range check)
    #[serde(default)]
    pub range: f32,
    /// 0 = reusable; otherwise once per turn
    #[serde(default)]
    pub cooldown: u32,
    /// Usable once in the whole game
    #[serde(default)]
    pub once_per_battle: bool,
    #[serde(default)]
    pub used_this_turn: bool,
    #[serde(default)]
    pub used_this_game: bool,
    #[serde(default)]
    pub effects: Vec<AbilityEffect>,
    #[serde(default)]
    pub conditions: Vec<AbilityCondition>,
}

impl Ability {
    pub fn new(name: &str, category: AbilityCategory) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            category,
            phases: Vec::new(),
            range: 0.0,
            cooldown: 0,
            once_per_battle: false,
            used_this_turn: false,
            used_this_game: false,
            effects: Vec::new(),
            conditions: Vec::new(),
        }
    }

    pub fn passive(name: &str) -> Self {
        Self::new(name, AbilityCategory::Passive)
    }

    pub fn active(name: &str) -> Self {
        Self::new(name, AbilityCategory::Active)
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn in_phases(mut self, phases: &[Phase]) -> Self {
        self.phases = phases.to_vec();
        self
    }

    pub fn with_range(mut self, inches: f32) -> Self {
        self.range = inches;
        self
    }

    pub fn with_cooldown(mut self, cooldown: u32) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn once_per_battle(mut self) -> Self {
        self.once_per_battle = true;
        self
    }

    pub fn with_effect(mut self, effect: AbilityEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_condition(mut self, condition: AbilityCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn usable_in(&self, phase: Phase) -> bool {
        self.phases.contains(&phase)
    }

    /// Used this turn and subject to a cooldown, or spent for the game
    pub fn on_cooldown(&self) -> bool {
        (self.used_this_turn && self.cooldown > 0) || (self.once_per_battle && self.used_this_game)
    }

    /// Record a successful activation
    pub fn mark_used(&mut self) {
        self.used_this_turn = true;
        if self.cooldown > 0 || self.once_per_battle {
            self.used_this_game = true;
        }
    }

    pub fn reset_turn(&mut self) {
        self.used_this_turn = false;
    }

    pub fn reset_game(&mut self) {
        self.used_this_turn = false;
        self.used_this_game = false;
    }
}

/// An ability carried by a special model within a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelAbility {
    #[serde(flatten)]
    pub ability: Ability,
    /// Model the unit must field for the ability to work
    pub requires: ModelRole,
    /// How many models can use it
    #[serde(default = "one")]
    pub model_count: u32,
}

fn one() -> u32 {
    1
}

impl ModelAbility {
    pub fn new(ability: Ability, requires: ModelRole) -> Self {
        Self {
            ability,
            requires,
            model_count: 1,
        }
    }
}
