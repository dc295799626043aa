//! The unit: the central game entity

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::stats::{ModelRoles, Roles, Stat, Stats};
use crate::abilities::{Ability, ModelAbility};
use crate::effects::{EffectStore, EffectTarget};
use crate::traits::HeroicTrait;
use crate::turn::PlayerId;

/// Millimetres per inch, for base sizes
pub const MM_PER_INCH: f32 = 25.4;

/// Maximum charge bonus added to move (inches)
pub const CHARGE_BONUS_INCHES: i32 = 6;

/// Unit identifier, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(pub u32);

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A point on the table, in board units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Straight-line distance
    pub fn distance_to(&self, other: &Position) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Point `distance` away from `self` in the direction of `toward`
    pub fn toward(&self, toward: &Position, distance: f32) -> Position {
        let len = self.distance_to(toward);
        if len <= f32::EPSILON {
            return *self;
        }
        Position {
            x: self.x + (toward.x - self.x) / len * distance,
            y: self.y + (toward.y - self.y) / len * distance,
        }
    }
}

/// A weapon profile; its values replace the unit's own when used
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub attacks: i32,
    pub to_hit: i32,
    pub to_wound: i32,
    #[serde(default)]
    pub rend: i32,
    pub damage: i32,
    /// Range in inches; 0 for melee
    #[serde(default)]
    pub range: f32,
}

impl Weapon {
    pub fn is_ranged(&self) -> bool {
        self.range > 0.0
    }
}

/// Movement-related rules an ability can grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MovementFlag {
    Fly,
    RunAndCharge,
    RunAndShoot,
    ExtraMove,
}

/// Combat-related rules an ability can grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CombatFlag {
    FightsFirst,
    FightsLast,
    IgnoreCover,
    ExtraCharge,
}

/// Morale-related rules an ability can grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MoraleFlag {
    IgnoreBattleshock,
}

/// Rules that fit no other category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SpecialFlag {
    /// Ward save on the given roll
    Ward(u8),
    Regeneration,
    Ethereal,
    Wizard,
}

/// A rule held by a unit, permanently or through a temporary effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rule {
    Movement(MovementFlag),
    Combat(CombatFlag),
    Morale(MoraleFlag),
    Special(SpecialFlag),
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::Movement(m) => write!(f, "{:?}", m),
            Rule::Combat(c) => write!(f, "{:?}", c),
            Rule::Morale(m) => write!(f, "{:?}", m),
            Rule::Special(SpecialFlag::Ward(v)) => write!(f, "Ward ({}+)", v),
            Rule::Special(s) => write!(f, "{:?}", s),
        }
    }
}

/// Per-turn action flags, cleared at the start of every player turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionFlags {
    pub has_moved: bool,
    pub has_shot: bool,
    pub has_charged: bool,
    pub has_fought: bool,
}

/// A unit on the battlefield
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub owner: PlayerId,
    pub faction: String,
    pub stats: Stats,
    pub roles: Roles,
    pub models: ModelRoles,
    pub model_count: u32,
    /// Base diameter in millimetres
    pub base_size_mm: f32,
    pub position: Position,
    pub actions: ActionFlags,
    pub engaged: bool,
    /// Ward save threshold (0 = none)
    pub ward: u8,
    pub weapons: Vec<Weapon>,
    /// Rules granted permanently (by template or permanent ability effects)
    pub rules: BTreeSet<Rule>,
    pub effects: EffectStore,
    pub unit_abilities: Vec<Ability>,
    pub model_abilities: Vec<ModelAbility>,
    /// At most one, heroes only
    #[serde(default)]
    pub heroic_trait: Option<HeroicTrait>,
}

impl Unit {
    /// Create a unit with default characteristics
    pub fn new(id: UnitId, name: &str, owner: PlayerId) -> Self {
        Self {
            id,
            name: name.to_string(),
            owner,
            faction: String::new(),
            stats: Stats::default(),
            roles: Roles::default(),
            models: ModelRoles::default(),
            model_count: 1,
            base_size_mm: 32.0,
            position: Position::default(),
            actions: ActionFlags::default(),
            engaged: false,
            ward: 0,
            weapons: Vec::new(),
            rules: BTreeSet::new(),
            effects: EffectStore::new(),
            unit_abilities: Vec::new(),
            model_abilities: Vec::new(),
            heroic_trait: None,
        }
    }

    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn is_hero(&self) -> bool {
        self.roles.hero
    }

    pub fn is_destroyed(&self) -> bool {
        self.stats.wounds <= 0
    }

    pub fn is_friendly_to(&self, other: &Unit) -> bool {
        self.owner == other.owner
    }

    /// Base diameter in inches
    pub fn base_size_inches(&self) -> f32 {
        self.base_size_mm / MM_PER_INCH
    }

    /// Base size + 1" for melee
    pub fn engagement_range_inches(&self) -> f32 {
        self.base_size_inches() + 1.0
    }

    /// Whether the two units are close enough to fight (board units are
    /// converted by the caller; this compares in inches)
    pub fn within_engagement(&self, other: &Unit, distance_inches: f32) -> bool {
        distance_inches <= self.engagement_range_inches() + other.engagement_range_inches()
    }

    /// Maximum charge distance: move + 6"
    pub fn charge_range_inches(&self, effective_move: i32) -> i32 {
        effective_move + CHARGE_BONUS_INCHES
    }

    pub fn weapon(&self, name: &str) -> Option<&Weapon> {
        self.weapons.iter().find(|w| w.name.eq_ignore_ascii_case(name))
    }

    /// Whether the rule is held permanently, through the heroic trait or
    /// through an active effect
    pub fn has_rule(&self, rule: Rule) -> bool {
        self.rules.contains(&rule)
            || self.heroic_trait.as_ref().is_some_and(|t| t.rules.contains(&rule))
            || self.effects.grants(rule)
    }

    /// Grant or revoke a rule permanently. A ward rule sets the ward threshold.
    pub fn set_rule(&mut self, rule: Rule, enabled: bool) {
        if let Rule::Special(SpecialFlag::Ward(value)) = rule {
            self.ward = if enabled { value } else { 0 };
            return;
        }
        if enabled {
            self.rules.insert(rule);
        } else {
            self.rules.remove(&rule);
        }
    }

    /// Best ward save available, from the unit itself or a temporary grant
    pub fn ward_threshold(&self) -> Option<u8> {
        let granted = self.effects.iter().filter_map(|e| match e.target {
            EffectTarget::Rule(Rule::Special(SpecialFlag::Ward(v))) if e.value > 0 => Some(v),
            _ => None,
        });
        std::iter::once(self.ward)
            .chain(granted)
            .filter(|w| *w > 0)
            .min()
    }

    pub fn unit_ability(&self, name: &str) -> Option<&Ability> {
        self.unit_abilities.iter().find(|a| a.name == name)
    }

    pub fn unit_ability_mut(&mut self, name: &str) -> Option<&mut Ability> {
        self.unit_abilities.iter_mut().find(|a| a.name == name)
    }

    pub fn model_ability(&self, name: &str) -> Option<&ModelAbility> {
        self.model_abilities.iter().find(|a| a.ability.name == name)
    }

    pub fn model_ability_mut(&mut self, name: &str) -> Option<&mut ModelAbility> {
        self.model_abilities
            .iter_mut()
            .find(|a| a.ability.name == name)
    }

    /// Add a unit ability (ignored if one with the same name exists)
    pub fn add_unit_ability(&mut self, ability: Ability) {
        if self.unit_ability(&ability.name).is_none() {
            self.unit_abilities.push(ability);
        }
    }

    pub fn remove_unit_ability(&mut self, name: &str) {
        self.unit_abilities.retain(|a| a.name != name);
    }

    /// Add a model ability (ignored if one with the same name exists)
    pub fn add_model_ability(&mut self, ability: ModelAbility) {
        if self.model_ability(&ability.ability.name).is_none() {
            self.model_abilities.push(ability);
        }
    }

    pub fn remove_model_ability(&mut self, name: &str) {
        self.model_abilities.retain(|a| a.ability.name != name);
    }

    /// Clear per-turn action flags and per-turn ability use
    pub fn reset_turn_actions(&mut self) {
        self.actions = ActionFlags::default();
        for ability in &mut self.unit_abilities {
            ability.reset_turn();
        }
        for ability in &mut self.model_abilities {
            ability.ability.reset_turn();
        }
    }

    /// Clear every use record, including per-game
    pub fn reset_game(&mut self) {
        self.reset_turn_actions();
        for ability in &mut self.unit_abilities {
            ability.reset_game();
        }
        for ability in &mut self.model_abilities {
            ability.ability.reset_game();
        }
    }

    /// Base value of a stat
    pub fn base(&self, stat: Stat) -> i32 {
        self.stats.get(stat)
    }
}
