//! Unit characteristics
//!
//! Stat names are a closed set: every read, modifier and condition names a
//! [`Stat`] or [`Attribute`] variant, so an unknown stat cannot slip through.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lowest (best) roll threshold a characteristic can reach
pub const BEST_ROLL: i32 = 2;
/// Highest (worst) roll threshold a characteristic can reach
pub const WORST_ROLL: i32 = 6;

/// A modifiable combat characteristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stat {
    Move,
    Wounds,
    Bravery,
    Save,
    Attacks,
    ToHit,
    ToWound,
    Rend,
    Damage,
}

impl Stat {
    /// All stats
    pub fn all() -> &'static [Stat] {
        &[
            Stat::Move,
            Stat::Wounds,
            Stat::Bravery,
            Stat::Save,
            Stat::Attacks,
            Stat::ToHit,
            Stat::ToWound,
            Stat::Rend,
            Stat::Damage,
        ]
    }

    /// Roll thresholds and rend: a smaller number is better, so a positive buff lowers them
    pub fn lower_is_better(&self) -> bool {
        matches!(self, Stat::Save | Stat::ToHit | Stat::ToWound | Stat::Rend)
    }

    /// Inclusive valid range of the stat. `max_wounds` bounds wounds.
    pub fn domain(&self, max_wounds: i32) -> (i32, i32) {
        match self {
            Stat::Save | Stat::ToHit | Stat::ToWound => (BEST_ROLL, WORST_ROLL),
            Stat::Wounds => (0, max_wounds),
            // Rend is a negative modifier to the defender's save
            Stat::Rend => (-WORST_ROLL, 0),
            Stat::Move | Stat::Bravery | Stat::Attacks | Stat::Damage => (1, i32::MAX),
        }
    }

    /// Apply a signed modifier to `base` and clamp into the stat's domain
    pub fn modify(&self, base: i32, delta: i32, max_wounds: i32) -> i32 {
        let raw = if self.lower_is_better() {
            base.saturating_sub(delta)
        } else {
            base.saturating_add(delta)
        };
        self.clamp_value(raw, max_wounds)
    }

    /// Clamp a raw value into the stat's domain
    pub fn clamp_value(&self, value: i32, max_wounds: i32) -> i32 {
        let (lo, hi) = self.domain(max_wounds);
        value.clamp(lo, hi.max(lo))
    }
}

impl FromStr for Stat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['_', '-', ' '], "").as_str() {
            "move" | "movement" => Ok(Stat::Move),
            "wounds" | "wound" => Ok(Stat::Wounds),
            "bravery" | "control" => Ok(Stat::Bravery),
            "save" => Ok(Stat::Save),
            "attacks" => Ok(Stat::Attacks),
            "tohit" | "hit" => Ok(Stat::ToHit),
            "towound" => Ok(Stat::ToWound),
            "rend" => Ok(Stat::Rend),
            "damage" => Ok(Stat::Damage),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Stat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Stat::Move => "move",
            Stat::Wounds => "wounds",
            Stat::Bravery => "bravery",
            Stat::Save => "save",
            Stat::Attacks => "attacks",
            Stat::ToHit => "to-hit",
            Stat::ToWound => "to-wound",
            Stat::Rend => "rend",
            Stat::Damage => "damage",
        };
        write!(f, "{}", s)
    }
}

/// Anything an ability condition can read off a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    Stat(Stat),
    MaxWounds,
    ModelCount,
    HasMoved,
    HasShot,
    HasCharged,
    HasFought,
    IsEngaged,
    IsHero,
    IsGeneral,
    IsWizard,
    IsPriest,
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Attribute::Stat(s) => write!(f, "{}", s),
            Attribute::MaxWounds => write!(f, "max wounds"),
            Attribute::ModelCount => write!(f, "model count"),
            Attribute::HasMoved => write!(f, "has moved"),
            Attribute::HasShot => write!(f, "has shot"),
            Attribute::HasCharged => write!(f, "has charged"),
            Attribute::HasFought => write!(f, "has fought"),
            Attribute::IsEngaged => write!(f, "engaged"),
            Attribute::IsHero => write!(f, "hero"),
            Attribute::IsGeneral => write!(f, "general"),
            Attribute::IsWizard => write!(f, "wizard"),
            Attribute::IsPriest => write!(f, "priest"),
        }
    }
}

/// Base characteristics from a warscroll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub move_inches: i32,
    pub wounds: i32,
    pub max_wounds: i32,
    pub bravery: i32,
    pub save: i32,
    pub attacks: i32,
    pub to_hit: i32,
    pub to_wound: i32,
    pub rend: i32,
    pub damage: i32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            move_inches: 6,
            wounds: 1,
            max_wounds: 1,
            bravery: 6,
            save: 4,
            attacks: 1,
            to_hit: 4,
            to_wound: 4,
            rend: 0,
            damage: 1,
        }
    }
}

impl Stats {
    /// Read a stat
    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Move => self.move_inches,
            Stat::Wounds => self.wounds,
            Stat::Bravery => self.bravery,
            Stat::Save => self.save,
            Stat::Attacks => self.attacks,
            Stat::ToHit => self.to_hit,
            Stat::ToWound => self.to_wound,
            Stat::Rend => self.rend,
            Stat::Damage => self.damage,
        }
    }

    /// Overwrite a stat, clamped to its domain
    pub fn set(&mut self, stat: Stat, value: i32) {
        let value = stat.clamp_value(value, self.max_wounds);
        match stat {
            Stat::Move => self.move_inches = value,
            Stat::Wounds => self.wounds = value,
            Stat::Bravery => self.bravery = value,
            Stat::Save => self.save = value,
            Stat::Attacks => self.attacks = value,
            Stat::ToHit => self.to_hit = value,
            Stat::ToWound => self.to_wound = value,
            Stat::Rend => self.rend = value,
            Stat::Damage => self.damage = value,
        }
    }

    /// Apply a signed modifier in place (lower-is-better stats improve on positive values)
    pub fn adjust(&mut self, stat: Stat, delta: i32) -> i32 {
        let value = stat.modify(self.get(stat), delta, self.max_wounds);
        self.set(stat, value);
        value
    }
}

/// Battlefield roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Roles {
    pub hero: bool,
    pub general: bool,
    pub wizard: bool,
    pub priest: bool,
}

/// Special models that can be part of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelRole {
    Champion,
    Musician,
    BannerBearer,
    SpecialWeapon,
}

impl std::fmt::Display for ModelRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ModelRole::Champion => "champion",
            ModelRole::Musician => "musician",
            ModelRole::BannerBearer => "banner bearer",
            ModelRole::SpecialWeapon => "special weapon bearer",
        };
        write!(f, "{}", s)
    }
}

/// Which special models a unit currently fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModelRoles {
    pub champion: bool,
    pub musician: bool,
    pub banner_bearer: bool,
    pub special_weapon: bool,
}

impl ModelRoles {
    pub fn has(&self, role: ModelRole) -> bool {
        match role {
            ModelRole::Champion => self.champion,
            ModelRole::Musician => self.musician,
            ModelRole::BannerBearer => self.banner_bearer,
            ModelRole::SpecialWeapon => self.special_weapon,
        }
    }
}
