//! Units and their characteristics
//!
//! - [`Stats`] and the closed [`Stat`] set
//! - [`Unit`]: identity, roles, per-turn flags, effects and abilities
//! - [`UnitTemplate`]: the catalog's shape of a unit
//! - [`Roster`]: every live unit of a session

mod roster;
mod stats;
mod template;
mod unit;

pub use roster::Roster;
pub use stats::{Attribute, ModelRole, ModelRoles, Roles, Stat, Stats, BEST_ROLL, WORST_ROLL};
pub use template::UnitTemplate;
pub use unit::{
    ActionFlags, CombatFlag, MoraleFlag, MovementFlag, Position, Rule, SpecialFlag, Unit, UnitId,
    Weapon, CHARGE_BONUS_INCHES, MM_PER_INCH,
};
