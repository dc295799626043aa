//! Combat system module
//!
//! Implements the attack sequence:
//! - Injectable dice sources
//! - Staged rolls: hit -> wound -> save (with rend)
//! - Damage with per-point ward saves, healing
//! - Rally rolls

mod damage;
mod dice;
mod rally;
mod resolution;

pub use damage::{heal, take_damage, ward_saves, DamageOutcome};
pub use dice::{
    combat_roll, modified_save, roll_saves, roll_to_hit, roll_to_wound, successes, CombatRoll,
    DiceSource, RandomDice, ScriptedDice, StageRoll,
};
pub use rally::{rally_roll, RallyRoll, RALLY_DICE, RALLY_THRESHOLD};
pub use resolution::{resolve_attack, AttackProfile, CombatResult};
