//! Damage and healing
//!
//! Handles the damage pipeline of a single unit:
//! - Ward saves, rolled once per point of incoming damage
//! - Wound loss clamped at 0
//! - Healing clamped at max wounds
//!
//! Removing a destroyed unit is the roster's job.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::dice::DiceSource;
use crate::units::{Stat, Unit, UnitId};

/// Result of damage applied to a unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageOutcome {
    pub unit: UnitId,
    /// Damage before ward saves
    pub incoming: i32,
    /// Points stopped by ward saves
    pub prevented: i32,
    /// Wounds actually removed
    pub applied: i32,
    pub ward_rolls: Vec<u32>,
    pub wounds_remaining: i32,
    pub destroyed: bool,
}

/// Roll one ward save per point of damage, returning (prevented, rolls)
pub fn ward_saves(dice: &mut dyn DiceSource, amount: i32, threshold: u8) -> (i32, Vec<u32>) {
    if threshold == 0 || amount <= 0 {
        return (0, Vec::new());
    }
    let rolls = dice.roll_many(amount as u32, 6);
    let prevented = rolls.iter().filter(|&&r| r >= threshold as u32).count() as i32;
    (prevented, rolls)
}

/// Apply damage to a unit: ward saves first, then wound loss
pub fn take_damage(unit: &mut Unit, amount: i32, dice: &mut dyn DiceSource) -> DamageOutcome {
    let amount = amount.max(0);
    let (prevented, ward_rolls) = match unit.ward_threshold() {
        Some(threshold) => ward_saves(dice, amount, threshold),
        None => (0, Vec::new()),
    };

    if prevented > 0 {
        debug!("{}: ward save prevented {} damage", unit.name, prevented);
    }

    let before = unit.stats.wounds;
    let remaining = unit.stats.adjust(Stat::Wounds, -(amount - prevented));

    DamageOutcome {
        unit: unit.id,
        incoming: amount,
        prevented,
        applied: before - remaining,
        ward_rolls,
        wounds_remaining: remaining,
        destroyed: remaining == 0,
    }
}

/// Restore wounds up to the maximum, returning how many were restored
pub fn heal(unit: &mut Unit, amount: i32) -> i32 {
    let before = unit.stats.wounds;
    let after = unit.stats.adjust(Stat::Wounds, amount.max(0));
    after - before
}
