//! Attack resolution
//!
//! Turns an attacker/defender pair into a [`CombatResult`] using effective
//! stats. A weapon's values replace the attacker's own before modifiers fold in.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::dice::{combat_roll, modified_save, CombatRoll, DiceSource};
use crate::effects::{effective, effective_from};
use crate::units::{Stat, Unit, UnitId, Weapon};

/// The attacker's effective numbers for one attack sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackProfile {
    pub weapon: Option<String>,
    pub attacks: i32,
    pub to_hit: i32,
    pub to_wound: i32,
    pub rend: i32,
    pub damage: i32,
}

impl AttackProfile {
    /// Resolve the attacker's effective profile, optionally through a weapon
    pub fn of(attacker: &Unit, weapon: Option<&Weapon>) -> Self {
        let base = |stat: Stat, weapon_value: Option<i32>| match weapon_value {
            Some(v) => effective_from(attacker, stat, v),
            None => effective(attacker, stat),
        };
        Self {
            weapon: weapon.map(|w| w.name.clone()),
            attacks: base(Stat::Attacks, weapon.map(|w| w.attacks)),
            to_hit: base(Stat::ToHit, weapon.map(|w| w.to_hit)),
            to_wound: base(Stat::ToWound, weapon.map(|w| w.to_wound)),
            rend: base(Stat::Rend, weapon.map(|w| w.rend)),
            damage: base(Stat::Damage, weapon.map(|w| w.damage)),
        }
    }
}

/// Outcome of one attack sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatResult {
    pub attacker: UnitId,
    pub defender: UnitId,
    pub profile: AttackProfile,
    /// Defender's effective save before rend
    pub save: i32,
    /// Save actually rolled against
    pub modified_save: i32,
    pub roll: CombatRoll,
    /// Unsaved wounds x damage characteristic
    pub damage: i32,
}

impl CombatResult {
    pub fn hits(&self) -> u32 {
        self.roll.hits
    }

    pub fn wounds(&self) -> u32 {
        self.roll.wounds
    }

    pub fn saved(&self) -> u32 {
        self.roll.saved
    }

    pub fn unsaved(&self) -> u32 {
        self.roll.unsaved
    }
}

/// Resolve an attack without applying it
pub fn resolve_attack(
    attacker: &Unit,
    defender: &Unit,
    weapon: Option<&Weapon>,
    dice: &mut dyn DiceSource,
) -> CombatResult {
    let profile = AttackProfile::of(attacker, weapon);
    let save = effective(defender, Stat::Save);

    let roll = combat_roll(
        dice,
        profile.attacks.max(0) as u32,
        profile.to_hit,
        profile.to_wound,
        save,
        profile.rend,
    );
    let damage = roll.unsaved as i32 * profile.damage;

    debug!(
        "{} attacks {}: {} hits, {} wounds, {} saved, {} damage",
        attacker.name, defender.name, roll.hits, roll.wounds, roll.saved, damage
    );

    CombatResult {
        attacker: attacker.id,
        defender: defender.id,
        modified_save: modified_save(save, profile.rend),
        profile,
        save,
        roll,
        damage,
    }
}
