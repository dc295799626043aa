//! Live units of a session

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::unit::{Unit, UnitId};
use crate::combat::{self, DamageOutcome, DiceSource};
use crate::effects::TemporaryEffect;
use crate::error::ActionError;
use crate::turn::{Phase, PlayerId};

/// Every unit still on the table. Destroyed units are removed; only their
/// ids are remembered so lookups can say why they failed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    units: BTreeMap<UnitId, Unit>,
    destroyed: BTreeSet<UnitId>,
    next_id: u32,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an id for a unit about to be created
    pub fn next_id(&mut self) -> UnitId {
        self.next_id += 1;
        UnitId(self.next_id)
    }

    /// Add a unit under its own id
    pub fn insert(&mut self, unit: Unit) -> UnitId {
        let id = unit.id;
        self.next_id = self.next_id.max(id.0);
        debug!("Unit {} ({}) joins for {}", id, unit.name, unit.owner);
        self.units.insert(id, unit);
        id
    }

    pub fn get(&self, id: UnitId) -> Result<&Unit, ActionError> {
        self.units.get(&id).ok_or_else(|| self.missing(id))
    }

    pub fn get_mut(&mut self, id: UnitId) -> Result<&mut Unit, ActionError> {
        if self.destroyed.contains(&id) {
            return Err(ActionError::UnitDestroyed(id));
        }
        self.units.get_mut(&id).ok_or(ActionError::UnknownUnit(id))
    }

    fn missing(&self, id: UnitId) -> ActionError {
        if self.destroyed.contains(&id) {
            ActionError::UnitDestroyed(id)
        } else {
            ActionError::UnknownUnit(id)
        }
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.units.contains_key(&id)
    }

    pub fn is_destroyed(&self, id: UnitId) -> bool {
        self.destroyed.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Unit> {
        self.units.values_mut()
    }

    pub fn units_of(&self, player: PlayerId) -> impl Iterator<Item = &Unit> {
        self.units.values().filter(move |u| u.owner == player)
    }

    pub fn heroes_of(&self, player: PlayerId) -> impl Iterator<Item = &Unit> {
        self.units_of(player).filter(|u| u.is_hero())
    }

    pub fn hero_count(&self, player: PlayerId) -> u32 {
        self.heroes_of(player).count() as u32
    }

    /// Run the damage pipeline on a unit, removing it if destroyed
    pub fn take_damage(
        &mut self,
        id: UnitId,
        amount: i32,
        dice: &mut dyn DiceSource,
    ) -> Result<DamageOutcome, ActionError> {
        let unit = self.get_mut(id)?;
        let outcome = combat::take_damage(unit, amount, dice);
        debug!(
            "{} takes {} damage ({} prevented), {} wounds left",
            unit.name, outcome.applied, outcome.prevented, outcome.wounds_remaining
        );
        if outcome.destroyed {
            self.destroy(id);
        }
        Ok(outcome)
    }

    /// Restore wounds, returning how many were restored
    pub fn heal(&mut self, id: UnitId, amount: i32) -> Result<i32, ActionError> {
        let unit = self.get_mut(id)?;
        Ok(combat::heal(unit, amount))
    }

    /// Remove a unit from play
    pub fn destroy(&mut self, id: UnitId) -> Option<Unit> {
        let unit = self.units.remove(&id)?;
        self.destroyed.insert(id);
        info!("Unit {} ({}) destroyed", id, unit.name);
        Some(unit)
    }

    /// Expire every unit's effects that end on entry into `phase`
    pub fn sweep_effects(&mut self, phase: Phase) -> Vec<(UnitId, TemporaryEffect)> {
        let mut expired = Vec::new();
        for unit in self.units.values_mut() {
            for effect in unit.effects.sweep(phase) {
                debug!("Effect {} expired on {}", effect.name, unit.name);
                expired.push((unit.id, effect));
            }
        }
        expired
    }

    /// Clear per-turn action flags and ability use on every unit
    pub fn reset_turn_actions(&mut self) {
        for unit in self.units.values_mut() {
            unit.reset_turn_actions();
        }
    }

    /// Clear per-game ability use on every unit
    pub fn reset_game(&mut self) {
        for unit in self.units.values_mut() {
            unit.reset_game();
        }
    }
}
