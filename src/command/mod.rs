//! Command-point economy
//!
//! Provides:
//! - Per-player pools clamped to `[0, max]`
//! - Generation at the start of each player turn (base + per hero)
//! - A catalog of command abilities, each usable once per turn
//! - A change ledger for auditing
//!
//! Every failed check leaves the pool and the used ledger untouched.

mod catalog;

pub use catalog::{builtin_catalog, CommandAbility, CommandEffect, COMMAND_RANGE};

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::board::Board;
use crate::error::ActionError;
use crate::turn::{Phase, PlayerId};
use crate::units::{Roster, Unit};

/// Command point settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandPointConfig {
    /// Points a player starts the game with
    pub starting: u32,
    /// Pool cap
    pub max: u32,
    /// Points generated at the start of each own turn
    pub per_turn: u32,
    /// Extra points per friendly hero on the table
    pub per_hero: u32,
}

impl Default for CommandPointConfig {
    fn default() -> Self {
        Self {
            starting: 1,
            max: 3,
            per_turn: 1,
            per_hero: 1,
        }
    }
}

/// One player's pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerCommandPoints {
    pub current: u32,
    pub max: u32,
    pub generated_this_turn: u32,
    /// Command abilities already used this turn
    pub used_this_turn: BTreeSet<String>,
}

impl PlayerCommandPoints {
    fn new(starting: u32, max: u32) -> Self {
        Self {
            current: starting.min(max),
            max,
            generated_this_turn: 0,
            used_this_turn: BTreeSet::new(),
        }
    }
}

/// A change to a pool, for auditing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsChange {
    pub player: PlayerId,
    pub old: u32,
    pub new: u32,
    pub reason: String,
}

/// Result of a successful command ability use
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandActivation {
    pub player: PlayerId,
    pub ability: CommandAbility,
    pub change: PointsChange,
}

/// Command point manager: pools, catalog and ledger
#[derive(Debug, Clone)]
pub struct CommandPointManager {
    config: CommandPointConfig,
    pools: BTreeMap<PlayerId, PlayerCommandPoints>,
    catalog: Vec<CommandAbility>,
    ledger: Vec<PointsChange>,
}

impl Default for CommandPointManager {
    fn default() -> Self {
        Self::new(CommandPointConfig::default())
    }
}

impl CommandPointManager {
    /// Create a manager with the built-in catalog
    pub fn new(config: CommandPointConfig) -> Self {
        Self {
            config,
            pools: BTreeMap::new(),
            catalog: builtin_catalog(),
            ledger: Vec::new(),
        }
    }

    pub fn config(&self) -> &CommandPointConfig {
        &self.config
    }

    /// Create a player's pool at the configured starting value
    pub fn initialize_player(&mut self, player: PlayerId) {
        let pool = PlayerCommandPoints::new(self.config.starting, self.config.max);
        debug!("{} starts with {} command points", player, pool.current);
        self.pools.insert(player, pool);
    }

    pub fn pool(&self, player: PlayerId) -> Option<&PlayerCommandPoints> {
        self.pools.get(&player)
    }

    /// Current points (0 for an unknown player)
    pub fn points(&self, player: PlayerId) -> u32 {
        self.pools.get(&player).map_or(0, |p| p.current)
    }

    fn pool_mut(&mut self, player: PlayerId) -> Result<&mut PlayerCommandPoints, ActionError> {
        self.pools
            .get_mut(&player)
            .ok_or(ActionError::PlayerNotInitialized(player))
    }

    /// Start-of-turn generation: `min(per_turn + per_hero * heroes, max - current)`.
    /// Clears the player's used ledger. Returns the amount generated.
    pub fn on_turn_started(&mut self, player: PlayerId, heroes: u32) -> Result<u32, ActionError> {
        let per_turn = self.config.per_turn;
        let per_hero = self.config.per_hero;
        let Some(pool) = self.pools.get_mut(&player) else {
            warn!("No command point pool for {}", player);
            return Err(ActionError::PlayerNotInitialized(player));
        };

        let wanted = per_turn.saturating_add(per_hero.saturating_mul(heroes));
        let generated = wanted.min(pool.max.saturating_sub(pool.current));
        let old = pool.current;
        pool.current += generated;
        pool.generated_this_turn = generated;
        pool.used_this_turn.clear();
        let new = pool.current;

        info!(
            "{} generated {} command points ({} -> {})",
            player, generated, old, new
        );
        self.record(player, old, new, "turn start");
        Ok(generated)
    }

    /// Add points, clamped at the maximum
    pub fn increase_points(
        &mut self,
        player: PlayerId,
        amount: u32,
        source: &str,
    ) -> Result<PointsChange, ActionError> {
        let pool = self.pool_mut(player)?;
        let old = pool.current;
        pool.current = pool.current.saturating_add(amount).min(pool.max);
        let new = pool.current;
        debug!("{} gains command points: {} -> {} ({})", player, old, new, source);
        Ok(self.record(player, old, new, source))
    }

    /// Remove points, clamped at zero
    pub fn decrease_points(
        &mut self,
        player: PlayerId,
        amount: u32,
        source: &str,
    ) -> Result<PointsChange, ActionError> {
        let pool = self.pool_mut(player)?;
        let old = pool.current;
        pool.current = pool.current.saturating_sub(amount);
        let new = pool.current;
        debug!("{} loses command points: {} -> {} ({})", player, old, new, source);
        Ok(self.record(player, old, new, source))
    }

    /// Change a player's cap, lowering the pool if needed
    pub fn set_max_points(&mut self, player: PlayerId, max: u32) -> Result<(), ActionError> {
        let pool = self.pool_mut(player)?;
        pool.max = max;
        if pool.current > max {
            let old = pool.current;
            pool.current = max;
            self.record(player, old, max, "max lowered");
        }
        Ok(())
    }

    fn record(&mut self, player: PlayerId, old: u32, new: u32, reason: &str) -> PointsChange {
        let change = PointsChange {
            player,
            old,
            new,
            reason: reason.to_string(),
        };
        self.ledger.push(change.clone());
        change
    }

    /// Every recorded pool change, oldest first
    pub fn ledger(&self) -> &[PointsChange] {
        &self.ledger
    }

    pub fn catalog(&self) -> &[CommandAbility] {
        &self.catalog
    }

    pub fn ability(&self, name: &str) -> Option<&CommandAbility> {
        self.catalog.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Command abilities the player could afford and use in `phase`
    pub fn available_abilities(
        &self,
        player: PlayerId,
        phase: Phase,
        roster: &Roster,
    ) -> Vec<&CommandAbility> {
        let Some(pool) = self.pools.get(&player) else {
            return Vec::new();
        };
        self.catalog
            .iter()
            .filter(|c| {
                c.phase == phase
                    && self.cost_for(player, c, roster) <= pool.current
                    && !pool.used_this_turn.contains(&c.name)
            })
            .collect()
    }

    /// What `player` pays for `ability`; a hero's heroic trait can waive it
    pub fn cost_for(&self, player: PlayerId, ability: &CommandAbility, roster: &Roster) -> u32 {
        let waived = roster.heroes_of(player).any(|h| {
            h.heroic_trait
                .as_ref()
                .is_some_and(|t| t.waives(&ability.name))
        });
        if waived {
            0
        } else {
            ability.cost
        }
    }

    pub fn used_this_turn(&self, player: PlayerId) -> Vec<String> {
        self.pools
            .get(&player)
            .map(|p| p.used_this_turn.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Check every rule for using a command ability, without changing anything.
    ///
    /// With a target, it must be friendly and within range of one of the
    /// player's heroes.
    pub fn can_activate(
        &self,
        player: PlayerId,
        name: &str,
        phase: Phase,
        target: Option<&Unit>,
        roster: &Roster,
        board: &dyn Board,
    ) -> Result<&CommandAbility, ActionError> {
        let ability = self
            .ability(name)
            .ok_or_else(|| ActionError::UnknownAbility(name.to_string()))?;
        let pool = self
            .pools
            .get(&player)
            .ok_or(ActionError::PlayerNotInitialized(player))?;

        let cost = self.cost_for(player, ability, roster);
        if pool.current < cost {
            return Err(ActionError::InsufficientPoints {
                needed: cost,
                available: pool.current,
            });
        }
        if pool.used_this_turn.contains(&ability.name) {
            return Err(ActionError::AlreadyUsed {
                ability: ability.name.clone(),
            });
        }
        if phase != ability.phase {
            return Err(ActionError::WrongPhase {
                current: phase,
                allowed: vec![ability.phase],
            });
        }

        if let Some(target) = target {
            if target.owner != player {
                return Err(ActionError::InvalidTarget(format!(
                    "{} must target a friendly unit",
                    ability.name
                )));
            }
            let nearest = roster
                .heroes_of(player)
                .map(|h| board.distance(&h.position, &target.position))
                .min_by(|a, b| a.total_cmp(b))
                .ok_or_else(|| {
                    ActionError::InvalidTarget(format!("{} has no hero on the table", player))
                })?;
            if nearest > board.from_inches(ability.range) {
                return Err(ActionError::OutOfRange {
                    distance: board.to_inches(nearest),
                    range: ability.range,
                });
            }
            if !ability.effect.accepts(target) {
                return Err(ActionError::Engaged(target.id));
            }
        }

        Ok(ability)
    }

    /// Validate, debit the cost and mark the ability used.
    /// Applying its effect is up to the caller.
    pub fn activate(
        &mut self,
        player: PlayerId,
        name: &str,
        phase: Phase,
        target: Option<&Unit>,
        roster: &Roster,
        board: &dyn Board,
    ) -> Result<CommandActivation, ActionError> {
        let ability = match self.can_activate(player, name, phase, target, roster, board) {
            Ok(a) => a.clone(),
            Err(e) => {
                debug!("{} cannot use {}: {}", player, name, e);
                return Err(e);
            }
        };

        let cost = self.cost_for(player, &ability, roster);
        let pool = self.pool_mut(player)?;
        let old = pool.current;
        pool.current -= cost;
        pool.used_this_turn.insert(ability.name.clone());
        let new = pool.current;

        info!(
            "{} used {} ({} -> {} command points)",
            player, ability.name, old, new
        );
        let change = self.record(player, old, new, &ability.name);
        Ok(CommandActivation {
            player,
            ability,
            change,
        })
    }

    /// Forget every pool and the ledger
    pub fn reset_for_new_game(&mut self) {
        self.pools.clear();
        self.ledger.clear();
    }
}
