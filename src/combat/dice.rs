//! Dice rolling system
//!
//! - Injectable dice sources (entropy, seeded, scripted)
//! - Staged combat rolls: hit -> wound -> save
//!
//! Every roll is uniform over `[1, sides]` and thresholds are inclusive.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::units::BEST_ROLL;

/// Source of die results
pub trait DiceSource {
    /// Roll one die with `sides` faces
    fn roll(&mut self, sides: u32) -> u32;

    fn d6(&mut self) -> u32 {
        self.roll(6)
    }

    /// Roll `count` dice, keeping each result
    fn roll_many(&mut self, count: u32, sides: u32) -> Vec<u32> {
        (0..count).map(|_| self.roll(sides)).collect()
    }
}

/// Pseudo-random dice, seeded from the OS or a fixed seed
#[derive(Debug, Clone)]
pub struct RandomDice {
    rng: StdRng,
}

impl RandomDice {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic sequence for a seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomDice {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl DiceSource for RandomDice {
    fn roll(&mut self, sides: u32) -> u32 {
        self.rng.random_range(1..=sides.max(1))
    }
}

/// Replays a fixed sequence of results, for tests and replays
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    rolls: VecDeque<u32>,
}

impl ScriptedDice {
    pub fn new(rolls: impl IntoIterator<Item = u32>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
        }
    }

    /// Queue more results
    pub fn push(&mut self, rolls: impl IntoIterator<Item = u32>) {
        self.rolls.extend(rolls);
    }

    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl DiceSource for ScriptedDice {
    fn roll(&mut self, sides: u32) -> u32 {
        match self.rolls.pop_front() {
            Some(r) => r.clamp(1, sides.max(1)),
            None => {
                warn!("Scripted dice exhausted, rolling 1");
                1
            }
        }
    }
}

/// The results meeting or beating `threshold`
pub fn successes(rolls: &[u32], threshold: i32) -> Vec<u32> {
    rolls
        .iter()
        .copied()
        .filter(|&r| r as i32 >= threshold)
        .collect()
}

/// One stage of a combat roll
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRoll {
    pub rolls: Vec<u32>,
    pub threshold: i32,
    pub passed: u32,
}

impl StageRoll {
    fn roll(dice: &mut dyn DiceSource, count: u32, threshold: i32) -> Self {
        let rolls = dice.roll_many(count, 6);
        let passed = successes(&rolls, threshold).len() as u32;
        Self {
            rolls,
            threshold,
            passed,
        }
    }
}

/// Roll one die per attack; each result at or above `to_hit` is a hit
pub fn roll_to_hit(dice: &mut dyn DiceSource, attacks: u32, to_hit: i32) -> StageRoll {
    StageRoll::roll(dice, attacks, to_hit)
}

/// Roll one die per hit; each result at or above `to_wound` is a wound
pub fn roll_to_wound(dice: &mut dyn DiceSource, hits: u32, to_wound: i32) -> StageRoll {
    StageRoll::roll(dice, hits, to_wound)
}

/// Save threshold after rend: `max(2, save - rend)`
pub fn modified_save(save: i32, rend: i32) -> i32 {
    (save - rend).max(BEST_ROLL)
}

/// Roll one die per wound against the rend-modified save
pub fn roll_saves(dice: &mut dyn DiceSource, wounds: u32, save: i32, rend: i32) -> StageRoll {
    StageRoll::roll(dice, wounds, modified_save(save, rend))
}

/// All three stages of an attack sequence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatRoll {
    pub attacks: u32,
    pub hits: u32,
    pub wounds: u32,
    pub saved: u32,
    pub unsaved: u32,
    pub hit_roll: StageRoll,
    pub wound_roll: StageRoll,
    pub save_roll: StageRoll,
}

impl CombatRoll {
    /// Every die rolled, in stage order
    pub fn all_rolls(&self) -> Vec<u32> {
        self.hit_roll
            .rolls
            .iter()
            .chain(&self.wound_roll.rolls)
            .chain(&self.save_roll.rolls)
            .copied()
            .collect()
    }
}

/// Hit, then wound the hits, then save the wounds. Later stages only see
/// the survivors of earlier ones.
pub fn combat_roll(
    dice: &mut dyn DiceSource,
    attacks: u32,
    to_hit: i32,
    to_wound: i32,
    save: i32,
    rend: i32,
) -> CombatRoll {
    let hit_roll = roll_to_hit(dice, attacks, to_hit);
    let wound_roll = roll_to_wound(dice, hit_roll.passed, to_wound);
    let save_roll = roll_saves(dice, wound_roll.passed, save, rend);

    let hits = hit_roll.passed;
    let wounds = wound_roll.passed;
    let saved = save_roll.passed;

    CombatRoll {
        attacks,
        hits,
        wounds,
        saved,
        unsaved: wounds - saved,
        hit_roll,
        wound_roll,
        save_roll,
    }
}
