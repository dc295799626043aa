//! Rallying: six dice, each 4+ restores a wound

use serde::{Deserialize, Serialize};

use super::dice::{successes, DiceSource};

pub const RALLY_DICE: u32 = 6;
pub const RALLY_THRESHOLD: i32 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RallyRoll {
    pub rolls: Vec<u32>,
    pub points: u32,
}

pub fn rally_roll(dice: &mut dyn DiceSource) -> RallyRoll {
    let rolls = dice.roll_many(RALLY_DICE, 6);
    let points = successes(&rolls, RALLY_THRESHOLD).len() as u32;
    RallyRoll { rolls, points }
}
