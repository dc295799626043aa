//! skirmish - tabletop skirmish rules engine
//!
//! Turn/phase sequencing, command points, unit and model abilities,
//! heroic traits, temporary effects, dice-driven attack resolution and
//! damage.

pub mod abilities;
pub mod authority;
pub mod board;
pub mod combat;
pub mod command;
pub mod demo;
pub mod effects;
pub mod error;
pub mod events;
pub mod session;
pub mod traits;
pub mod turn;
pub mod units;

use std::path::Path;

use anyhow::{ensure, Result};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

pub use authority::{Command, CommandReply, SessionHandle};
pub use board::{Board, TableBoard};
pub use command::CommandPointConfig;
pub use error::ActionError;
pub use session::GameSession;
pub use turn::{GameState, Phase, PlayerId};

/// Game rules settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub max_players: usize,
    /// Fixed dice seed; `None` seeds from the OS
    pub dice_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_players: 2,
            dice_seed: None,
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub command_points: CommandPointConfig,
    pub board: TableBoard,
    pub game: GameConfig,
}

impl Config {
    /// Defaults, then the TOML file if given, then `SKIRMISH_*` environment
    /// variables (`SKIRMISH_GAME__DICE_SEED=7`)
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        let config: Config = figment
            .merge(Env::prefixed("SKIRMISH_").split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the rules cannot run with
    pub fn validate(&self) -> Result<()> {
        let board = &self.board;
        for (key, value) in [
            ("board.width_inches", board.width_inches),
            ("board.height_inches", board.height_inches),
            ("board.inches_per_unit", board.inches_per_unit),
        ] {
            ensure!(
                value.is_finite() && value > 0.0,
                "{} must be a positive number, got {}",
                key,
                value
            );
        }
        ensure!(self.game.max_players > 0, "game.max_players must be at least 1");
        Ok(())
    }
}
