//! Action failure reasons
//!
//! Every public entry point returns `Result<_, ActionError>`. These are
//! expected rule outcomes, not faults: a failed action leaves all state
//! unchanged and the message is fit to show a player.

use thiserror::Error;

use crate::turn::{Phase, PlayerId};
use crate::units::{ModelRole, UnitId};

/// Why an action was refused
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    #[error("the game has not started")]
    GameNotStarted,

    #[error("not usable in the {current} phase (allowed: {})", format_phases(.allowed))]
    WrongPhase { current: Phase, allowed: Vec<Phase> },

    #[error("target is out of range ({distance:.1}\" > {range:.1}\")")]
    OutOfRange { distance: f32, range: f32 },

    #[error("needs {needed} command points, has {available}")]
    InsufficientPoints { needed: u32, available: u32 },

    #[error("{ability} has already been used this turn")]
    AlreadyUsed { ability: String },

    #[error("unit {unit} has already {action} this turn")]
    AlreadyActed { unit: UnitId, action: &'static str },

    #[error("unit {0} not found")]
    UnknownUnit(UnitId),

    #[error("unit {0} has been destroyed")]
    UnitDestroyed(UnitId),

    #[error("unknown ability: {0}")]
    UnknownAbility(String),

    #[error("{ability}: condition not met ({condition})")]
    ConditionFailed { ability: String, condition: String },

    #[error("{ability} requires a {role} in the unit")]
    MissingModelRole { ability: String, role: ModelRole },

    #[error("it is not {0}'s turn")]
    NotActivePlayer(PlayerId),

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("position is not on the board")]
    InvalidPosition,

    #[error("{0} has no command point pool")]
    PlayerNotInitialized(PlayerId),

    #[error("cannot add player, lobby holds {max}")]
    LobbyFull { max: usize },

    #[error("need {needed} players to start, have {have}")]
    NotEnoughPlayers { needed: usize, have: usize },

    #[error("unit {0} is engaged in combat")]
    Engaged(UnitId),

    #[error("unknown heroic trait: {0}")]
    UnknownTrait(String),

    #[error("cannot take {name}: {reason}")]
    TraitNotAllowed { name: String, reason: String },
}

fn format_phases(phases: &[Phase]) -> String {
    phases
        .iter()
        .map(|p| p.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
