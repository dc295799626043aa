//! Single authority for a shared session
//!
//! Networked or multi-client deployments route every action through one
//! [`SessionHandle`]. Commands are plain serde values so they can arrive as
//! JSON from any transport; they run one at a time under the session lock.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::ActionError;
use crate::session::GameSession;
use crate::turn::{Phase, PlayerId};
use crate::units::{Position, UnitId, UnitTemplate};

/// An action requested by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    AddPlayer {
        player: PlayerId,
        name: String,
        army: String,
    },
    AddUnit {
        owner: PlayerId,
        template: Box<UnitTemplate>,
        position: Position,
    },
    Start,
    AdvancePhase,
    MoveUnit {
        unit: UnitId,
        to: Position,
    },
    Charge {
        unit: UnitId,
        target: UnitId,
    },
    Attack {
        attacker: UnitId,
        defender: UnitId,
        #[serde(default)]
        weapon: Option<String>,
    },
    UnitAbility {
        unit: UnitId,
        name: String,
        #[serde(default)]
        target: Option<UnitId>,
    },
    ModelAbility {
        unit: UnitId,
        name: String,
        #[serde(default)]
        target: Option<UnitId>,
    },
    CommandAbility {
        player: PlayerId,
        name: String,
        #[serde(default)]
        target: Option<UnitId>,
    },
    HeroicTrait {
        player: PlayerId,
        unit: UnitId,
        name: String,
    },
    CoveringFire {
        unit: UnitId,
        target: UnitId,
        #[serde(default)]
        weapon: Option<String>,
    },
    EndGame {
        #[serde(default)]
        winner: Option<PlayerId>,
    },
}

/// Outcome of a command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandReply {
    Ok {
        phase: Phase,
        player: PlayerId,
        turn: u32,
        /// Command-specific result
        #[serde(default)]
        detail: serde_json::Value,
    },
    Rejected {
        reason: String,
    },
}

impl CommandReply {
    pub fn is_ok(&self) -> bool {
        matches!(self, CommandReply::Ok { .. })
    }
}

/// Cloneable handle to the one authoritative session
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<GameSession>>,
}

impl SessionHandle {
    pub fn new(session: GameSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Run a command against the session
    pub async fn execute(&self, command: Command) -> CommandReply {
        let mut session = self.inner.lock().await;
        debug!("Executing {:?}", command);
        match apply(&mut session, command) {
            Ok(detail) => CommandReply::Ok {
                phase: session.phase(),
                player: session.active_player(),
                turn: session.turn_number(),
                detail,
            },
            Err(e) => CommandReply::Rejected {
                reason: e.to_string(),
            },
        }
    }

    /// Run a read-only query under the lock
    pub async fn read<T>(&self, f: impl FnOnce(&GameSession) -> T) -> T {
        let session = self.inner.lock().await;
        f(&session)
    }
}

fn to_json<T: Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

fn apply(session: &mut GameSession, command: Command) -> Result<serde_json::Value, ActionError> {
    use serde_json::Value;

    let detail = match command {
        Command::AddPlayer { player, name, army } => {
            session.add_player(player, &name, &army)?;
            Value::Null
        }
        Command::AddUnit {
            owner,
            template,
            position,
        } => to_json(&session.add_unit(&template, owner, position)?),
        Command::Start => {
            session.start()?;
            Value::Null
        }
        Command::AdvancePhase => to_json(&session.advance_phase()?),
        Command::MoveUnit { unit, to } => {
            session.move_unit(unit, to)?;
            Value::Null
        }
        Command::Charge { unit, target } => to_json(&session.charge(unit, target)?),
        Command::Attack {
            attacker,
            defender,
            weapon,
        } => to_json(&session.perform_attack(attacker, defender, weapon.as_deref())?),
        Command::UnitAbility { unit, name, target } => {
            to_json(&session.activate_unit_ability(unit, &name, target)?)
        }
        Command::ModelAbility { unit, name, target } => {
            to_json(&session.activate_model_ability(unit, &name, target)?)
        }
        Command::CommandAbility {
            player,
            name,
            target,
        } => to_json(&session.use_command_ability(player, &name, target)?),
        Command::HeroicTrait { player, unit, name } => {
            session.apply_heroic_trait(player, unit, &name)?;
            Value::Null
        }
        Command::CoveringFire {
            unit,
            target,
            weapon,
        } => to_json(&session.covering_fire(unit, target, weapon.as_deref())?),
        Command::EndGame { winner } => {
            session.end_game(winner);
            Value::Null
        }
    };
    Ok(detail)
}
