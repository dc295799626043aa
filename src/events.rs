//! Game events
//!
//! Every state change the session makes is reported as a [`GameEvent`]:
//! handed to each subscriber in registration order, then appended to a
//! bounded [`EventLog`] for display and replay.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::combat::{CombatResult, DamageOutcome};
use crate::effects::TemporaryEffect;
use crate::turn::{GameState, Phase, PlayerId};
use crate::units::{Position, UnitId};

/// Default number of events kept by the log
pub const DEFAULT_LOG_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    GameStateChanged {
        state: GameState,
    },
    PhaseChanged {
        from: Phase,
        to: Phase,
        turn: u32,
    },
    PlayerTurnChanged {
        player: PlayerId,
        turn: u32,
    },
    PointsGenerated {
        player: PlayerId,
        amount: u32,
    },
    PointsChanged {
        player: PlayerId,
        old: u32,
        new: u32,
    },
    CommandAbilityUsed {
        player: PlayerId,
        ability: String,
        target: Option<UnitId>,
    },
    AbilityActivated {
        unit: UnitId,
        ability: String,
        target: Option<UnitId>,
    },
    EffectAdded {
        unit: UnitId,
        effect: TemporaryEffect,
    },
    EffectExpired {
        unit: UnitId,
        effect: TemporaryEffect,
    },
    UnitMoved {
        unit: UnitId,
        from: Position,
        to: Position,
    },
    UnitCharged {
        unit: UnitId,
        target: UnitId,
    },
    UnitDamaged(DamageOutcome),
    UnitHealed {
        unit: UnitId,
        amount: i32,
    },
    UnitDestroyed {
        unit: UnitId,
    },
    CombatResolved(Box<CombatResult>),
    HeroicTraitApplied {
        unit: UnitId,
        name: String,
    },
    HeroicTraitRemoved {
        unit: UnitId,
        name: String,
    },
}

/// An event with the time it was recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedEvent {
    pub at: DateTime<Utc>,
    pub event: GameEvent,
}

/// Observer callback owned by the session
pub type Subscriber = Box<dyn FnMut(&GameEvent) + Send>;

/// Ring buffer of the most recent events
#[derive(Debug, Clone)]
pub struct EventLog {
    events: VecDeque<LoggedEvent>,
    capacity: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl EventLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Append an event, dropping the oldest when full
    pub fn push(&mut self, event: GameEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(LoggedEvent {
            at: Utc::now(),
            event,
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoggedEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove and return every logged event
    pub fn drain(&mut self) -> Vec<LoggedEvent> {
        self.events.drain(..).collect()
    }
}
