//! Turn and phase state machine
//!
//! Drives the battle round:
//! - Five phases per player turn (hero, movement, shooting, charge, combat)
//! - Two players alternate; the round counter advances after player 2's combat phase
//! - Game lifecycle (menu, setup, playing, game over)
//!
//! The machine only tracks *where* the game is. Side effects of a transition
//! (flag resets, effect expiry, command-point generation) are driven by the
//! session from the returned [`PhaseTransition`].

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::ActionError;

/// Player identifier (players are numbered from 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u8);

impl PlayerId {
    pub const ONE: PlayerId = PlayerId(1);
    pub const TWO: PlayerId = PlayerId(2);

    /// The other player in a two-player game
    pub fn opponent(self) -> PlayerId {
        if self == PlayerId::ONE {
            PlayerId::TWO
        } else {
            PlayerId::ONE
        }
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player {}", self.0)
    }
}

/// Phases of a player turn, in play order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    Hero,
    Movement,
    Shooting,
    Charge,
    Combat,
}

impl Phase {
    /// All phases in cycle order
    pub fn all() -> &'static [Phase] {
        &[
            Phase::Hero,
            Phase::Movement,
            Phase::Shooting,
            Phase::Charge,
            Phase::Combat,
        ]
    }

    /// The phase that follows this one (combat wraps to hero)
    pub fn next(self) -> Phase {
        match self {
            Phase::Hero => Phase::Movement,
            Phase::Movement => Phase::Shooting,
            Phase::Shooting => Phase::Charge,
            Phase::Charge => Phase::Combat,
            Phase::Combat => Phase::Hero,
        }
    }

    /// Whether this is the last phase of a player turn
    pub fn ends_turn(self) -> bool {
        self == Phase::Combat
    }
}

impl FromStr for Phase {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hero" => Ok(Phase::Hero),
            "movement" | "move" => Ok(Phase::Movement),
            "shooting" | "shoot" => Ok(Phase::Shooting),
            "charge" => Ok(Phase::Charge),
            "combat" | "fight" => Ok(Phase::Combat),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::Hero => "hero",
            Phase::Movement => "movement",
            Phase::Shooting => "shooting",
            Phase::Charge => "charge",
            Phase::Combat => "combat",
        };
        write!(f, "{}", s)
    }
}

/// Overall game lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameState {
    #[default]
    MainMenu,
    Setup,
    Playing,
    GameOver,
}

/// A registered player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerData {
    pub id: PlayerId,
    pub name: String,
    pub army_name: String,
    pub victory_points: u32,
}

/// What changed when the phase advanced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTransition {
    pub from: Phase,
    pub to: Phase,
    /// Set when the active player changed (combat -> hero)
    pub new_player: Option<PlayerId>,
    /// Battle round after the transition
    pub turn: u32,
}

impl PhaseTransition {
    /// Whether a new player turn started with this transition
    pub fn starts_turn(&self) -> bool {
        self.new_player.is_some()
    }
}

/// The turn/phase state machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnState {
    state: GameState,
    phase: Phase,
    active_player: PlayerId,
    turn: u32,
    max_players: usize,
    multiplayer: bool,
    players: BTreeMap<PlayerId, PlayerData>,
    winner: Option<PlayerId>,
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new(2)
    }
}

impl TurnState {
    /// Create a machine in the main menu
    pub fn new(max_players: usize) -> Self {
        Self {
            state: GameState::MainMenu,
            phase: Phase::Hero,
            active_player: PlayerId::ONE,
            turn: 1,
            max_players,
            multiplayer: false,
            players: BTreeMap::new(),
            winner: None,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active_player(&self) -> PlayerId {
        self.active_player
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn is_multiplayer(&self) -> bool {
        self.multiplayer
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn is_playing(&self) -> bool {
        self.state == GameState::Playing
    }

    /// Registered players in id order
    pub fn players(&self) -> impl Iterator<Item = &PlayerData> {
        self.players.values()
    }

    pub fn player(&self, id: PlayerId) -> Option<&PlayerData> {
        self.players.get(&id)
    }

    /// Enter setup for a local game
    pub fn start_single_player(&mut self) {
        self.multiplayer = false;
        self.state = GameState::Setup;
        info!("Starting single player game");
    }

    /// Enter setup for a networked game
    pub fn start_multiplayer(&mut self) {
        self.multiplayer = true;
        self.state = GameState::Setup;
        info!("Starting multiplayer game");
    }

    /// Register a player
    pub fn add_player(&mut self, id: PlayerId, name: &str, army_name: &str) -> Result<(), ActionError> {
        if self.players.len() >= self.max_players && !self.players.contains_key(&id) {
            warn!("Cannot add {}, max players reached", id);
            return Err(ActionError::LobbyFull {
                max: self.max_players,
            });
        }

        self.players.insert(
            id,
            PlayerData {
                id,
                name: name.to_string(),
                army_name: army_name.to_string(),
                victory_points: 0,
            },
        );
        info!("Added {} ({}) with army {}", id, name, army_name);
        Ok(())
    }

    /// Begin play: player 1, hero phase, round 1
    pub fn start(&mut self) -> Result<(), ActionError> {
        if self.players.len() != self.max_players {
            return Err(ActionError::NotEnoughPlayers {
                needed: self.max_players,
                have: self.players.len(),
            });
        }

        self.state = GameState::Playing;
        self.active_player = PlayerId::ONE;
        self.phase = Phase::Hero;
        self.turn = 1;
        self.winner = None;

        info!(
            "Game started: turn {}, {}, {} phase",
            self.turn, self.active_player, self.phase
        );
        Ok(())
    }

    /// Advance to the next phase.
    ///
    /// Returns `None` (and changes nothing) unless the game is being played.
    /// Leaving combat hands the turn to the other player and restarts at hero;
    /// the round counter increments when play returns to player 1.
    pub fn advance(&mut self) -> Option<PhaseTransition> {
        if !self.is_playing() {
            return None;
        }

        let from = self.phase;
        let to = from.next();
        let mut new_player = None;

        if from.ends_turn() {
            self.active_player = self.active_player.opponent();
            if self.active_player == PlayerId::ONE {
                self.turn += 1;
            }
            new_player = Some(self.active_player);
            info!(
                "Turn {}, {}, {} phase",
                self.turn, self.active_player, to
            );
        } else {
            info!("Phase changed to {}", to);
        }

        self.phase = to;

        Some(PhaseTransition {
            from,
            to,
            new_player,
            turn: self.turn,
        })
    }

    /// End the game (the winner is decided by an outside collaborator)
    pub fn end_game(&mut self, winner: Option<PlayerId>) {
        self.state = GameState::GameOver;
        self.winner = winner;
        match winner.and_then(|w| self.players.get(&w)) {
            Some(p) => info!("Game over! {} ({}) wins", p.id, p.name),
            None => info!("Game over!"),
        }
    }

    /// Award victory points to a player
    pub fn add_victory_points(&mut self, id: PlayerId, points: u32) {
        if let Some(p) = self.players.get_mut(&id) {
            p.victory_points += points;
        }
    }
}
