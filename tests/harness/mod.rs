//! Test harness for rules scenarios
//!
//! - `TestGame` - a started two-player session with scripted dice
//! - `template` / `hero` - unit templates with sensible defaults
//! - `melee` / `ranged` - 4+/4+ weapon profiles
//!
//! # Example
//!
//! ```rust,ignore
//! let mut game = TestGame::new([6, 6, 1]);
//! let a = game.place(template("Liberators"), PlayerId::ONE, 0.0, 0.0);
//! let b = game.place(template("Bloodreavers"), PlayerId::TWO, 0.0, 2.0);
//! game.start();
//! game.advance_to(Phase::Combat);
//! ```

#![allow(dead_code)]

use skirmish::combat::ScriptedDice;
use skirmish::units::{Position, Stats, UnitId, UnitTemplate, Weapon};
use skirmish::{GameSession, Phase, PlayerId};

/// 25.4mm bases make the engagement range exactly 2"
pub const INCH_BASE_MM: f32 = 25.4;

pub fn template(name: &str) -> UnitTemplate {
    let mut t = UnitTemplate::new(
        name,
        Stats {
            wounds: 5,
            max_wounds: 5,
            ..Stats::default()
        },
    );
    t.base_size_mm = INCH_BASE_MM;
    t
}

pub fn hero(name: &str) -> UnitTemplate {
    let mut t = template(name);
    t.roles.hero = true;
    t
}

pub fn melee(name: &str, attacks: i32) -> Weapon {
    Weapon {
        name: name.to_string(),
        attacks,
        to_hit: 4,
        to_wound: 4,
        rend: 0,
        damage: 1,
        range: 0.0,
    }
}

pub fn ranged(name: &str, attacks: i32, range: f32) -> Weapon {
    Weapon {
        range,
        ..melee(name, attacks)
    }
}

/// A session driven by scripted dice
pub struct TestGame {
    pub session: GameSession,
}

impl TestGame {
    pub fn new(rolls: impl IntoIterator<Item = u32>) -> Self {
        let mut session = GameSession::default().with_dice(ScriptedDice::new(rolls));
        session.start_single_player();
        session
            .add_player(PlayerId::ONE, "Alice", "Stormcast Eternals")
            .expect("add player 1");
        session
            .add_player(PlayerId::TWO, "Bob", "Orruk Warclans")
            .expect("add player 2");
        Self { session }
    }

    pub fn place(&mut self, template: UnitTemplate, owner: PlayerId, x: f32, y: f32) -> UnitId {
        self.session
            .add_unit(&template, owner, Position::new(x, y))
            .expect("place unit")
    }

    pub fn start(&mut self) {
        self.session.start().expect("start game");
    }

    /// Advance until `phase` is active (at least one step if already there)
    pub fn advance_to(&mut self, phase: Phase) {
        loop {
            self.session.advance_phase().expect("advance phase");
            if self.session.phase() == phase {
                return;
            }
        }
    }

    /// Advance `n` phases
    pub fn advance(&mut self, n: usize) {
        for _ in 0..n {
            self.session.advance_phase().expect("advance phase");
        }
    }
}
