//! Command-point economy through the session

use skirmish::abilities::AppliedEffect;
use skirmish::command::{CommandPointConfig, CommandPointManager};
use skirmish::units::{CombatFlag, Rule, Stat};
use skirmish::{ActionError, Phase, PlayerId};

use crate::harness::{hero, template, TestGame};

#[test]
fn test_generation_with_two_heroes() {
    let mut mgr = CommandPointManager::new(CommandPointConfig {
        starting: 0,
        max: 3,
        per_turn: 1,
        per_hero: 1,
    });
    mgr.initialize_player(PlayerId::ONE);

    assert_eq!(mgr.on_turn_started(PlayerId::ONE, 2).unwrap(), 3);
    mgr.decrease_points(PlayerId::ONE, 2, "spent").unwrap();
    assert_eq!(mgr.on_turn_started(PlayerId::ONE, 2).unwrap(), 2);
    assert_eq!(mgr.points(PlayerId::ONE), 3);
}

#[test]
fn test_session_generation_counts_live_heroes() {
    let mut game = TestGame::new([]);
    game.place(hero("Lord-Celestant"), PlayerId::ONE, 0.0, 0.0);
    game.place(hero("Knight-Incantor"), PlayerId::ONE, 4.0, 0.0);
    game.start();

    // 1 starting, then min(1 + 2, 3 - 1)
    let pool = game.session.command_points(PlayerId::ONE).unwrap();
    assert_eq!(pool.current, 3);
    assert_eq!(pool.generated_this_turn, 2);
}

#[test]
fn test_all_out_attack_lasts_the_phase() {
    let mut game = TestGame::new([]);
    let lord = game.place(hero("Lord-Celestant"), PlayerId::ONE, 0.0, 0.0);
    let unit = game.place(template("Liberators"), PlayerId::ONE, 6.0, 0.0);
    game.place(template("Bloodreavers"), PlayerId::TWO, 6.0, 3.0);
    game.start();
    game.advance_to(Phase::Combat);

    let before = game.session.command_points(PlayerId::ONE).unwrap().current;
    let report = game
        .session
        .use_command_ability(PlayerId::ONE, "All-out Attack", Some(unit))
        .unwrap();
    assert!(matches!(report.applied, Some(AppliedEffect::Temporary { .. })));
    assert_eq!(
        game.session.command_points(PlayerId::ONE).unwrap().current,
        before - 1
    );
    assert_eq!(game.session.effective(unit, Stat::ToHit).unwrap(), 3);
    assert_eq!(game.session.effective(lord, Stat::ToHit).unwrap(), 4);

    game.advance(1);
    assert_eq!(game.session.effective(unit, Stat::ToHit).unwrap(), 4);
}

#[test]
fn test_failed_use_changes_nothing() {
    let mut game = TestGame::new([]);
    game.place(hero("Lord-Celestant"), PlayerId::ONE, 0.0, 0.0);
    let far = game.place(template("Judicators"), PlayerId::ONE, 0.0, -20.0);
    let enemy = game.place(template("Bloodreavers"), PlayerId::TWO, 0.0, 6.0);
    game.start();
    let ledger = game.session.points_ledger().len();

    let failures = [
        game.session
            .use_command_ability(PlayerId::ONE, "All-out Attack", None)
            .unwrap_err(),
        game.session
            .use_command_ability(PlayerId::ONE, "Rally", Some(far))
            .unwrap_err(),
        game.session
            .use_command_ability(PlayerId::ONE, "Rally", Some(enemy))
            .unwrap_err(),
        game.session
            .use_command_ability(PlayerId::ONE, "Waaagh!", None)
            .unwrap_err(),
    ];
    assert!(matches!(failures[0], ActionError::WrongPhase { .. }));
    assert!(matches!(failures[1], ActionError::OutOfRange { .. }));
    assert!(matches!(failures[2], ActionError::InvalidTarget(_)));
    assert!(matches!(failures[3], ActionError::UnknownAbility(_)));

    assert_eq!(game.session.command_points(PlayerId::ONE).unwrap().current, 3);
    assert!(game.session.command_points(PlayerId::ONE).unwrap().used_this_turn.is_empty());
    assert_eq!(game.session.points_ledger().len(), ledger);
}

#[test]
fn test_once_per_turn_then_reset() {
    let mut game = TestGame::new([]);
    game.place(hero("Lord-Celestant"), PlayerId::ONE, 0.0, 0.0);
    game.place(hero("Megaboss"), PlayerId::TWO, 0.0, 20.0);
    game.start();

    game.session
        .use_command_ability(PlayerId::ONE, "Inspiring Presence", None)
        .unwrap();
    assert_eq!(
        game.session
            .use_command_ability(PlayerId::ONE, "Inspiring Presence", None)
            .unwrap_err(),
        ActionError::AlreadyUsed {
            ability: "Inspiring Presence".to_string()
        }
    );

    game.advance(10);
    game.session
        .use_command_ability(PlayerId::ONE, "Inspiring Presence", None)
        .unwrap();
}

#[test]
fn test_engaged_unit_cannot_rally() {
    let mut game = TestGame::new([]);
    let lord = game.place(hero("Lord-Celestant"), PlayerId::ONE, 0.0, 0.0);
    game.place(template("Bloodreavers"), PlayerId::TWO, 0.0, 3.0);
    game.start();
    assert!(game.session.unit(lord).unwrap().engaged);

    assert_eq!(
        game.session
            .use_command_ability(PlayerId::ONE, "Rally", Some(lord))
            .unwrap_err(),
        ActionError::Engaged(lord)
    );
}

#[test]
fn test_counter_charge_allows_second_charge() {
    let mut game = TestGame::new([]);
    let lord = game.place(hero("Lord-Celestant"), PlayerId::ONE, 0.0, 0.0);
    let first = game.place(template("Bloodreavers"), PlayerId::TWO, 0.0, 10.0);
    let second = game.place(template("Bloodreavers"), PlayerId::TWO, 6.0, 10.0);
    game.start();
    game.advance_to(Phase::Charge);

    game.session.charge(lord, first).unwrap();
    assert!(matches!(
        game.session.charge(lord, second).unwrap_err(),
        ActionError::AlreadyActed { .. }
    ));

    game.session
        .use_command_ability(PlayerId::ONE, "Counter-charge", Some(lord))
        .unwrap();
    assert!(game
        .session
        .unit(lord)
        .unwrap()
        .has_rule(Rule::Combat(CombatFlag::ExtraCharge)));
    game.session.charge(lord, second).unwrap();
}
