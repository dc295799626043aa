//! Attack resolution and damage through the session

use skirmish::combat::{combat_roll, ScriptedDice};
use skirmish::events::GameEvent;
use skirmish::units::{Stat, Stats, UnitTemplate};
use skirmish::{ActionError, Phase, PlayerId};

use crate::harness::{melee, ranged, template, TestGame, INCH_BASE_MM};

fn attacker() -> UnitTemplate {
    let mut t = UnitTemplate::new(
        "Vindictors",
        Stats {
            attacks: 5,
            to_hit: 4,
            to_wound: 4,
            rend: 0,
            damage: 1,
            wounds: 5,
            max_wounds: 5,
            ..Stats::default()
        },
    );
    t.base_size_mm = INCH_BASE_MM;
    t
}

fn defender() -> UnitTemplate {
    let mut t = UnitTemplate::new(
        "Blood Warriors",
        Stats {
            save: 4,
            wounds: 10,
            max_wounds: 10,
            ..Stats::default()
        },
    );
    t.base_size_mm = INCH_BASE_MM;
    t
}

#[test]
fn test_forced_dice_all_unsaved() {
    let rolls = [6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 1, 1, 1, 1, 1];
    let mut game = TestGame::new(rolls);
    let a = game.place(attacker(), PlayerId::ONE, 0.0, 0.0);
    let d = game.place(defender(), PlayerId::TWO, 0.0, 3.0);
    game.start();

    let result = game.session.resolve_attack(a, d, None).unwrap();
    assert_eq!(result.hits(), 5);
    assert_eq!(result.wounds(), 5);
    assert_eq!(result.saved(), 0);
    assert_eq!(result.unsaved(), 5);
    assert_eq!(result.damage, 5);
    assert_eq!(game.session.last_rolls(), &rolls[..]);

    let outcome = game.session.apply_combat_result(&result).unwrap();
    assert_eq!(outcome.applied, 5);
    assert_eq!(game.session.unit(d).unwrap().stats.wounds, 5);
}

#[test]
fn test_fight_in_combat_phase() {
    let mut game = TestGame::new([6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 1, 1, 1, 1, 1]);
    let a = game.place(attacker(), PlayerId::ONE, 0.0, 0.0);
    let d = game.place(defender(), PlayerId::TWO, 0.0, 3.0);
    game.start();

    assert!(matches!(
        game.session.perform_attack(a, d, None).unwrap_err(),
        ActionError::WrongPhase { .. }
    ));

    game.advance_to(Phase::Combat);
    let report = game.session.perform_attack(a, d, None).unwrap();
    assert_eq!(report.damage.applied, 5);
    assert_eq!(game.session.last_combat().unwrap().unsaved(), 5);
    assert_eq!(
        game.session.perform_attack(a, d, None).unwrap_err(),
        ActionError::AlreadyActed {
            unit: a,
            action: "fought"
        }
    );
}

#[test]
fn test_fight_needs_engagement() {
    let mut game = TestGame::new([]);
    let a = game.place(attacker(), PlayerId::ONE, 0.0, 0.0);
    let d = game.place(defender(), PlayerId::TWO, 0.0, 10.0);
    game.start();
    game.advance_to(Phase::Combat);

    let err = game.session.perform_attack(a, d, None).unwrap_err();
    assert_eq!(
        err,
        ActionError::OutOfRange {
            distance: 10.0,
            range: 4.0
        }
    );
    assert!(game.session.last_combat().is_none());
}

#[test]
fn test_weapon_overrides_profile() {
    // One attack from the unit, two from the weapon
    let mut a = attacker();
    a.stats.attacks = 1;
    a.weapons.push(melee("Thunderaxe", 2));

    let mut game = TestGame::new([5, 5, 5, 5, 2, 2]);
    let a = game.place(a, PlayerId::ONE, 0.0, 0.0);
    let d = game.place(defender(), PlayerId::TWO, 0.0, 3.0);
    game.start();

    let result = game.session.resolve_attack(a, d, Some("Thunderaxe")).unwrap();
    assert_eq!(result.profile.weapon.as_deref(), Some("Thunderaxe"));
    assert_eq!(result.roll.attacks, 2);
    assert_eq!(result.unsaved(), 2);
}

#[test]
fn test_ward_save_per_damage_point() {
    let mut d = defender();
    d.ward = 5;
    // Three unsaved wounds, then ward rolls 6, 5, 1
    let mut game = TestGame::new([6, 6, 6, 6, 6, 6, 1, 1, 1, 6, 5, 1]);
    let mut a = attacker();
    a.stats.attacks = 3;
    let a = game.place(a, PlayerId::ONE, 0.0, 0.0);
    let d = game.place(d, PlayerId::TWO, 0.0, 3.0);
    game.start();
    game.advance_to(Phase::Combat);

    let report = game.session.perform_attack(a, d, None).unwrap();
    assert_eq!(report.damage.incoming, 3);
    assert_eq!(report.damage.prevented, 2);
    assert_eq!(report.damage.applied, 1);
    assert_eq!(report.damage.ward_rolls, vec![6, 5, 1]);
    assert_eq!(game.session.last_rolls().len(), 12);
}

#[test]
fn test_destroyed_unit_leaves_roster() {
    let mut d = defender();
    d.stats.wounds = 2;
    d.stats.max_wounds = 2;
    let mut game = TestGame::new([6, 6, 6, 6, 6, 6, 6, 6, 6, 6, 1, 1, 1, 1, 1]);
    let a = game.place(attacker(), PlayerId::ONE, 0.0, 0.0);
    let d = game.place(d, PlayerId::TWO, 0.0, 3.0);
    game.start();
    game.advance_to(Phase::Combat);

    let report = game.session.perform_attack(a, d, None).unwrap();
    assert!(report.damage.destroyed);
    assert_eq!(report.damage.wounds_remaining, 0);
    assert_eq!(game.session.unit(d).unwrap_err(), ActionError::UnitDestroyed(d));
    assert!(!game.session.unit(a).unwrap().engaged);
    assert!(game
        .session
        .events()
        .iter()
        .any(|e| e.event == GameEvent::UnitDestroyed { unit: d }));
}

#[test]
fn test_cannot_attack_own_unit() {
    let mut game = TestGame::new([]);
    let a = game.place(attacker(), PlayerId::ONE, 0.0, 0.0);
    let b = game.place(template("Liberators"), PlayerId::ONE, 0.0, 3.0);
    game.start();
    game.advance_to(Phase::Combat);
    assert!(matches!(
        game.session.perform_attack(a, b, None).unwrap_err(),
        ActionError::InvalidTarget(_)
    ));
}

#[test]
fn test_stage_counts_are_monotonic() {
    let mut dice = ScriptedDice::new([1, 3, 4, 6, 2, 5, 6, 1, 4, 2]);
    let roll = combat_roll(&mut dice, 6, 3, 4, 4, 1);
    assert!(roll.unsaved <= roll.wounds);
    assert!(roll.wounds <= roll.hits);
    assert!(roll.hits <= roll.attacks);
    assert_eq!(roll.saved + roll.unsaved, roll.wounds);
}

fn gunline() -> UnitTemplate {
    let mut t = attacker();
    t.weapons.push(ranged("Boltstorm Pistol", 2, 12.0));
    t
}

#[test]
fn test_covering_fire_hits_on_one_worse() {
    // 4+ to hit becomes 5+: the 4 misses, the 5 hits, wounds on 6, save fails on 1
    let mut game = TestGame::new([4, 5, 6, 1]);
    let charger = game.place(defender(), PlayerId::ONE, 0.0, 10.0);
    let shooter = game.place(gunline(), PlayerId::TWO, 0.0, 0.0);
    game.start();
    game.advance_to(Phase::Charge);

    let report = game.session.covering_fire(shooter, charger, None).unwrap();
    assert_eq!(report.result.profile.weapon.as_deref(), Some("Boltstorm Pistol"));
    assert_eq!(report.result.profile.to_hit, 5);
    assert_eq!(report.result.hits(), 1);
    assert_eq!(report.result.unsaved(), 1);
    assert_eq!(report.damage.applied, 1);
    assert_eq!(game.session.unit(charger).unwrap().stats.wounds, 9);

    assert!(game.session.active_effects(shooter).unwrap().is_empty());
    assert_eq!(game.session.effective(shooter, Stat::ToHit).unwrap(), 4);
    assert_eq!(
        game.session.covering_fire(shooter, charger, None).unwrap_err(),
        ActionError::AlreadyActed {
            unit: shooter,
            action: "shot"
        }
    );
}

#[test]
fn test_covering_fire_only_in_charge_phase() {
    let mut game = TestGame::new([]);
    let charger = game.place(defender(), PlayerId::ONE, 0.0, 10.0);
    let shooter = game.place(gunline(), PlayerId::TWO, 0.0, 0.0);
    game.start();
    game.advance_to(Phase::Shooting);

    assert!(matches!(
        game.session.covering_fire(shooter, charger, None).unwrap_err(),
        ActionError::WrongPhase { .. }
    ));
    assert!(!game.session.unit(shooter).unwrap().actions.has_shot);
}

#[test]
fn test_covering_fire_needs_closest_enemy_in_range() {
    let mut game = TestGame::new([]);
    let near = game.place(defender(), PlayerId::ONE, 0.0, 8.0);
    let far = game.place(defender(), PlayerId::ONE, 0.0, 11.0);
    let shooter = game.place(gunline(), PlayerId::TWO, 0.0, 0.0);
    let melee_only = game.place(attacker(), PlayerId::TWO, 20.0, 0.0);
    game.start();
    game.advance_to(Phase::Charge);

    assert!(matches!(
        game.session.covering_fire(shooter, far, None).unwrap_err(),
        ActionError::InvalidTarget(_)
    ));
    assert!(matches!(
        game.session.covering_fire(melee_only, near, None).unwrap_err(),
        ActionError::InvalidTarget(_)
    ));
    assert!(matches!(
        game.session.covering_fire(shooter, shooter, None).unwrap_err(),
        ActionError::InvalidTarget(_)
    ));
    assert!(!game.session.unit(shooter).unwrap().actions.has_shot);
    assert_eq!(game.session.unit(near).unwrap().stats.wounds, 10);
}
