//! Temporary effects and effective stats

use skirmish::abilities::{Ability, AbilityEffect, EffectDuration, TargetSelector};
use skirmish::effects::TemporaryEffect;
use skirmish::events::GameEvent;
use skirmish::units::{MovementFlag, Rule, Stat};
use skirmish::{Phase, PlayerId};

use crate::harness::{template, TestGame};

#[test]
fn test_buff_expires_on_entering_combat() {
    let mut game = TestGame::new([]);
    let unit = game.place(template("Liberators"), PlayerId::ONE, 0.0, 0.0);
    game.start();

    let buff = TemporaryEffect::stat("Buff", Stat::Save, 1, Phase::Hero, Phase::Combat);
    game.session.add_effect(unit, buff.clone()).unwrap();
    assert_eq!(game.session.effective(unit, Stat::Save).unwrap(), 3);

    for phase in [Phase::Movement, Phase::Shooting, Phase::Charge] {
        game.advance(1);
        assert_eq!(game.session.phase(), phase);
        assert_eq!(game.session.effective(unit, Stat::Save).unwrap(), 3);
    }

    game.advance(1);
    assert_eq!(game.session.phase(), Phase::Combat);
    assert_eq!(game.session.effective(unit, Stat::Save).unwrap(), 4);
    assert!(game.session.active_effects(unit).unwrap().is_empty());
    assert!(game.session.events().iter().any(|e| e.event
        == GameEvent::EffectExpired {
            unit,
            effect: buff.clone()
        }));
}

#[test]
fn test_effect_targeting_current_phase_lasts_a_cycle() {
    let mut game = TestGame::new([]);
    let unit = game.place(template("Liberators"), PlayerId::ONE, 0.0, 0.0);
    game.start();

    let buff = TemporaryEffect::stat("Late", Stat::ToHit, 1, Phase::Hero, Phase::Hero);
    game.session.add_effect(unit, buff).unwrap();

    game.advance(4);
    assert_eq!(game.session.effective(unit, Stat::ToHit).unwrap(), 3);
    game.advance(1);
    assert_eq!(game.session.active_player(), PlayerId::TWO);
    assert_eq!(game.session.effective(unit, Stat::ToHit).unwrap(), 4);
}

#[test]
fn test_stacked_buffs_clamp() {
    let mut game = TestGame::new([]);
    let unit = game.place(template("Liberators"), PlayerId::ONE, 0.0, 0.0);
    game.start();

    for i in 0..4 {
        let name = format!("Blessing {}", i);
        game.session
            .add_effect(unit, TemporaryEffect::stat(&name, Stat::Save, 1, Phase::Hero, Phase::Combat))
            .unwrap();
    }
    assert_eq!(game.session.effective(unit, Stat::Save).unwrap(), 2);

    game.session
        .add_effect(unit, TemporaryEffect::stat("Curse", Stat::Save, -9, Phase::Hero, Phase::Combat))
        .unwrap();
    assert_eq!(game.session.effective(unit, Stat::Save).unwrap(), 6);
}

#[test]
fn test_remove_by_name() {
    let mut game = TestGame::new([]);
    let unit = game.place(template("Liberators"), PlayerId::ONE, 0.0, 0.0);
    game.start();

    for stat in [Stat::ToHit, Stat::ToWound] {
        game.session
            .add_effect(unit, TemporaryEffect::stat("Frenzy", stat, 1, Phase::Hero, Phase::Combat))
            .unwrap();
    }
    assert_eq!(game.session.remove_effect(unit, "Frenzy").unwrap(), 2);
    assert_eq!(game.session.effective(unit, Stat::ToWound).unwrap(), 4);
}

#[test]
fn test_until_end_of_turn_rule_grant() {
    let mut t = template("Vanguard-Raptors");
    t.unit_abilities.push(
        Ability::active("Hunting Call")
            .in_phases(&[Phase::Hero])
            .with_effect(AbilityEffect::grant(
                TargetSelector::Self_,
                Rule::Movement(MovementFlag::RunAndShoot),
                EffectDuration::UntilEndOfTurn,
            )),
    );

    let mut game = TestGame::new([]);
    let unit = game.place(t, PlayerId::ONE, 0.0, 0.0);
    game.start();
    game.session.activate_unit_ability(unit, "Hunting Call", None).unwrap();

    let rule = Rule::Movement(MovementFlag::RunAndShoot);
    game.advance(4);
    assert!(game.session.unit(unit).unwrap().has_rule(rule));
    game.advance(1);
    assert!(!game.session.unit(unit).unwrap().has_rule(rule));
}
