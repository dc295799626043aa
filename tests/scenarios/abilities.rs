//! Unit and model abilities through the session

use skirmish::abilities::{
    Ability, AbilityCategory, AbilityCondition, AbilityEffect, Comparison, EffectDuration,
    ModelAbility, TargetSelector,
};
use skirmish::units::{Attribute, ModelRole, Stat};
use skirmish::{ActionError, Phase, PlayerId};

use crate::harness::{hero, template, TestGame};

fn wizard() -> skirmish::units::UnitTemplate {
    let mut t = hero("Knight-Incantor");
    t.roles.wizard = true;
    t.unit_abilities.push(
        Ability::active("Spirit Storm")
            .in_phases(&[Phase::Hero])
            .with_range(18.0)
            .with_cooldown(1)
            .with_effect(AbilityEffect::damage(TargetSelector::Enemy, 1)),
    );
    t
}

#[test]
fn test_cooldown_resets_after_full_cycle() {
    let mut game = TestGame::new([]);
    let caster = game.place(wizard(), PlayerId::ONE, 0.0, 0.0);
    let enemy = game.place(template("Bloodreavers"), PlayerId::TWO, 0.0, 12.0);
    game.start();

    game.session
        .activate_unit_ability(caster, "Spirit Storm", Some(enemy))
        .unwrap();
    assert_eq!(game.session.unit(enemy).unwrap().stats.wounds, 4);

    let err = game
        .session
        .activate_unit_ability(caster, "Spirit Storm", Some(enemy))
        .unwrap_err();
    assert_eq!(
        err,
        ActionError::AlreadyUsed {
            ability: "Spirit Storm".to_string()
        }
    );
    assert_eq!(game.session.unit(enemy).unwrap().stats.wounds, 4);

    // Back to player 1's hero phase
    game.advance(10);
    assert_eq!(game.session.active_player(), PlayerId::ONE);
    game.session
        .activate_unit_ability(caster, "Spirit Storm", Some(enemy))
        .unwrap();
    assert_eq!(game.session.unit(enemy).unwrap().stats.wounds, 3);
    assert!(game
        .session
        .unit(caster)
        .unwrap()
        .unit_ability("Spirit Storm")
        .unwrap()
        .used_this_game);
}

#[test]
fn test_out_of_range_and_wrong_player() {
    let mut game = TestGame::new([]);
    let caster = game.place(wizard(), PlayerId::ONE, 0.0, 0.0);
    let far = game.place(template("Bloodreavers"), PlayerId::TWO, 0.0, 20.0);
    game.start();

    assert_eq!(
        game.session
            .activate_unit_ability(caster, "Spirit Storm", Some(far))
            .unwrap_err(),
        ActionError::OutOfRange {
            distance: 20.0,
            range: 18.0
        }
    );

    game.advance(5);
    assert_eq!(
        game.session
            .activate_unit_ability(caster, "Spirit Storm", None)
            .unwrap_err(),
        ActionError::NotActivePlayer(PlayerId::ONE)
    );
}

#[test]
fn test_model_ability_needs_model() {
    let banner = ModelAbility::new(
        Ability::active("Icon of Defiance")
            .in_phases(&[Phase::Hero])
            .with_effect(AbilityEffect::stat(
                TargetSelector::Self_,
                Stat::Bravery,
                2,
                EffectDuration::UntilEndOfTurn,
            )),
        ModelRole::BannerBearer,
    );

    let mut without = template("Liberators");
    without.model_abilities.push(banner.clone());
    let mut with = template("Sequitors");
    with.models.banner_bearer = true;
    with.model_abilities.push(banner);

    let mut game = TestGame::new([]);
    let a = game.place(without, PlayerId::ONE, 0.0, 0.0);
    let b = game.place(with, PlayerId::ONE, 4.0, 0.0);
    game.start();

    assert!(matches!(
        game.session
            .activate_model_ability(a, "Icon of Defiance", None)
            .unwrap_err(),
        ActionError::MissingModelRole { .. }
    ));
    game.session
        .activate_model_ability(b, "Icon of Defiance", None)
        .unwrap();
    assert_eq!(game.session.effective(b, Stat::Bravery).unwrap(), 8);
}

#[test]
fn test_condition_on_target() {
    let mut t = hero("Lord-Executioner");
    t.unit_abilities.push(
        Ability::active("Decapitating Strike")
            .in_phases(&[Phase::Combat])
            .with_condition(
                AbilityCondition::new(Attribute::IsHero, Comparison::Equal, 1)
                    .on(TargetSelector::Enemy),
            )
            .with_effect(AbilityEffect::damage(TargetSelector::Enemy, 2)),
    );

    let mut game = TestGame::new([]);
    let lord = game.place(t, PlayerId::ONE, 0.0, 0.0);
    let grunt = game.place(template("Bloodreavers"), PlayerId::TWO, 0.0, 3.0);
    let boss = game.place(hero("Bloodsecrator"), PlayerId::TWO, 3.0, 0.0);
    game.start();
    game.advance_to(Phase::Combat);

    assert!(matches!(
        game.session
            .activate_unit_ability(lord, "Decapitating Strike", Some(grunt))
            .unwrap_err(),
        ActionError::ConditionFailed { .. }
    ));
    game.session
        .activate_unit_ability(lord, "Decapitating Strike", Some(boss))
        .unwrap();
    assert_eq!(game.session.unit(boss).unwrap().stats.wounds, 3);
}

#[test]
fn test_reactive_ability_on_enemy_turn() {
    let mut t = hero("Megaboss");
    t.unit_abilities.push(
        Ability::new("Rip-toof Fist", AbilityCategory::Reactive)
            .in_phases(&[Phase::Combat])
            .with_effect(AbilityEffect::heal(TargetSelector::Self_, 1)),
    );

    let mut game = TestGame::new([]);
    game.place(template("Liberators"), PlayerId::ONE, 0.0, 0.0);
    let boss = game.place(t, PlayerId::TWO, 0.0, 20.0);
    game.start();
    game.advance_to(Phase::Combat);

    let record = game
        .session
        .activate_unit_ability(boss, "Rip-toof Fist", None)
        .unwrap();
    assert_eq!(record.turn, 1);
    assert_eq!(game.session.ability_history().len(), 1);
}

#[test]
fn test_available_abilities_follow_phase() {
    let mut game = TestGame::new([]);
    let caster = game.place(wizard(), PlayerId::ONE, 0.0, 0.0);
    game.start();
    assert_eq!(
        game.session.available_abilities(caster).unwrap(),
        vec!["Spirit Storm".to_string()]
    );
    game.advance(1);
    assert!(game.session.available_abilities(caster).unwrap().is_empty());
}

#[test]
fn test_available_abilities_respect_active_player() {
    let mut warboss = hero("Megaboss");
    warboss.unit_abilities.push(
        Ability::active("Waaagh")
            .in_phases(&[Phase::Hero])
            .with_effect(AbilityEffect::heal(TargetSelector::Self_, 1)),
    );
    warboss.unit_abilities.push(
        Ability::new("Ironclad Grit", AbilityCategory::Reactive)
            .in_phases(&[Phase::Hero])
            .with_effect(AbilityEffect::heal(TargetSelector::Self_, 1)),
    );

    let mut game = TestGame::new([]);
    game.place(template("Liberators"), PlayerId::ONE, 0.0, 0.0);
    let boss = game.place(warboss, PlayerId::TWO, 0.0, 20.0);
    assert!(game.session.available_abilities(boss).unwrap().is_empty());

    game.start();
    assert_eq!(
        game.session.available_abilities(boss).unwrap(),
        vec!["Ironclad Grit".to_string()]
    );
    assert_eq!(
        game.session
            .activate_unit_ability(boss, "Waaagh", None)
            .unwrap_err(),
        ActionError::NotActivePlayer(PlayerId::TWO)
    );

    game.advance(5);
    assert_eq!(
        game.session.available_abilities(boss).unwrap(),
        vec!["Waaagh".to_string(), "Ironclad Grit".to_string()]
    );
}
