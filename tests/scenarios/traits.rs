//! Heroic traits through the session

use skirmish::events::GameEvent;
use skirmish::units::{Stat, UnitTemplate};
use skirmish::{ActionError, Phase, PlayerId};

use crate::harness::{hero, template, TestGame};

fn stormcast(name: &str) -> UnitTemplate {
    let mut t = hero(name);
    t.faction = "Stormcast Eternals".to_string();
    t
}

fn orruk(name: &str) -> UnitTemplate {
    let mut t = hero(name);
    t.faction = "Orruk Warclans".to_string();
    t
}

#[test]
fn test_trait_modifies_hero_and_logs() {
    let mut game = TestGame::new([]);
    let lord = game.place(stormcast("Lord-Celestant"), PlayerId::ONE, 0.0, 0.0);
    game.start();

    game.session
        .apply_heroic_trait(PlayerId::ONE, lord, "sigmar's chosen")
        .unwrap();
    assert_eq!(game.session.effective(lord, Stat::Save).unwrap(), 3);
    let held = game.session.heroic_traits(PlayerId::ONE);
    assert_eq!(held.len(), 1);
    assert_eq!(held[0].0, lord);
    assert_eq!(held[0].1.name, "Sigmar's Chosen");
    assert!(game.session.heroic_traits(PlayerId::TWO).is_empty());

    let removed = game.session.remove_heroic_trait(lord).unwrap();
    assert_eq!(removed.map(|t| t.name).as_deref(), Some("Sigmar's Chosen"));
    assert_eq!(game.session.effective(lord, Stat::Save).unwrap(), 4);
    assert!(game.session.remove_heroic_trait(lord).unwrap().is_none());

    let events: Vec<&GameEvent> = game.session.events().iter().map(|e| &e.event).collect();
    assert!(events.contains(&&GameEvent::HeroicTraitApplied {
        unit: lord,
        name: "Sigmar's Chosen".to_string()
    }));
    assert!(events.contains(&&GameEvent::HeroicTraitRemoved {
        unit: lord,
        name: "Sigmar's Chosen".to_string()
    }));
}

#[test]
fn test_trait_rejections() {
    let mut game = TestGame::new([]);
    let lord = game.place(stormcast("Lord-Celestant"), PlayerId::ONE, 0.0, 0.0);
    let troops = game.place(template("Liberators"), PlayerId::ONE, 4.0, 0.0);
    game.start();

    assert_eq!(
        game.session
            .apply_heroic_trait(PlayerId::ONE, lord, "Tireless")
            .unwrap_err(),
        ActionError::UnknownTrait("Tireless".to_string())
    );
    assert!(matches!(
        game.session
            .apply_heroic_trait(PlayerId::TWO, lord, "Unbreakable")
            .unwrap_err(),
        ActionError::InvalidTarget(_)
    ));
    assert!(matches!(
        game.session
            .apply_heroic_trait(PlayerId::ONE, lord, "Waaagh! Leader")
            .unwrap_err(),
        ActionError::TraitNotAllowed { .. }
    ));
    assert!(matches!(
        game.session
            .apply_heroic_trait(PlayerId::ONE, troops, "Unbreakable")
            .unwrap_err(),
        ActionError::TraitNotAllowed { .. }
    ));
    assert!(game.session.heroic_traits(PlayerId::ONE).is_empty());
    assert!(!game
        .session
        .events()
        .iter()
        .any(|e| matches!(e.event, GameEvent::HeroicTraitApplied { .. })));
}

#[test]
fn test_brutal_cunning_makes_all_out_attack_free() {
    let mut game = TestGame::new([]);
    game.place(template("Liberators"), PlayerId::ONE, 0.0, 20.0);
    let boss = game.place(orruk("Megaboss"), PlayerId::TWO, 0.0, 0.0);
    let boyz = game.place(template("Ardboyz"), PlayerId::TWO, 4.0, 0.0);
    game.start();
    game.session
        .apply_heroic_trait(PlayerId::TWO, boss, "Brutal Cunning")
        .unwrap();

    // Player two's combat phase
    game.advance(9);
    assert_eq!(game.session.phase(), Phase::Combat);
    let before = game.session.command_points(PlayerId::TWO).unwrap().current;
    game.session
        .use_command_ability(PlayerId::TWO, "All-out Attack", Some(boyz))
        .unwrap();
    assert_eq!(
        game.session.command_points(PlayerId::TWO).unwrap().current,
        before
    );
    assert_eq!(game.session.effective(boyz, Stat::ToHit).unwrap(), 3);
}

#[test]
fn test_lightning_strike_once_per_battle() {
    let mut game = TestGame::new([]);
    let lord = game.place(stormcast("Lord-Celestant"), PlayerId::ONE, 0.0, 0.0);
    let enemy = game.place(template("Bloodreavers"), PlayerId::TWO, 0.0, 15.0);
    game.start();
    game.session
        .apply_heroic_trait(PlayerId::ONE, lord, "Lightning Strike")
        .unwrap();
    game.advance_to(Phase::Charge);

    assert!(matches!(
        game.session.charge(lord, enemy).unwrap_err(),
        ActionError::OutOfRange { .. }
    ));
    game.session
        .activate_unit_ability(lord, "Lightning Strike", None)
        .unwrap();
    assert_eq!(game.session.effective(lord, Stat::Move).unwrap(), 12);
    game.session.charge(lord, enemy).unwrap();
    assert!(game.session.unit(lord).unwrap().engaged);

    // Back to player one's charge phase a turn later
    game.advance(10);
    assert_eq!(game.session.phase(), Phase::Charge);
    assert!(game
        .session
        .activate_unit_ability(lord, "Lightning Strike", None)
        .is_err());
}
