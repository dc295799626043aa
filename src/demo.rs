//! Built-in armies and a scripted skirmish
//!
//! Used by `skirmish demo` to exercise every phase without a UI. Each
//! general carries a heroic trait. Each side advances on the nearest enemy,
//! shoots what it can reach, charges into covering fire, and fights until
//! one army is gone or the round limit is hit.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::abilities::{
    Ability, AbilityCategory, AbilityCondition, AbilityEffect, Comparison, EffectDuration,
    ModelAbility, TargetSelector,
};
use crate::error::ActionError;
use crate::events::LoggedEvent;
use crate::session::GameSession;
use crate::turn::{Phase, PlayerId};
use crate::units::{
    Attribute, CombatFlag, ModelRole, ModelRoles, Position, Roles, Rule, Stat, Stats, UnitId,
    UnitTemplate, Weapon,
};

fn weapon(
    name: &str,
    attacks: i32,
    to_hit: i32,
    to_wound: i32,
    rend: i32,
    damage: i32,
    range: f32,
) -> Weapon {
    Weapon {
        name: name.to_string(),
        attacks,
        to_hit,
        to_wound,
        rend,
        damage,
        range,
    }
}

fn stats(move_inches: i32, wounds: i32, bravery: i32, save: i32) -> Stats {
    Stats {
        move_inches,
        wounds,
        max_wounds: wounds,
        bravery,
        save,
        ..Stats::default()
    }
}

/// Stormcast Eternals starter force
pub fn stormcast_army() -> Vec<UnitTemplate> {
    let mut lord = UnitTemplate::new("Lord-Celestant", stats(5, 5, 8, 3));
    lord.faction = "Stormcast Eternals".to_string();
    lord.roles = Roles {
        hero: true,
        general: true,
        ..Roles::default()
    };
    lord.base_size_mm = 40.0;
    lord.weapons = vec![weapon("Runeblade", 4, 3, 3, -1, 1, 0.0)];
    lord.unit_abilities = vec![Ability::active("Inescapable Vengeance")
        .with_description("+1 attack after charging")
        .in_phases(&[Phase::Combat])
        .with_condition(AbilityCondition::new(Attribute::HasCharged, Comparison::Equal, 1))
        .with_effect(AbilityEffect::stat(
            TargetSelector::Self_,
            Stat::Attacks,
            1,
            EffectDuration::UntilEndOfPhase,
        ))];

    let mut incantor = UnitTemplate::new("Knight-Incantor", stats(5, 4, 7, 4));
    incantor.faction = "Stormcast Eternals".to_string();
    incantor.roles = Roles {
        hero: true,
        wizard: true,
        ..Roles::default()
    };
    incantor.weapons = vec![weapon("Incantor's Staff", 3, 3, 3, -1, 1, 0.0)];
    incantor.unit_abilities = vec![
        Ability::active("Spirit Storm")
            .with_description("Deal 1 damage to an enemy within 18\"")
            .in_phases(&[Phase::Hero])
            .with_range(18.0)
            .with_cooldown(1)
            .with_effect(AbilityEffect::damage(TargetSelector::Enemy, 1)),
        Ability::active("Mystic Shield")
            .with_description("+1 save for a friendly unit until your next turn")
            .in_phases(&[Phase::Hero])
            .with_range(12.0)
            .with_cooldown(1)
            .with_effect(AbilityEffect::stat(
                TargetSelector::Friendly,
                Stat::Save,
                1,
                EffectDuration::UntilEndOfTurn,
            )),
    ];

    let mut liberators = UnitTemplate::new("Liberators", stats(5, 10, 7, 4));
    liberators.faction = "Stormcast Eternals".to_string();
    liberators.model_count = 5;
    liberators.models = ModelRoles {
        champion: true,
        ..ModelRoles::default()
    };
    liberators.weapons = vec![weapon("Warhammer", 10, 3, 3, 0, 1, 0.0)];
    liberators.model_abilities = vec![ModelAbility::new(
        Ability::passive("Liberator-Prime").with_effect(AbilityEffect::stat(
            TargetSelector::Self_,
            Stat::Attacks,
            1,
            EffectDuration::Permanent,
        )),
        ModelRole::Champion,
    )];

    let mut judicators = UnitTemplate::new("Judicators", stats(5, 10, 7, 4));
    judicators.faction = "Stormcast Eternals".to_string();
    judicators.model_count = 5;
    judicators.weapons = vec![
        weapon("Skybolt Bow", 5, 3, 3, -1, 1, 24.0),
        weapon("Storm Gladius", 5, 3, 4, 0, 1, 0.0),
    ];

    vec![lord, incantor, liberators, judicators]
}

/// Orruk Warclans starter force
pub fn orruk_army() -> Vec<UnitTemplate> {
    let mut megaboss = UnitTemplate::new("Megaboss", stats(5, 6, 8, 4));
    megaboss.faction = "Orruk Warclans".to_string();
    megaboss.roles = Roles {
        hero: true,
        general: true,
        ..Roles::default()
    };
    megaboss.base_size_mm = 60.0;
    megaboss.weapons = vec![weapon("Boss Choppa", 6, 3, 3, -1, 2, 0.0)];
    megaboss.unit_abilities = vec![
        Ability::new("Strength from Victory", AbilityCategory::Reactive)
            .with_description("Heal 1 wound when badly hurt")
            .in_phases(&[Phase::Combat])
            .with_cooldown(1)
            .with_condition(AbilityCondition::new(
                Attribute::Stat(Stat::Wounds),
                Comparison::LessOrEqual,
                3,
            ))
            .with_effect(AbilityEffect::heal(TargetSelector::Self_, 1)),
    ];

    let mut warchanter = UnitTemplate::new("Warchanter", stats(5, 4, 7, 5));
    warchanter.faction = "Orruk Warclans".to_string();
    warchanter.roles = Roles {
        hero: true,
        priest: true,
        ..Roles::default()
    };
    warchanter.weapons = vec![weapon("Gork-bashas", 4, 3, 3, -1, 1, 0.0)];
    warchanter.unit_abilities = vec![Ability::active("Violent Fury")
        .with_description("+1 damage for a friendly unit this combat phase")
        .in_phases(&[Phase::Combat])
        .with_range(12.0)
        .with_cooldown(1)
        .with_effect(AbilityEffect::stat(
            TargetSelector::Friendly,
            Stat::Damage,
            1,
            EffectDuration::UntilEndOfPhase,
        ))];

    let mut brutes = UnitTemplate::new("Orruk Brutes", stats(4, 15, 6, 4));
    brutes.faction = "Orruk Warclans".to_string();
    brutes.model_count = 5;
    brutes.base_size_mm = 40.0;
    brutes.weapons = vec![weapon("Brute Choppas", 10, 3, 3, -1, 1, 0.0)];

    let mut ardboys = UnitTemplate::new("Ardboys", stats(4, 20, 6, 4));
    ardboys.faction = "Orruk Warclans".to_string();
    ardboys.model_count = 10;
    ardboys.models = ModelRoles {
        banner_bearer: true,
        ..ModelRoles::default()
    };
    ardboys.rules.insert(Rule::Combat(CombatFlag::FightsFirst));
    ardboys.weapons = vec![weapon("Choppas", 20, 3, 4, 0, 1, 0.0)];

    vec![megaboss, warchanter, brutes, ardboys]
}

/// What happened in a demo game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoSummary {
    pub session: uuid::Uuid,
    pub rounds: u32,
    pub winner: Option<PlayerId>,
    pub survivors: Vec<(PlayerId, String, i32)>,
    pub command_points: Vec<(PlayerId, u32)>,
    pub events: Vec<LoggedEvent>,
}

/// Deploy both armies facing each other
pub fn deploy(session: &mut GameSession) -> Result<(), ActionError> {
    session.start_single_player();
    session.add_player(PlayerId::ONE, "Stormcast", "Hammers of Sigmar")?;
    session.add_player(PlayerId::TWO, "Orruks", "Ironsunz")?;

    let mut generals = Vec::new();
    for (i, template) in stormcast_army().iter().enumerate() {
        let x = i as f32 * 6.0 - 9.0;
        let id = session.add_unit(template, PlayerId::ONE, Position::new(x, -6.0))?;
        if i == 0 {
            generals.push((PlayerId::ONE, id, "Sigmar's Chosen"));
        }
    }
    for (i, template) in orruk_army().iter().enumerate() {
        let x = i as f32 * 6.0 - 9.0;
        let id = session.add_unit(template, PlayerId::TWO, Position::new(x, 6.0))?;
        if i == 0 {
            generals.push((PlayerId::TWO, id, "Brutal Cunning"));
        }
    }
    for (player, id, name) in generals {
        session.apply_heroic_trait(player, id, name)?;
    }
    Ok(())
}

/// Play up to `rounds` battle rounds
pub fn run_demo(mut session: GameSession, rounds: u32) -> Result<DemoSummary, ActionError> {
    deploy(&mut session)?;
    session.start()?;

    let mut winner = None;
    while session.turn_number() <= rounds {
        let player = session.active_player();
        play_phase(&mut session, player);

        if let Some(w) = last_army_standing(&session) {
            winner = Some(w);
            break;
        }
        session.advance_phase()?;
    }
    session.end_game(winner);
    info!("Demo finished after {} rounds", session.turn_number().min(rounds));

    let survivors = session
        .roster()
        .iter()
        .map(|u| (u.owner, u.name.clone(), u.stats.wounds))
        .collect();
    let command_points = [PlayerId::ONE, PlayerId::TWO]
        .iter()
        .map(|p| (*p, session.command_points(*p).map_or(0, |c| c.current)))
        .collect();

    Ok(DemoSummary {
        session: session.id(),
        rounds: session.turn_number().min(rounds),
        winner,
        survivors,
        command_points,
        events: session.events_mut().drain(),
    })
}

fn last_army_standing(session: &GameSession) -> Option<PlayerId> {
    let alive = |p: PlayerId| session.roster().units_of(p).next().is_some();
    match (alive(PlayerId::ONE), alive(PlayerId::TWO)) {
        (true, false) => Some(PlayerId::ONE),
        (false, true) => Some(PlayerId::TWO),
        _ => None,
    }
}

fn nearest_enemy(session: &GameSession, id: UnitId) -> Option<(UnitId, Position, f32)> {
    let unit = session.unit(id).ok()?;
    let board = session.board();
    session
        .roster()
        .iter()
        .filter(|u| u.owner != unit.owner)
        .map(|u| (u.id, u.position, board.distance_inches(&unit.position, &u.position)))
        .min_by(|a, b| a.2.total_cmp(&b.2))
}

fn own_units(session: &GameSession, player: PlayerId) -> Vec<UnitId> {
    session.roster().units_of(player).map(|u| u.id).collect()
}

/// Log a refused action and carry on
fn attempt<T>(what: &str, result: Result<T, ActionError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("{} refused: {}", what, e);
            None
        }
    }
}

fn play_phase(session: &mut GameSession, player: PlayerId) {
    match session.phase() {
        Phase::Hero => hero_phase(session, player),
        Phase::Movement => movement_phase(session, player),
        Phase::Shooting => shooting_phase(session, player),
        Phase::Charge => charge_phase(session, player),
        Phase::Combat => combat_phase(session, player),
    }
}

fn hero_phase(session: &mut GameSession, player: PlayerId) {
    for id in own_units(session, player) {
        let names = session.available_abilities(id).unwrap_or_default();
        for name in names {
            let target = nearest_enemy(session, id).map(|(t, _, _)| t);
            if attempt(&name, session.activate_unit_ability(id, &name, target)).is_none() {
                attempt(&name, session.activate_unit_ability(id, &name, Some(id)));
            }
        }
    }

    let wounded = session
        .roster()
        .units_of(player)
        .find(|u| u.stats.wounds < u.stats.max_wounds && !u.engaged)
        .map(|u| u.id);
    if let Some(id) = wounded {
        attempt("Rally", session.use_command_ability(player, "Rally", Some(id)));
    }
}

fn movement_phase(session: &mut GameSession, player: PlayerId) {
    for id in own_units(session, player) {
        let Ok(unit) = session.unit(id) else { continue };
        if unit.engaged {
            continue;
        }
        let (from, reach) = (unit.position, unit.engagement_range_inches());
        let allowance = session.effective(id, Stat::Move).unwrap_or(0) as f32;
        let Some((_, enemy_pos, distance)) = nearest_enemy(session, id) else { continue };

        // Stop outside engagement range and leave the rest to the charge
        let step = allowance.min(distance - reach * 2.0 - 1.0);
        if step <= 0.0 {
            continue;
        }
        let to = from.toward(&enemy_pos, session.board().from_inches(step));
        attempt("Move", session.move_unit(id, to));
    }
}

fn shooting_phase(session: &mut GameSession, player: PlayerId) {
    for id in own_units(session, player) {
        let Some((target, _, _)) = nearest_enemy(session, id) else { continue };
        let ranged = session
            .unit(id)
            .ok()
            .and_then(|u| u.weapons.iter().find(|w| w.is_ranged()).map(|w| w.name.clone()));
        if let Some(weapon) = ranged {
            attempt("Shoot", session.perform_attack(id, target, Some(&weapon)));
        }
    }
}

fn charge_phase(session: &mut GameSession, player: PlayerId) {
    // The defender shoots first at whoever is closest
    for id in own_units(session, player.opponent()) {
        let Some((target, _, _)) = nearest_enemy(session, id) else { continue };
        let armed = session
            .unit(id)
            .map(|u| !u.engaged && u.weapons.iter().any(|w| w.is_ranged()))
            .unwrap_or(false);
        if armed {
            attempt("Covering fire", session.covering_fire(id, target, None));
        }
    }

    for id in own_units(session, player) {
        if session.unit(id).map(|u| u.engaged).unwrap_or(true) {
            continue;
        }
        if let Some((target, _, _)) = nearest_enemy(session, id) {
            attempt("Charge", session.charge(id, target));
        }
    }
}

fn combat_phase(session: &mut GameSession, player: PlayerId) {
    let fighters = own_units(session, player);
    if let Some(first) = fighters
        .iter()
        .copied()
        .find(|id| session.unit(*id).map(|u| u.engaged).unwrap_or(false))
    {
        attempt(
            "All-out Attack",
            session.use_command_ability(player, "All-out Attack", Some(first)),
        );
    }

    for id in fighters {
        let names = session.available_abilities(id).unwrap_or_default();
        for name in names {
            attempt(&name, session.activate_unit_ability(id, &name, Some(id)));
        }

        let Some((target, _, _)) = nearest_enemy(session, id) else { continue };
        let melee = session
            .unit(id)
            .ok()
            .and_then(|u| u.weapons.iter().find(|w| !w.is_ranged()).map(|w| w.name.clone()));
        attempt("Fight", session.perform_attack(id, target, melee.as_deref()));
    }

    // The opponent's reactive abilities
    for id in own_units(session, player.opponent()) {
        let reactive: Vec<String> = session
            .unit(id)
            .map(|u| {
                u.unit_abilities
                    .iter()
                    .filter(|a| a.category == AbilityCategory::Reactive)
                    .map(|a| a.name.clone())
                    .collect()
            })
            .unwrap_or_default();
        for name in reactive {
            attempt(&name, session.activate_unit_ability(id, &name, None));
        }
    }
}
