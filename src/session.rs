//! Game session
//!
//! The session owns one of everything: the turn machine, the command-point
//! manager, the ability engine, the roster, the board and the dice. All
//! actions go through it, and it is the only thing that emits events.
//!
//! Phase transition order:
//! 1. Per-turn flags and ability use reset (only when the player changes)
//! 2. Effects swept for the new phase
//! 3. Command points generated for the new player

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::abilities::{
    apply_effect, AbilityCategory, AbilityContext, AbilityEngine, AbilityKind, ActivationRecord,
    AppliedEffect,
};
use crate::board::Board;
use crate::combat::{rally_roll, resolve_attack, CombatResult, DamageOutcome, DiceSource, RandomDice};
use crate::command::{
    CommandAbility, CommandActivation, CommandEffect, CommandPointManager, PlayerCommandPoints,
    PointsChange,
};
use crate::effects::{effective, effective_stats, EffectiveStats, TemporaryEffect};
use crate::error::ActionError;
use crate::events::{EventLog, GameEvent, Subscriber};
use crate::traits::{self, HeroicTrait, TraitCatalog};
use crate::turn::{GameState, Phase, PhaseTransition, PlayerId, TurnState};
use crate::units::{
    CombatFlag, MovementFlag, Position, Roster, Rule, Stat, Unit, UnitId, UnitTemplate,
};
use crate::Config;

/// An attack after damage has been applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackReport {
    pub result: CombatResult,
    pub damage: DamageOutcome,
}

/// A command ability use and what it did to its target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandReport {
    pub activation: CommandActivation,
    pub applied: Option<AppliedEffect>,
    /// Dice rolled for a rally
    pub rolls: Vec<u32>,
}

/// Effect name for the covering fire hit penalty
const COVERING_FIRE: &str = "Covering Fire";

pub struct GameSession {
    id: Uuid,
    config: Config,
    turn: TurnState,
    points: CommandPointManager,
    abilities: AbilityEngine,
    traits: TraitCatalog,
    roster: Roster,
    board: Box<dyn Board + Send>,
    dice: Box<dyn DiceSource + Send>,
    subscribers: Vec<Subscriber>,
    log: EventLog,
    last_combat: Option<CombatResult>,
    last_rolls: Vec<u32>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl GameSession {
    /// Create a session in the main menu
    pub fn new(config: Config) -> Self {
        let dice: Box<dyn DiceSource + Send> = match config.game.dice_seed {
            Some(seed) => Box::new(RandomDice::seeded(seed)),
            None => Box::new(RandomDice::from_entropy()),
        };
        let id = Uuid::new_v4();
        info!("Created session {}", id);

        Self {
            id,
            turn: TurnState::new(config.game.max_players),
            points: CommandPointManager::new(config.command_points.clone()),
            abilities: AbilityEngine::new(),
            traits: TraitCatalog::new(),
            roster: Roster::new(),
            board: Box::new(config.board),
            dice,
            subscribers: Vec::new(),
            log: EventLog::default(),
            last_combat: None,
            last_rolls: Vec::new(),
            config,
        }
    }

    /// Replace the dice source (scripted dice for tests and replays)
    pub fn with_dice(mut self, dice: impl DiceSource + Send + 'static) -> Self {
        self.dice = Box::new(dice);
        self
    }

    pub fn with_board(mut self, board: impl Board + Send + 'static) -> Self {
        self.board = Box::new(board);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Register an observer; it sees every event after this call
    pub fn subscribe(&mut self, subscriber: Subscriber) {
        self.subscribers.push(subscriber);
    }

    fn emit(&mut self, event: GameEvent) {
        for subscriber in &mut self.subscribers {
            subscriber(&event);
        }
        self.log.push(event);
    }

    // Lifecycle

    pub fn start_single_player(&mut self) {
        self.turn.start_single_player();
        self.emit(GameEvent::GameStateChanged {
            state: GameState::Setup,
        });
    }

    pub fn start_multiplayer(&mut self) {
        self.turn.start_multiplayer();
        self.emit(GameEvent::GameStateChanged {
            state: GameState::Setup,
        });
    }

    pub fn add_player(&mut self, id: PlayerId, name: &str, army: &str) -> Result<(), ActionError> {
        self.turn.add_player(id, name, army)
    }

    /// Place a unit built from a template
    pub fn add_unit(
        &mut self,
        template: &UnitTemplate,
        owner: PlayerId,
        position: Position,
    ) -> Result<UnitId, ActionError> {
        if !self.board.is_valid_position(&position) {
            return Err(ActionError::InvalidPosition);
        }
        let id = self.roster.next_id();
        let unit = template.instantiate(id, owner, position);
        debug!("Placed {} {} for {}", unit.name, id, owner);
        self.roster.insert(unit);
        self.refresh_engagement();
        Ok(id)
    }

    /// Begin play: pools initialised, player 1 generates points
    pub fn start(&mut self) -> Result<(), ActionError> {
        self.turn.start()?;

        self.points.reset_for_new_game();
        let players: Vec<PlayerId> = self.turn.players().map(|p| p.id).collect();
        for player in players {
            self.points.initialize_player(player);
        }
        self.roster.reset_game();
        self.abilities.clear_history();
        self.last_combat = None;
        self.last_rolls.clear();
        self.refresh_engagement();

        self.emit(GameEvent::GameStateChanged {
            state: GameState::Playing,
        });
        let player = self.turn.active_player();
        self.emit(GameEvent::PlayerTurnChanged {
            player,
            turn: self.turn.turn(),
        });
        self.generate_points(player);
        Ok(())
    }

    pub fn end_game(&mut self, winner: Option<PlayerId>) {
        self.turn.end_game(winner);
        self.emit(GameEvent::GameStateChanged {
            state: GameState::GameOver,
        });
    }

    pub fn add_victory_points(&mut self, player: PlayerId, points: u32) {
        self.turn.add_victory_points(player, points);
    }

    /// Move to the next phase; fails without change unless the game is playing
    pub fn advance_phase(&mut self) -> Result<PhaseTransition, ActionError> {
        let transition = self.turn.advance().ok_or(ActionError::GameNotStarted)?;

        if transition.starts_turn() {
            self.roster.reset_turn_actions();
        }
        for (unit, effect) in self.roster.sweep_effects(transition.to) {
            self.emit(GameEvent::EffectExpired { unit, effect });
        }
        self.emit(GameEvent::PhaseChanged {
            from: transition.from,
            to: transition.to,
            turn: transition.turn,
        });
        if let Some(player) = transition.new_player {
            self.emit(GameEvent::PlayerTurnChanged {
                player,
                turn: transition.turn,
            });
            self.generate_points(player);
        }
        Ok(transition)
    }

    fn generate_points(&mut self, player: PlayerId) {
        let heroes = self.roster.hero_count(player);
        let old = self.points.points(player);
        match self.points.on_turn_started(player, heroes) {
            Ok(amount) => {
                self.emit(GameEvent::PointsGenerated { player, amount });
                self.emit(GameEvent::PointsChanged {
                    player,
                    old,
                    new: self.points.points(player),
                });
            }
            Err(e) => warn!("No command points generated: {}", e),
        }
    }

    // Checks shared by the action entry points

    fn require_phase(&self, allowed: &[Phase]) -> Result<(), ActionError> {
        if !self.turn.is_playing() {
            return Err(ActionError::GameNotStarted);
        }
        let current = self.turn.phase();
        if !allowed.contains(&current) {
            return Err(ActionError::WrongPhase {
                current,
                allowed: allowed.to_vec(),
            });
        }
        Ok(())
    }

    fn require_active(&self, unit: &Unit) -> Result<(), ActionError> {
        if unit.owner != self.turn.active_player() {
            return Err(ActionError::NotActivePlayer(unit.owner));
        }
        Ok(())
    }

    /// Abilities need a running game, and the owner's turn unless reactive
    fn require_user(
        &self,
        unit: &Unit,
        category: Option<AbilityCategory>,
    ) -> Result<(), ActionError> {
        if !self.turn.is_playing() {
            return Err(ActionError::GameNotStarted);
        }
        if category != Some(AbilityCategory::Reactive) {
            self.require_active(unit)?;
        }
        Ok(())
    }

    /// Recompute every unit's engaged flag from positions
    fn refresh_engagement(&mut self) {
        let snapshot: Vec<(UnitId, PlayerId, Position, f32)> = self
            .roster
            .iter()
            .map(|u| (u.id, u.owner, u.position, u.engagement_range_inches()))
            .collect();
        let board = self.board.as_ref();
        for unit in self.roster.iter_mut() {
            let reach = unit.engagement_range_inches();
            unit.engaged = snapshot.iter().any(|(id, owner, pos, range)| {
                *id != unit.id
                    && *owner != unit.owner
                    && board.distance_inches(&unit.position, pos) <= reach + range
            });
        }
    }

    // Actions

    /// Move a unit up to its effective Move characteristic
    pub fn move_unit(&mut self, id: UnitId, to: Position) -> Result<(), ActionError> {
        self.require_phase(&[Phase::Movement])?;
        let unit = self.roster.get(id)?;
        self.require_active(unit)?;

        if unit.actions.has_moved && !unit.has_rule(Rule::Movement(MovementFlag::ExtraMove)) {
            return Err(ActionError::AlreadyActed {
                unit: id,
                action: "moved",
            });
        }
        if !self.board.is_valid_position(&to) {
            return Err(ActionError::InvalidPosition);
        }
        let allowance = effective(unit, Stat::Move) as f32;
        let distance = self.board.distance_inches(&unit.position, &to);
        if distance > allowance {
            return Err(ActionError::OutOfRange {
                distance,
                range: allowance,
            });
        }

        let from = unit.position;
        let unit = self.roster.get_mut(id)?;
        unit.position = to;
        unit.actions.has_moved = true;
        info!("{} moved {:.1}\"", unit.name, distance);

        self.refresh_engagement();
        self.emit(GameEvent::UnitMoved { unit: id, from, to });
        Ok(())
    }

    /// Charge an enemy unit within move + 6". The charger ends at the edge
    /// of its engagement range from the target.
    pub fn charge(&mut self, id: UnitId, target: UnitId) -> Result<Position, ActionError> {
        self.require_phase(&[Phase::Charge])?;
        let unit = self.roster.get(id)?;
        self.require_active(unit)?;

        if unit.actions.has_charged && !unit.has_rule(Rule::Combat(CombatFlag::ExtraCharge)) {
            return Err(ActionError::AlreadyActed {
                unit: id,
                action: "charged",
            });
        }
        let enemy = self.roster.get(target)?;
        if enemy.is_friendly_to(unit) {
            return Err(ActionError::InvalidTarget(format!(
                "{} cannot charge a friendly unit",
                unit.name
            )));
        }
        let range = unit.charge_range_inches(effective(unit, Stat::Move)) as f32;
        let distance = self.board.distance_inches(&unit.position, &enemy.position);
        if distance > range {
            return Err(ActionError::OutOfRange { distance, range });
        }

        let destination = enemy.position.toward(
            &unit.position,
            self.board.from_inches(unit.engagement_range_inches()),
        );
        let unit = self.roster.get_mut(id)?;
        unit.position = destination;
        unit.actions.has_charged = true;
        unit.engaged = true;
        info!("{} charged {}", unit.name, target);
        self.roster.get_mut(target)?.engaged = true;

        self.refresh_engagement();
        self.emit(GameEvent::UnitCharged { unit: id, target });
        Ok(destination)
    }

    /// Shoot (ranged weapon, not engaged) or fight (engagement range),
    /// then apply the damage
    pub fn perform_attack(
        &mut self,
        attacker: UnitId,
        defender: UnitId,
        weapon: Option<&str>,
    ) -> Result<AttackReport, ActionError> {
        self.require_phase(&[Phase::Shooting, Phase::Combat])?;
        let phase = self.turn.phase();
        let a = self.roster.get(attacker)?;
        let d = self.roster.get(defender)?;
        self.require_active(a)?;
        if a.is_friendly_to(d) {
            return Err(ActionError::InvalidTarget(format!(
                "{} cannot attack a friendly unit",
                a.name
            )));
        }
        let weapon = match weapon {
            Some(name) => Some(a.weapon(name).ok_or_else(|| {
                ActionError::InvalidTarget(format!("{} has no weapon named {}", a.name, name))
            })?),
            None => None,
        };
        let distance = self.board.distance_inches(&a.position, &d.position);

        if phase == Phase::Shooting {
            if a.actions.has_shot {
                return Err(ActionError::AlreadyActed {
                    unit: attacker,
                    action: "shot",
                });
            }
            if a.engaged {
                return Err(ActionError::Engaged(attacker));
            }
            let ranged = weapon.filter(|w| w.is_ranged()).ok_or_else(|| {
                ActionError::InvalidTarget(format!("{} needs a ranged weapon to shoot", a.name))
            })?;
            if distance > ranged.range {
                return Err(ActionError::OutOfRange {
                    distance,
                    range: ranged.range,
                });
            }
        } else {
            if a.actions.has_fought {
                return Err(ActionError::AlreadyActed {
                    unit: attacker,
                    action: "fought",
                });
            }
            if !a.within_engagement(d, distance) {
                return Err(ActionError::OutOfRange {
                    distance,
                    range: a.engagement_range_inches() + d.engagement_range_inches(),
                });
            }
        }

        let result = resolve_attack(a, d, weapon, self.dice.as_mut());
        let unit = self.roster.get_mut(attacker)?;
        if phase == Phase::Shooting {
            unit.actions.has_shot = true;
        } else {
            unit.actions.has_fought = true;
        }

        self.last_rolls = result.roll.all_rolls();
        self.last_combat = Some(result.clone());
        self.emit(GameEvent::CombatResolved(Box::new(result.clone())));
        let damage = self.apply_combat_result(&result)?;
        Ok(AttackReport { result, damage })
    }

    /// Covering fire: in the Charge phase a unit that is not engaged and has
    /// not shot this turn fires at the closest enemy unit, at -1 to hit
    pub fn covering_fire(
        &mut self,
        shooter: UnitId,
        target: UnitId,
        weapon: Option<&str>,
    ) -> Result<AttackReport, ActionError> {
        self.require_phase(&[Phase::Charge])?;
        let phase = self.turn.phase();
        let a = self.roster.get(shooter)?;
        let d = self.roster.get(target)?;
        if a.is_friendly_to(d) {
            return Err(ActionError::InvalidTarget(format!(
                "{} cannot shoot a friendly unit",
                a.name
            )));
        }
        if a.actions.has_shot {
            return Err(ActionError::AlreadyActed {
                unit: shooter,
                action: "shot",
            });
        }
        if a.engaged {
            return Err(ActionError::Engaged(shooter));
        }

        let board = self.board.as_ref();
        let distance = board.distance_inches(&a.position, &d.position);
        let closest = self
            .roster
            .iter()
            .filter(|u| !u.is_friendly_to(a))
            .map(|u| board.distance_inches(&a.position, &u.position))
            .min_by(|x, y| x.total_cmp(y))
            .unwrap_or(distance);
        if distance > closest + f32::EPSILON {
            return Err(ActionError::InvalidTarget(format!(
                "covering fire must target the closest enemy unit ({:.1}\")",
                closest
            )));
        }

        let ranged = match weapon {
            Some(name) => a.weapon(name),
            None => a.weapons.iter().find(|w| w.is_ranged()),
        }
        .filter(|w| w.is_ranged())
        .ok_or_else(|| {
            ActionError::InvalidTarget(format!("{} needs a ranged weapon to shoot", a.name))
        })?
        .clone();
        if distance > ranged.range {
            return Err(ActionError::OutOfRange {
                distance,
                range: ranged.range,
            });
        }

        let penalty = TemporaryEffect::stat(COVERING_FIRE, Stat::ToHit, -1, phase, phase.next());
        let unit = self.roster.get_mut(shooter)?;
        unit.effects.add(penalty);
        unit.actions.has_shot = true;

        let a = self.roster.get(shooter)?;
        let d = self.roster.get(target)?;
        let result = resolve_attack(a, d, Some(&ranged), self.dice.as_mut());
        self.roster.get_mut(shooter)?.effects.remove(COVERING_FIRE);
        info!("{} gives covering fire at {}", shooter, target);

        self.last_rolls = result.roll.all_rolls();
        self.last_combat = Some(result.clone());
        self.emit(GameEvent::CombatResolved(Box::new(result.clone())));
        let damage = self.apply_combat_result(&result)?;
        Ok(AttackReport { result, damage })
    }

    /// Resolve an attack with no phase or action checks and no damage applied
    pub fn resolve_attack(
        &mut self,
        attacker: UnitId,
        defender: UnitId,
        weapon: Option<&str>,
    ) -> Result<CombatResult, ActionError> {
        let a = self.roster.get(attacker)?;
        let d = self.roster.get(defender)?;
        let weapon = weapon.and_then(|name| a.weapon(name));
        let result = resolve_attack(a, d, weapon, self.dice.as_mut());
        self.last_rolls = result.roll.all_rolls();
        self.last_combat = Some(result.clone());
        Ok(result)
    }

    /// Feed a result's unsaved damage into the defender's damage pipeline
    pub fn apply_combat_result(&mut self, result: &CombatResult) -> Result<DamageOutcome, ActionError> {
        let outcome = self.damage_unit(result.defender, result.damage)?;
        self.last_rolls.extend(&outcome.ward_rolls);
        Ok(outcome)
    }

    fn damage_unit(&mut self, id: UnitId, amount: i32) -> Result<DamageOutcome, ActionError> {
        let outcome = self.roster.take_damage(id, amount, self.dice.as_mut())?;
        self.report_damage(&outcome);
        Ok(outcome)
    }

    fn report_damage(&mut self, outcome: &DamageOutcome) {
        self.emit(GameEvent::UnitDamaged(outcome.clone()));
        if outcome.destroyed {
            self.emit(GameEvent::UnitDestroyed { unit: outcome.unit });
            self.refresh_engagement();
        }
    }

    pub fn activate_unit_ability(
        &mut self,
        unit: UnitId,
        name: &str,
        target: Option<UnitId>,
    ) -> Result<ActivationRecord, ActionError> {
        self.activate(unit, AbilityKind::Unit, name, target)
    }

    pub fn activate_model_ability(
        &mut self,
        unit: UnitId,
        name: &str,
        target: Option<UnitId>,
    ) -> Result<ActivationRecord, ActionError> {
        self.activate(unit, AbilityKind::Model, name, target)
    }

    /// Reactive abilities may be used on the opponent's turn
    fn activate(
        &mut self,
        unit: UnitId,
        kind: AbilityKind,
        name: &str,
        target: Option<UnitId>,
    ) -> Result<ActivationRecord, ActionError> {
        let source = self.roster.get(unit)?;
        let category = match kind {
            AbilityKind::Unit => source.unit_ability(name).map(|a| a.category),
            AbilityKind::Model => source.model_ability(name).map(|m| m.ability.category),
        };
        self.require_user(source, category)?;

        let ctx = AbilityContext {
            phase: self.turn.phase(),
            turn: self.turn.turn(),
            board: self.board.as_ref(),
            dice: self.dice.as_mut(),
        };
        let record = self
            .abilities
            .activate(&mut self.roster, unit, kind, name, target, ctx)?;

        self.emit(GameEvent::AbilityActivated {
            unit,
            ability: record.ability.clone(),
            target,
        });
        for applied in &record.applied {
            self.report_applied(applied);
        }
        Ok(record)
    }

    fn report_applied(&mut self, applied: &AppliedEffect) {
        match applied {
            AppliedEffect::Temporary { unit, effect } => self.emit(GameEvent::EffectAdded {
                unit: *unit,
                effect: effect.clone(),
            }),
            AppliedEffect::Healed { unit, amount } => self.emit(GameEvent::UnitHealed {
                unit: *unit,
                amount: *amount,
            }),
            AppliedEffect::Damaged(outcome) => {
                self.last_rolls = outcome.ward_rolls.clone();
                self.report_damage(outcome);
            }
            AppliedEffect::StatChanged { .. }
            | AppliedEffect::RuleChanged { .. }
            | AppliedEffect::Skipped => {}
        }
    }

    // Heroic traits

    pub fn trait_catalog(&self) -> &TraitCatalog {
        &self.traits
    }

    /// Give one of `player`'s heroes a trait from the catalog
    pub fn apply_heroic_trait(
        &mut self,
        player: PlayerId,
        unit: UnitId,
        name: &str,
    ) -> Result<(), ActionError> {
        let heroic = self
            .traits
            .get(name)
            .cloned()
            .ok_or_else(|| ActionError::UnknownTrait(name.to_string()))?;
        let target = self.roster.get_mut(unit)?;
        if target.owner != player {
            return Err(ActionError::InvalidTarget(format!(
                "{} does not command {}",
                player, target.name
            )));
        }
        traits::apply_trait(target, &heroic)?;
        self.emit(GameEvent::HeroicTraitApplied {
            unit,
            name: heroic.name,
        });
        Ok(())
    }

    pub fn remove_heroic_trait(&mut self, unit: UnitId) -> Result<Option<HeroicTrait>, ActionError> {
        let removed = traits::remove_trait(self.roster.get_mut(unit)?);
        if let Some(heroic) = &removed {
            self.emit(GameEvent::HeroicTraitRemoved {
                unit,
                name: heroic.name.clone(),
            });
        }
        Ok(removed)
    }

    /// Traits held by `player`'s units
    pub fn heroic_traits(&self, player: PlayerId) -> Vec<(UnitId, &HeroicTrait)> {
        self.roster
            .units_of(player)
            .filter_map(|u| u.heroic_trait.as_ref().map(|t| (u.id, t)))
            .collect()
    }

    /// Attach a temporary effect directly
    pub fn add_effect(&mut self, id: UnitId, effect: TemporaryEffect) -> Result<(), ActionError> {
        self.roster.get_mut(id)?.effects.add(effect.clone());
        self.emit(GameEvent::EffectAdded { unit: id, effect });
        Ok(())
    }

    /// Remove every effect with this name, returning how many went
    pub fn remove_effect(&mut self, id: UnitId, name: &str) -> Result<usize, ActionError> {
        Ok(self.roster.get_mut(id)?.effects.remove(name))
    }

    /// Spend command points on a catalog ability. Without a target the points
    /// are spent and nothing else happens.
    pub fn use_command_ability(
        &mut self,
        player: PlayerId,
        name: &str,
        target: Option<UnitId>,
    ) -> Result<CommandReport, ActionError> {
        if !self.turn.is_playing() {
            return Err(ActionError::GameNotStarted);
        }
        let phase = self.turn.phase();
        let target_unit = target.map(|t| self.roster.get(t)).transpose()?;
        let activation = self.points.activate(
            player,
            name,
            phase,
            target_unit,
            &self.roster,
            self.board.as_ref(),
        )?;

        self.emit(GameEvent::PointsChanged {
            player,
            old: activation.change.old,
            new: activation.change.new,
        });
        self.emit(GameEvent::CommandAbilityUsed {
            player,
            ability: activation.ability.name.clone(),
            target,
        });

        let mut rolls = Vec::new();
        let applied = match (target, activation.ability.effect) {
            (None, _) => None,
            (Some(unit), CommandEffect::Modifier(effect)) => Some(apply_effect(
                &mut self.roster,
                unit,
                &effect,
                &activation.ability.name,
                phase,
                self.dice.as_mut(),
            )?),
            (Some(unit), CommandEffect::Rally) => {
                let rally = rally_roll(self.dice.as_mut());
                debug!("Rally for {}: {:?} -> {} points", unit, rally.rolls, rally.points);
                rolls = rally.rolls;
                self.last_rolls = rolls.clone();
                let amount = self.roster.heal(unit, rally.points as i32)?;
                Some(AppliedEffect::Healed { unit, amount })
            }
        };
        if let Some(applied) = &applied {
            self.report_applied(applied);
        }

        Ok(CommandReport {
            activation,
            applied,
            rolls,
        })
    }

    // Queries

    pub fn state(&self) -> GameState {
        self.turn.state()
    }

    pub fn phase(&self) -> Phase {
        self.turn.phase()
    }

    pub fn active_player(&self) -> PlayerId {
        self.turn.active_player()
    }

    pub fn turn_number(&self) -> u32 {
        self.turn.turn()
    }

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn board(&self) -> &dyn Board {
        self.board.as_ref()
    }

    pub fn unit(&self, id: UnitId) -> Result<&Unit, ActionError> {
        self.roster.get(id)
    }

    pub fn effective_stats(&self, id: UnitId) -> Result<EffectiveStats, ActionError> {
        self.roster.get(id).map(effective_stats)
    }

    pub fn effective(&self, id: UnitId, stat: Stat) -> Result<i32, ActionError> {
        self.roster.get(id).map(|u| effective(u, stat))
    }

    pub fn active_effects(&self, id: UnitId) -> Result<Vec<TemporaryEffect>, ActionError> {
        self.roster.get(id).map(|u| u.effects.iter().cloned().collect())
    }

    pub fn command_points(&self, player: PlayerId) -> Option<&PlayerCommandPoints> {
        self.points.pool(player)
    }

    pub fn points_ledger(&self) -> &[PointsChange] {
        self.points.ledger()
    }

    pub fn command_catalog(&self) -> &[CommandAbility] {
        self.points.catalog()
    }

    /// Abilities the unit could activate right now without a target
    pub fn available_abilities(&self, id: UnitId) -> Result<Vec<String>, ActionError> {
        let unit = self.roster.get(id)?;
        Ok(self
            .abilities
            .available(unit, self.turn.phase(), self.board.as_ref())
            .into_iter()
            .filter(|name| {
                let category = unit
                    .unit_ability(name)
                    .map(|a| a.category)
                    .or_else(|| unit.model_ability(name).map(|m| m.ability.category));
                self.require_user(unit, category).is_ok()
            })
            .map(str::to_string)
            .collect())
    }

    pub fn available_command_abilities(&self, player: PlayerId) -> Vec<&CommandAbility> {
        if !self.turn.is_playing() {
            return Vec::new();
        }
        self.points
            .available_abilities(player, self.turn.phase(), &self.roster)
    }

    pub fn ability_history(&self) -> &[ActivationRecord] {
        self.abilities.history()
    }

    pub fn last_combat(&self) -> Option<&CombatResult> {
        self.last_combat.as_ref()
    }

    pub fn last_rolls(&self) -> &[u32] {
        &self.last_rolls
    }

    pub fn events(&self) -> &EventLog {
        &self.log
    }

    pub fn events_mut(&mut self) -> &mut EventLog {
        &mut self.log
    }
}
