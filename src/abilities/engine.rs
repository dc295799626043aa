//! Ability activation
//!
//! Eligibility order: cooldown, phase, model role, conditions, range.
//! Effects are applied in order once every check has passed.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::ability::{Ability, ModelAbility};
use super::effect::{AbilityEffect, AbilityEffectKind};
use crate::board::Board;
use crate::combat::{DamageOutcome, DiceSource};
use crate::effects::TemporaryEffect;
use crate::error::ActionError;
use crate::turn::Phase;
use crate::units::{Roster, Rule, Stat, Unit, UnitId};

/// Which of a unit's ability lists to look in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityKind {
    Unit,
    Model,
}

/// What applying one effect did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppliedEffect {
    /// Base stat changed directly
    StatChanged { unit: UnitId, stat: Stat, value: i32 },
    Temporary { unit: UnitId, effect: TemporaryEffect },
    Healed { unit: UnitId, amount: i32 },
    Damaged(DamageOutcome),
    RuleChanged { unit: UnitId, rule: Rule, enabled: bool },
    /// The selector did not resolve to a live unit
    Skipped,
}

/// A successful activation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationRecord {
    pub unit: UnitId,
    pub ability: String,
    pub kind: AbilityKind,
    pub target: Option<UnitId>,
    pub phase: Phase,
    pub turn: u32,
    pub applied: Vec<AppliedEffect>,
}

/// Where and when an activation happens
pub struct AbilityContext<'a> {
    pub phase: Phase,
    pub turn: u32,
    pub board: &'a dyn Board,
    pub dice: &'a mut dyn DiceSource,
}

/// Evaluates and applies unit and model abilities
#[derive(Debug, Clone, Default)]
pub struct AbilityEngine {
    history: Vec<ActivationRecord>,
}

impl AbilityEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Successful activations, oldest first
    pub fn history(&self) -> &[ActivationRecord] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Check whether `source` may activate `ability` now
    pub fn check(
        &self,
        ability: &Ability,
        source: &Unit,
        target: Option<&Unit>,
        phase: Phase,
        board: &dyn Board,
    ) -> Result<(), ActionError> {
        if ability.on_cooldown() {
            return Err(ActionError::AlreadyUsed {
                ability: ability.name.clone(),
            });
        }
        if !ability.usable_in(phase) {
            return Err(ActionError::WrongPhase {
                current: phase,
                allowed: ability.phases.clone(),
            });
        }
        self.check_conditions_and_range(ability, source, target, board)
    }

    /// Model abilities also need the unit to field the required model
    pub fn check_model(
        &self,
        model: &ModelAbility,
        source: &Unit,
        target: Option<&Unit>,
        phase: Phase,
        board: &dyn Board,
    ) -> Result<(), ActionError> {
        let ability = &model.ability;
        if ability.on_cooldown() {
            return Err(ActionError::AlreadyUsed {
                ability: ability.name.clone(),
            });
        }
        if !ability.usable_in(phase) {
            return Err(ActionError::WrongPhase {
                current: phase,
                allowed: ability.phases.clone(),
            });
        }
        if !source.models.has(model.requires) {
            return Err(ActionError::MissingModelRole {
                ability: ability.name.clone(),
                role: model.requires,
            });
        }
        self.check_conditions_and_range(ability, source, target, board)
    }

    fn check_conditions_and_range(
        &self,
        ability: &Ability,
        source: &Unit,
        target: Option<&Unit>,
        board: &dyn Board,
    ) -> Result<(), ActionError> {
        if let Some(failed) = ability
            .conditions
            .iter()
            .find(|c| !c.evaluate(source, target))
        {
            return Err(ActionError::ConditionFailed {
                ability: ability.name.clone(),
                condition: failed.to_string(),
            });
        }

        if let Some(target) = target {
            if ability.range > 0.0 && !board.within(&source.position, &target.position, ability.range)
            {
                return Err(ActionError::OutOfRange {
                    distance: board.distance_inches(&source.position, &target.position),
                    range: ability.range,
                });
            }
        }
        Ok(())
    }

    /// Abilities of `unit` that could be activated now without a target
    pub fn available<'u>(&self, unit: &'u Unit, phase: Phase, board: &dyn Board) -> Vec<&'u str> {
        let unit_level = unit
            .unit_abilities
            .iter()
            .filter(|a| a.category != super::AbilityCategory::Passive)
            .filter(|a| self.check(a, unit, None, phase, board).is_ok())
            .map(|a| a.name.as_str());
        let model_level = unit
            .model_abilities
            .iter()
            .filter(|m| m.ability.category != super::AbilityCategory::Passive)
            .filter(|m| self.check_model(m, unit, None, phase, board).is_ok())
            .map(|m| m.ability.name.as_str());
        unit_level.chain(model_level).collect()
    }

    /// Validate and fire an ability, applying its effects in order
    pub fn activate(
        &mut self,
        roster: &mut Roster,
        unit: UnitId,
        kind: AbilityKind,
        name: &str,
        target: Option<UnitId>,
        ctx: AbilityContext<'_>,
    ) -> Result<ActivationRecord, ActionError> {
        let source = roster.get(unit)?;
        let target_unit = target.map(|t| roster.get(t)).transpose()?;

        let ability = match kind {
            AbilityKind::Unit => {
                let ability = source
                    .unit_ability(name)
                    .ok_or_else(|| ActionError::UnknownAbility(name.to_string()))?;
                self.check(ability, source, target_unit, ctx.phase, ctx.board)
                    .map(|_| ability.clone())
            }
            AbilityKind::Model => {
                let model = source
                    .model_ability(name)
                    .ok_or_else(|| ActionError::UnknownAbility(name.to_string()))?;
                self.check_model(model, source, target_unit, ctx.phase, ctx.board)
                    .map(|_| model.ability.clone())
            }
        }
        .inspect_err(|e| debug!("{} cannot use {}: {}", source.name, name, e))?;

        // Resolve every selector before anything changes
        let affected: Vec<Option<UnitId>> = ability
            .effects
            .iter()
            .map(|e| e.target.resolve(source, target_unit).map(|u| u.id))
            .collect();
        let source_name = source.name.clone();

        let mut applied = Vec::with_capacity(ability.effects.len());
        for (effect, who) in ability.effects.iter().zip(affected) {
            let outcome = match who {
                Some(id) if roster.contains(id) => {
                    apply_effect(roster, id, effect, &ability.name, ctx.phase, &mut *ctx.dice)?
                }
                _ => AppliedEffect::Skipped,
            };
            applied.push(outcome);
        }

        if let Ok(u) = roster.get_mut(unit) {
            let used = match kind {
                AbilityKind::Unit => u.unit_ability_mut(name),
                AbilityKind::Model => u.model_ability_mut(name).map(|m| &mut m.ability),
            };
            if let Some(a) = used {
                a.mark_used();
            }
        }

        info!("{} activated {}", source_name, ability.name);
        let record = ActivationRecord {
            unit,
            ability: ability.name.clone(),
            kind,
            target,
            phase: ctx.phase,
            turn: ctx.turn,
            applied,
        };
        self.history.push(record.clone());
        Ok(record)
    }
}

/// Apply one effect to one unit.
///
/// Instant and permanent durations change the unit itself (wounds through the
/// damage/heal pipeline); phase- and turn-scoped ones attach a temporary effect
/// named after the ability.
pub fn apply_effect(
    roster: &mut Roster,
    unit: UnitId,
    effect: &AbilityEffect,
    name: &str,
    phase: Phase,
    dice: &mut dyn DiceSource,
) -> Result<AppliedEffect, ActionError> {
    let expiry = effect.duration.expiry(phase);

    let applied = match (effect.kind, expiry) {
        (AbilityEffectKind::Heal { amount }, _) => AppliedEffect::Healed {
            unit,
            amount: roster.heal(unit, amount)?,
        },
        (AbilityEffectKind::Damage { amount }, _) => {
            AppliedEffect::Damaged(roster.take_damage(unit, amount, dice)?)
        }
        // Wounds are never a modifier: any duration heals or damages now
        (AbilityEffectKind::StatModifier { stat: Stat::Wounds, value }, _) => {
            if value >= 0 {
                AppliedEffect::Healed {
                    unit,
                    amount: roster.heal(unit, value)?,
                }
            } else {
                AppliedEffect::Damaged(roster.take_damage(unit, -value, dice)?)
            }
        }
        (AbilityEffectKind::StatModifier { stat, value }, Some(expires_at)) => {
            let temp = TemporaryEffect::stat(name, stat, value, phase, expires_at);
            roster.get_mut(unit)?.effects.add(temp.clone());
            AppliedEffect::Temporary { unit, effect: temp }
        }
        (AbilityEffectKind::StatModifier { stat, value }, None) => {
            let value = roster.get_mut(unit)?.stats.adjust(stat, value);
            AppliedEffect::StatChanged { unit, stat, value }
        }
        (kind, expiry) => {
            let Some((rule, enabled)) = kind.rule() else {
                return Ok(AppliedEffect::Skipped);
            };
            let target = roster.get_mut(unit)?;
            match expiry {
                Some(expires_at) if enabled => {
                    let temp = TemporaryEffect::rule(name, rule, phase, expires_at);
                    target.effects.add(temp.clone());
                    AppliedEffect::Temporary { unit, effect: temp }
                }
                Some(_) => {
                    debug!("Temporary removal of {} is not supported", rule);
                    AppliedEffect::Skipped
                }
                None => {
                    target.set_rule(rule, enabled);
                    AppliedEffect::RuleChanged {
                        unit,
                        rule,
                        enabled,
                    }
                }
            }
        }
    };
    Ok(applied)
}
