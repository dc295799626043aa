//! Built-in command abilities

use serde::{Deserialize, Serialize};

use crate::abilities::{AbilityEffect, EffectDuration, TargetSelector};
use crate::turn::Phase;
use crate::units::{CombatFlag, MoraleFlag, MovementFlag, Rule, Stat, Unit};

/// Default command range (inches)
pub const COMMAND_RANGE: f32 = 12.0;

/// What a command ability does to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandEffect {
    /// A single ability-style effect on the target
    Modifier(AbilityEffect),
    /// Rally roll; each point heals one wound
    Rally,
}

impl CommandEffect {
    /// Whether the target can receive this effect at all
    pub fn accepts(&self, target: &Unit) -> bool {
        match self {
            CommandEffect::Rally => !target.engaged,
            CommandEffect::Modifier(_) => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandAbility {
    pub name: String,
    pub description: String,
    pub cost: u32,
    /// Inches from a friendly hero to the target
    pub range: f32,
    pub phase: Phase,
    pub effect: CommandEffect,
}

impl CommandAbility {
    fn new(name: &str, description: &str, phase: Phase, effect: CommandEffect) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            cost: 1,
            range: COMMAND_RANGE,
            phase,
            effect,
        }
    }
}

fn modifier(stat: Stat, value: i32, duration: EffectDuration) -> CommandEffect {
    CommandEffect::Modifier(AbilityEffect::stat(TargetSelector::Target, stat, value, duration))
}

fn grant(rule: Rule, duration: EffectDuration) -> CommandEffect {
    CommandEffect::Modifier(AbilityEffect::grant(TargetSelector::Target, rule, duration))
}

/// The standard command abilities
pub fn builtin_catalog() -> Vec<CommandAbility> {
    use EffectDuration::{UntilEndOfPhase, UntilEndOfTurn};

    vec![
        CommandAbility::new(
            "All-out Attack",
            "+1 to hit rolls for the target until the end of the phase",
            Phase::Combat,
            modifier(Stat::ToHit, 1, UntilEndOfPhase),
        ),
        CommandAbility::new(
            "All-out Defence",
            "+1 to save rolls for the target until the end of the phase",
            Phase::Combat,
            modifier(Stat::Save, 1, UntilEndOfPhase),
        ),
        CommandAbility::new(
            "Rally",
            "Roll six dice; each 4+ heals one wound. Engaged units cannot rally",
            Phase::Hero,
            CommandEffect::Rally,
        ),
        CommandAbility::new(
            "At the Double",
            "The target can run and still charge this turn",
            Phase::Movement,
            grant(Rule::Movement(MovementFlag::RunAndCharge), UntilEndOfTurn),
        ),
        CommandAbility::new(
            "Forward to Victory",
            "The target can run and charge this phase",
            Phase::Charge,
            grant(Rule::Movement(MovementFlag::RunAndCharge), UntilEndOfPhase),
        ),
        CommandAbility::new(
            "Inspiring Presence",
            "The target ignores battleshock this turn",
            Phase::Hero,
            grant(Rule::Morale(MoraleFlag::IgnoreBattleshock), UntilEndOfTurn),
        ),
        CommandAbility::new(
            "Unleash Hell",
            "The target can run and still shoot this phase",
            Phase::Shooting,
            grant(Rule::Movement(MovementFlag::RunAndShoot), UntilEndOfPhase),
        ),
        CommandAbility::new(
            "Redeploy",
            "The target can make an extra move this phase",
            Phase::Movement,
            grant(Rule::Movement(MovementFlag::ExtraMove), UntilEndOfPhase),
        ),
        CommandAbility::new(
            "Counter-charge",
            "The target can make an extra charge this phase",
            Phase::Charge,
            grant(Rule::Combat(CombatFlag::ExtraCharge), UntilEndOfPhase),
        ),
    ]
}
