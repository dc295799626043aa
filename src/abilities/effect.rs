//! What an ability does when it fires

use serde::{Deserialize, Serialize};

use crate::turn::Phase;
use crate::units::{CombatFlag, MoraleFlag, MovementFlag, Rule, SpecialFlag, Stat, Unit};

/// Which unit an effect (or condition) applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TargetSelector {
    /// The unit using the ability
    #[default]
    #[serde(rename = "Self")]
    Self_,
    /// The ability's target, whoever owns it
    Target,
    /// The target if it is friendly, otherwise the user
    Friendly,
    /// The target if it is an enemy, otherwise nothing
    Enemy,
}

impl TargetSelector {
    /// Pick the affected unit from the user and the optional target
    pub fn resolve<'a>(&self, source: &'a Unit, target: Option<&'a Unit>) -> Option<&'a Unit> {
        match self {
            TargetSelector::Self_ => Some(source),
            TargetSelector::Target => target,
            TargetSelector::Friendly => match target {
                Some(t) if t.is_friendly_to(source) => Some(t),
                _ => Some(source),
            },
            TargetSelector::Enemy => target.filter(|t| !t.is_friendly_to(source)),
        }
    }
}

/// How long an effect lasts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EffectDuration {
    /// Applied once to the base value
    #[default]
    Instant,
    /// Until the start of the next player turn
    UntilEndOfTurn,
    /// Until the next phase begins
    UntilEndOfPhase,
    /// Applied to the base value for the rest of the game
    Permanent,
}

impl EffectDuration {
    /// Phase on whose entry a temporary effect applied in `current` expires.
    /// `None` for durations that mutate the unit directly.
    pub fn expiry(&self, current: Phase) -> Option<Phase> {
        match self {
            EffectDuration::UntilEndOfPhase => Some(current.next()),
            EffectDuration::UntilEndOfTurn => Some(Phase::Hero),
            EffectDuration::Instant | EffectDuration::Permanent => None,
        }
    }
}

/// The closed set of effect kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityEffectKind {
    StatModifier { stat: Stat, value: i32 },
    Heal { amount: i32 },
    Damage { amount: i32 },
    MovementFlag { flag: MovementFlag, enabled: bool },
    CombatFlag { flag: CombatFlag, enabled: bool },
    MoraleFlag { flag: MoraleFlag, enabled: bool },
    SpecialFlag { flag: SpecialFlag, enabled: bool },
}

impl AbilityEffectKind {
    /// The rule toggled by a flag effect
    pub fn rule(&self) -> Option<(Rule, bool)> {
        match *self {
            AbilityEffectKind::MovementFlag { flag, enabled } => Some((Rule::Movement(flag), enabled)),
            AbilityEffectKind::CombatFlag { flag, enabled } => Some((Rule::Combat(flag), enabled)),
            AbilityEffectKind::MoraleFlag { flag, enabled } => Some((Rule::Morale(flag), enabled)),
            AbilityEffectKind::SpecialFlag { flag, enabled } => Some((Rule::Special(flag), enabled)),
            _ => None,
        }
    }
}

impl std::fmt::Display for AbilityEffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbilityEffectKind::StatModifier { stat, value } => write!(f, "{} {:+}", stat, value),
            AbilityEffectKind::Heal { amount } => write!(f, "heal {}", amount),
            AbilityEffectKind::Damage { amount } => write!(f, "{} damage", amount),
            _ => match self.rule() {
                Some((rule, true)) => write!(f, "gain {}", rule),
                Some((rule, false)) => write!(f, "lose {}", rule),
                None => Ok(()),
            },
        }
    }
}

/// One effect of an ability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbilityEffect {
    pub kind: AbilityEffectKind,
    #[serde(default)]
    pub target: TargetSelector,
    #[serde(default)]
    pub duration: EffectDuration,
}

impl AbilityEffect {
    pub fn new(kind: AbilityEffectKind, target: TargetSelector, duration: EffectDuration) -> Self {
        Self {
            kind,
            target,
            duration,
        }
    }

    /// Stat modifier shorthand
    pub fn stat(target: TargetSelector, stat: Stat, value: i32, duration: EffectDuration) -> Self {
        Self::new(AbilityEffectKind::StatModifier { stat, value }, target, duration)
    }

    /// Grant a rule for a duration
    pub fn grant(target: TargetSelector, rule: Rule, duration: EffectDuration) -> Self {
        let kind = match rule {
            Rule::Movement(flag) => AbilityEffectKind::MovementFlag { flag, enabled: true },
            Rule::Combat(flag) => AbilityEffectKind::CombatFlag { flag, enabled: true },
            Rule::Morale(flag) => AbilityEffectKind::MoraleFlag { flag, enabled: true },
            Rule::Special(flag) => AbilityEffectKind::SpecialFlag { flag, enabled: true },
        };
        Self::new(kind, target, duration)
    }

    pub fn heal(target: TargetSelector, amount: i32) -> Self {
        Self::new(AbilityEffectKind::Heal { amount }, target, EffectDuration::Instant)
    }

    pub fn damage(target: TargetSelector, amount: i32) -> Self {
        Self::new(AbilityEffectKind::Damage { amount }, target, EffectDuration::Instant)
    }
}
