//! Temporary effects and stat resolution
//!
//! Each unit owns an [`EffectStore`]: named, phase-scoped modifiers with a
//! fixed expiry phase. Expiry is swept once per phase transition by the
//! session; readers never filter lazily.
//!
//! - Stat modifiers fold into [`effective`]
//! - Rule grants (fly, run-and-charge, ...) fold into `Unit::has_rule`

mod resolve;

pub use resolve::{effective, effective_from, effective_stats, permanent_modifier, EffectiveStats};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::turn::Phase;
use crate::units::{Rule, Stat};

/// What a temporary effect modifies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectTarget {
    Stat(Stat),
    Rule(Rule),
}

impl std::fmt::Display for EffectTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectTarget::Stat(s) => write!(f, "{}", s),
            EffectTarget::Rule(r) => write!(f, "{}", r),
        }
    }
}

/// A phase-scoped modifier. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporaryEffect {
    /// Lookup/removal key (usually the granting ability's name)
    pub name: String,
    pub target: EffectTarget,
    /// Signed modifier (for rule grants, > 0 grants the rule)
    pub value: i32,
    pub applied_at: Phase,
    pub expires_at: Phase,
}

impl TemporaryEffect {
    /// A stat modifier
    pub fn stat(name: &str, stat: Stat, value: i32, applied_at: Phase, expires_at: Phase) -> Self {
        Self {
            name: name.to_string(),
            target: EffectTarget::Stat(stat),
            value,
            applied_at,
            expires_at,
        }
    }

    /// A temporary rule grant
    pub fn rule(name: &str, rule: Rule, applied_at: Phase, expires_at: Phase) -> Self {
        Self {
            name: name.to_string(),
            target: EffectTarget::Rule(rule),
            value: 1,
            applied_at,
            expires_at,
        }
    }
}

impl std::fmt::Display for TemporaryEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.target {
            EffectTarget::Stat(stat) => write!(
                f,
                "{}: {} {:+} (until {})",
                self.name, stat, self.value, self.expires_at
            ),
            EffectTarget::Rule(rule) => {
                write!(f, "{}: {} (until {})", self.name, rule, self.expires_at)
            }
        }
    }
}

/// Effects on a single unit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectStore {
    effects: Vec<TemporaryEffect>,
}

impl EffectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an effect (effects with the same name stack)
    pub fn add(&mut self, effect: TemporaryEffect) {
        debug!("Effect added: {}", effect);
        self.effects.push(effect);
    }

    /// Remove every effect with this name, returning how many were removed
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.effects.len();
        self.effects.retain(|e| e.name != name);
        before - self.effects.len()
    }

    /// Drop every effect expiring on entry into `phase`, returning them
    pub fn sweep(&mut self, phase: Phase) -> Vec<TemporaryEffect> {
        let (expired, kept): (Vec<_>, Vec<_>) = self
            .effects
            .drain(..)
            .partition(|e| e.expires_at == phase);
        self.effects = kept;
        expired
    }

    /// Signed sum of all modifiers targeting `stat`
    pub fn total(&self, stat: Stat) -> i32 {
        self.effects
            .iter()
            .filter(|e| e.target == EffectTarget::Stat(stat))
            .map(|e| e.value)
            .sum()
    }

    /// Whether an active effect grants `rule`
    pub fn grants(&self, rule: Rule) -> bool {
        self.effects
            .iter()
            .any(|e| e.target == EffectTarget::Rule(rule) && e.value > 0)
    }

    pub fn has(&self, name: &str) -> bool {
        self.effects.iter().any(|e| e.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TemporaryEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}
