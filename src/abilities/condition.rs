//! Ability eligibility guards

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::effect::TargetSelector;
use crate::effects::effective;
use crate::units::{Attribute, Unit};

/// Comparison operator for a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    Equal,
    NotEqual,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
}

impl Comparison {
    pub fn holds(&self, lhs: i32, rhs: i32) -> bool {
        match self {
            Comparison::Equal => lhs == rhs,
            Comparison::NotEqual => lhs != rhs,
            Comparison::GreaterThan => lhs > rhs,
            Comparison::GreaterOrEqual => lhs >= rhs,
            Comparison::LessThan => lhs < rhs,
            Comparison::LessOrEqual => lhs <= rhs,
        }
    }
}

impl FromStr for Comparison {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "==" | "=" | "eq" => Ok(Comparison::Equal),
            "!=" | "ne" => Ok(Comparison::NotEqual),
            ">" | "gt" => Ok(Comparison::GreaterThan),
            ">=" | "ge" => Ok(Comparison::GreaterOrEqual),
            "<" | "lt" => Ok(Comparison::LessThan),
            "<=" | "le" => Ok(Comparison::LessOrEqual),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Comparison::Equal => "==",
            Comparison::NotEqual => "!=",
            Comparison::GreaterThan => ">",
            Comparison::GreaterOrEqual => ">=",
            Comparison::LessThan => "<",
            Comparison::LessOrEqual => "<=",
        };
        write!(f, "{}", s)
    }
}

/// A guard read off the user or its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbilityCondition {
    pub attribute: Attribute,
    pub op: Comparison,
    pub value: i32,
    #[serde(default)]
    pub subject: TargetSelector,
}

impl AbilityCondition {
    pub fn new(attribute: Attribute, op: Comparison, value: i32) -> Self {
        Self {
            attribute,
            op,
            value,
            subject: TargetSelector::Self_,
        }
    }

    pub fn on(mut self, subject: TargetSelector) -> Self {
        self.subject = subject;
        self
    }

    /// Whether the condition holds. Fails when the subject does not resolve.
    pub fn evaluate(&self, source: &Unit, target: Option<&Unit>) -> bool {
        match self.subject.resolve(source, target) {
            Some(unit) => self.op.holds(read_attribute(unit, self.attribute), self.value),
            None => false,
        }
    }
}

impl std::fmt::Display for AbilityCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.attribute, self.op, self.value)
    }
}

/// Numeric value of an attribute; flags read as 0/1
pub fn read_attribute(unit: &Unit, attribute: Attribute) -> i32 {
    let flag = |b: bool| if b { 1 } else { 0 };
    match attribute {
        Attribute::Stat(stat) => effective(unit, stat),
        Attribute::MaxWounds => unit.stats.max_wounds,
        Attribute::ModelCount => unit.model_count as i32,
        Attribute::HasMoved => flag(unit.actions.has_moved),
        Attribute::HasShot => flag(unit.actions.has_shot),
        Attribute::HasCharged => flag(unit.actions.has_charged),
        Attribute::HasFought => flag(unit.actions.has_fought),
        Attribute::IsEngaged => flag(unit.engaged),
        Attribute::IsHero => flag(unit.roles.hero),
        Attribute::IsGeneral => flag(unit.roles.general),
        Attribute::IsWizard => flag(unit.roles.wizard),
        Attribute::IsPriest => flag(unit.roles.priest),
    }
}
