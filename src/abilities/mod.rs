//! Unit and model abilities
//!
//! - [`Ability`]: phases, range, cooldown, conditions and effects
//! - [`ModelAbility`]: an ability that needs a specific model in the unit
//! - [`AbilityEngine`]: eligibility checks and effect application

mod ability;
mod condition;
mod effect;
mod engine;

pub use ability::{Ability, AbilityCategory, ModelAbility};
pub use condition::{read_attribute, AbilityCondition, Comparison};
pub use effect::{AbilityEffect, AbilityEffectKind, EffectDuration, TargetSelector};
pub use engine::{
    apply_effect, AbilityContext, AbilityEngine, AbilityKind, ActivationRecord, AppliedEffect,
};
