//! Effective stat resolution
//!
//! effective = clamp(base + temporary modifiers + passive permanent modifiers)

use serde::{Deserialize, Serialize};

use crate::abilities::{AbilityCategory, AbilityEffectKind, EffectDuration, TargetSelector};
use crate::units::{Stat, Unit};

/// A unit's effective value for `stat`
pub fn effective(unit: &Unit, stat: Stat) -> i32 {
    effective_from(unit, stat, unit.base(stat))
}

/// Effective value starting from an overriding base (a weapon profile)
pub fn effective_from(unit: &Unit, stat: Stat, base: i32) -> i32 {
    let delta = unit.effects.total(stat) + permanent_modifier(unit, stat);
    stat.modify(base, delta, unit.stats.max_wounds)
}

/// Sum of passive, permanent, self-targeted stat modifiers held by the unit,
/// plus its heroic trait. Model abilities only count while the unit fields
/// the required model.
pub fn permanent_modifier(unit: &Unit, stat: Stat) -> i32 {
    let unit_level = unit.unit_abilities.iter();
    let model_level = unit
        .model_abilities
        .iter()
        .filter(|m| unit.models.has(m.requires))
        .map(|m| &m.ability);

    let from_abilities: i32 = unit_level
        .chain(model_level)
        .filter(|a| a.category == AbilityCategory::Passive)
        .flat_map(|a| a.effects.iter())
        .filter(|e| e.duration == EffectDuration::Permanent && e.target == TargetSelector::Self_)
        .map(|e| match e.kind {
            AbilityEffectKind::StatModifier { stat: s, value } if s == stat => value,
            _ => 0,
        })
        .sum();
    from_abilities + unit.heroic_trait.as_ref().map_or(0, |t| t.modifier(stat))
}

/// Snapshot of every effective characteristic, for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveStats {
    pub move_inches: i32,
    pub wounds: i32,
    pub max_wounds: i32,
    pub bravery: i32,
    pub save: i32,
    pub attacks: i32,
    pub to_hit: i32,
    pub to_wound: i32,
    pub rend: i32,
    pub damage: i32,
}

pub fn effective_stats(unit: &Unit) -> EffectiveStats {
    EffectiveStats {
        move_inches: effective(unit, Stat::Move),
        wounds: effective(unit, Stat::Wounds),
        max_wounds: unit.stats.max_wounds,
        bravery: effective(unit, Stat::Bravery),
        save: effective(unit, Stat::Save),
        attacks: effective(unit, Stat::Attacks),
        to_hit: effective(unit, Stat::ToHit),
        to_wound: effective(unit, Stat::ToWound),
        rend: effective(unit, Stat::Rend),
        damage: effective(unit, Stat::Damage),
    }
}
