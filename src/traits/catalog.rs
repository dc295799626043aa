//! Built-in heroic traits

use crate::abilities::{Ability, AbilityEffect, EffectDuration, TargetSelector};
use crate::turn::Phase;
use crate::units::{MoraleFlag, Rule, Stat};

use super::HeroicTrait;

/// The standard heroic traits, grouped by faction
pub fn builtin_traits() -> Vec<HeroicTrait> {
    vec![
        HeroicTrait::new(
            "Lightning Strike",
            "Stormcast Eternals",
            "Once per battle, add 6\" to this hero's charge range for the phase",
        )
        .with_ability(
            Ability::active("Lightning Strike")
                .in_phases(&[Phase::Charge])
                .once_per_battle()
                .with_effect(AbilityEffect::stat(
                    TargetSelector::Self_,
                    Stat::Move,
                    6,
                    EffectDuration::UntilEndOfPhase,
                )),
        ),
        HeroicTrait::new(
            "Unbreakable",
            "Stormcast Eternals",
            "This hero ignores battleshock",
        )
        .with_rule(Rule::Morale(MoraleFlag::IgnoreBattleshock)),
        HeroicTrait::new(
            "Sigmar's Chosen",
            "Stormcast Eternals",
            "+1 to save rolls for attacks that target this hero",
        )
        .with_modifier(Stat::Save, 1),
        HeroicTrait::new(
            "Brutal Cunning",
            "Orruk Warclans",
            "All-out Attack costs no command points",
        )
        .waiving("All-out Attack"),
        HeroicTrait::new(
            "Waaagh! Leader",
            "Orruk Warclans",
            "+1 to the Damage characteristic of this hero",
        )
        .with_modifier(Stat::Damage, 1),
        HeroicTrait::new(
            "Disciplined Commander",
            "Cities of Sigmar",
            "Inspiring Presence costs no command points",
        )
        .waiving("Inspiring Presence"),
    ]
}
