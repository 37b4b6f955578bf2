use serde::{Deserialize, Serialize};

use super::template_callouts;
use crate::models::{rule::callouts_for, Callout, Configuration, Rule, RuleDomain, RuleEffect, Step};

/// Cards discarded from each supply deck under standard rules.
pub const STANDARD_PRIME_COUNT: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimingDetails {
    pub base: u32,
    pub multiplier: u32,
    pub bonus: u32,
    /// Cards discarded from each supply deck: `base * multiplier + bonus`.
    pub discard_count: u32,
    pub callouts: Vec<Callout>,
}

pub fn resolve_priming(_config: &Configuration, step: &Step, rules: &[Rule]) -> PrimingDetails {
    let base = step.overrides.prime_base.unwrap_or(STANDARD_PRIME_COUNT);

    let mut multiplier = step.overrides.prime_multiplier.unwrap_or(1);
    let mut bonus = 0u32;
    for rule in rules {
        match rule.effect {
            RuleEffect::MultiplyPrime { factor } => multiplier = multiplier.saturating_mul(factor),
            RuleEffect::AddPrime { amount } => bonus = bonus.saturating_add(amount),
            _ => {}
        }
    }

    let mut callouts = template_callouts(&step.overrides.notes);
    callouts.extend(callouts_for(rules, RuleDomain::Priming));

    PrimingDetails {
        base,
        multiplier,
        bonus,
        discard_count: base.saturating_mul(multiplier).saturating_add(bonus),
        callouts,
    }
}
