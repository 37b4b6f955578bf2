//! Starting credits, fuel, parts, warrants and token stacks.

use serde::{Deserialize, Serialize};

use super::template_callouts;
use crate::{
    conflict::{detect, Attributed, Conflict, ConflictSide},
    models::{
        rule::callouts_for, Callout, CalloutCategory, Configuration, Resource, RichText, Rule,
        RuleDomain, RuleEffect, RuleSource, Step,
    },
};

/// A stack of tokens every player places in front of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenStack {
    pub token: String,
    pub per_player: u32,
    /// Total tokens for the whole table.
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDetails {
    pub credits: i32,
    pub fuel: i32,
    pub parts: i32,
    pub warrants: i32,
    /// Where the credit base came from; `None` means the standard amount.
    pub credits_source: Option<Attributed<i32>>,
    pub disabled: Vec<Resource>,
    pub token_stacks: Vec<TokenStack>,
    pub conflict: Option<Conflict<i32>>,
    pub callouts: Vec<Callout>,
}

impl ResourceDetails {
    pub fn amount(&self, resource: Resource) -> i32 {
        match resource {
            Resource::Credits => self.credits,
            Resource::Fuel => self.fuel,
            Resource::Parts => self.parts,
            Resource::Warrants => self.warrants,
        }
    }
}

struct Resolved {
    amount: i32,
    base: Option<Attributed<i32>>,
    conflict: Option<Conflict<i32>>,
}

/// Resolve starting resources for `step`.
///
/// `selection` is the table's choice when manual conflict resolution is on.
pub fn resolve_resources(
    config: &Configuration,
    step: &Step,
    rules: &[Rule],
    selection: Option<ConflictSide>,
) -> ResourceDetails {
    let manual = config.optional_rules.resolve_conflicts_manually;
    let mut disabled = Vec::new();
    let mut amounts = [0; 4];
    let mut credits_source = None;
    let mut credit_conflict = None;

    for (slot, resource) in Resource::ALL.into_iter().enumerate() {
        if is_disabled(rules, resource) {
            disabled.push(resource);
            continue;
        }
        let resolved = resolve_one(resource, step, rules, manual, selection);
        amounts[slot] = resolved.amount;
        if resource == Resource::Credits {
            credits_source = resolved.base;
            credit_conflict = resolved.conflict;
        }
    }

    let token_stacks = rules
        .iter()
        .filter_map(|rule| match &rule.effect {
            RuleEffect::CreateTokenStack { token, per_player } => Some(TokenStack {
                token: token.clone(),
                per_player: *per_player,
                count: per_player
                    .saturating_mul(u32::try_from(config.player_count).unwrap_or(u32::MAX)),
            }),
            _ => None,
        })
        .collect();

    let mut callouts = template_callouts(&step.overrides.notes);
    callouts.extend(callouts_for(rules, RuleDomain::Resources));
    if let Some(conflict) = credit_conflict.as_ref().filter(|_| manual && selection.is_none()) {
        callouts.push(conflict_callout(conflict));
    }

    let [credits, fuel, parts, warrants] = amounts;
    ResourceDetails {
        credits,
        fuel,
        parts,
        warrants,
        credits_source,
        disabled,
        token_stacks,
        conflict: credit_conflict,
        callouts,
    }
}

fn resolve_one(
    resource: Resource,
    step: &Step,
    rules: &[Rule],
    manual: bool,
    selection: Option<ConflictSide>,
) -> Resolved {
    let story_value = story_absolute(rules, resource);
    let template_value = template_absolute(step, resource);
    let bonus: i32 = rules
        .iter()
        .filter_map(|rule| match rule.effect {
            RuleEffect::AddResource {
                resource: declared,
                amount,
            } if declared == resource => Some(amount),
            _ => None,
        })
        .sum::<i32>()
        + template_bonus(step, resource);

    let conflict = detect(story_value.clone(), template_value.clone());
    let side = match &conflict {
        Some(conflict) => conflict.winning_side(manual, selection),
        None if story_value.is_some() => ConflictSide::Story,
        None => ConflictSide::ScenarioTemplate,
    };

    let (amount, base) = match side {
        ConflictSide::Story => {
            let base = story_value;
            (base.as_ref().map(|value| value.value).unwrap_or_default(), base)
        }
        ConflictSide::ScenarioTemplate => {
            let start = template_value
                .as_ref()
                .map(|value| value.value)
                .unwrap_or_else(|| resource.standard_amount());
            (start.saturating_add(bonus), template_value)
        }
    };

    Resolved {
        amount: amount.max(0),
        base,
        conflict,
    }
}

fn story_absolute(rules: &[Rule], resource: Resource) -> Option<Attributed<i32>> {
    rules.iter().find_map(|rule| match rule.effect {
        RuleEffect::SetResource {
            resource: declared,
            amount,
        } if declared == resource => Some(Attributed::new(
            amount,
            rule.source,
            rule.source_name.clone(),
        )),
        _ => None,
    })
}

fn template_absolute(step: &Step, resource: Resource) -> Option<Attributed<i32>> {
    match resource {
        Resource::Credits => step.overrides.starting_credits.map(|amount| {
            Attributed::new(
                amount,
                RuleSource::ScenarioTemplate,
                step.template_name.clone(),
            )
        }),
        _ => None,
    }
}

fn template_bonus(step: &Step, resource: Resource) -> i32 {
    match resource {
        Resource::Credits => step.overrides.credits_bonus.unwrap_or(0),
        _ => 0,
    }
}

fn is_disabled(rules: &[Rule], resource: Resource) -> bool {
    rules.iter().any(|rule| {
        matches!(rule.effect, RuleEffect::DisableResource { resource: declared } if declared == resource)
    })
}

fn conflict_callout(conflict: &Conflict<i32>) -> Callout {
    Callout::new(
        CalloutCategory::Warning,
        "Starting Credits Disagree",
        RichText::parse(&format!(
            "**{}** sets ${} but **{}** sets ${}. Pick one before handing out credits.",
            conflict.story.source_name,
            conflict.story.value,
            conflict.template.source_name,
            conflict.template.value
        )),
    )
}
