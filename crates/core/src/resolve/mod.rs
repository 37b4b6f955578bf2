#![allow(missing_docs)]

//! Directive resolvers, one per setup domain.
//!
//! Every resolver is a pure function of the configuration, the step's template
//! overrides and the active story rules. For absolute values the story wins over
//! the setup card, which wins over the standard default.

pub mod alliance;
pub mod draft;
pub mod game_length;
pub mod jobs;
pub mod nav;
pub mod priming;
pub mod resources;

pub use alliance::{resolve_alliance, AllianceDetails};
pub use draft::{resolve_draft, DraftDetails};
pub use game_length::{resolve_game_length, GameLengthDetails};
pub use jobs::{resolve_jobs, JobDetails};
pub use nav::{resolve_nav, NavDetails};
pub use priming::{resolve_priming, PrimingDetails};
pub use resources::{resolve_resources, ResourceDetails, TokenStack};

use crate::{
    catalog::StoryCard,
    models::{
        Callout, CalloutCategory, Configuration, GameFlag, RichText, Rule, RuleDomain, RuleEffect,
        RuleSource, TemplateNote,
    },
};

/// Rules in effect for the selected story, in priority order.
///
/// Enabled challenge options come first so that "first match wins" lets a
/// challenge override the story it modifies. Optional-rule and solo-option
/// rules follow the story's own rules.
pub fn active_rules(story: Option<&StoryCard>, config: &Configuration) -> Vec<Rule> {
    let mut rules = story
        .map(|story| story_rules(story, config))
        .unwrap_or_default();
    rules.extend(optional_rule_rules(config));
    rules.extend(solo_option_rules(config));
    rules
}

/// The story's own rules, preceded by its enabled challenge options.
pub fn story_rules(story: &StoryCard, config: &Configuration) -> Vec<Rule> {
    let mut rules: Vec<Rule> = story
        .challenges
        .iter()
        .filter(|challenge| config.challenge_enabled(&challenge.id))
        .flat_map(|challenge| challenge.rules.iter().cloned())
        .collect();
    rules.extend(story.rules.iter().cloned());
    rules
}

fn optional_rule_rules(config: &Configuration) -> Vec<Rule> {
    let mut rules = Vec::new();
    if config.optional_rules.high_volume_supply {
        rules.push(Rule::new(
            RuleSource::OptionalRule,
            "High Volume Supply",
            RuleEffect::AddPrime { amount: 3 },
        ));
    }
    if config.optional_rules.optional_ship_upgrades {
        rules.push(Rule::new(
            RuleSource::OptionalRule,
            "Optional Ship Upgrades",
            RuleEffect::AddCallout {
                domain: RuleDomain::Draft,
                title: "Optional Ship Upgrades".to_string(),
                content: RichText::parse(
                    "Deal each player one **Ship Upgrade** after ships are placed.",
                ),
                category: None,
            },
        ));
    }
    rules
}

fn solo_option_rules(config: &Configuration) -> Vec<Rule> {
    if !config.is_solo() {
        return Vec::new();
    }
    let mut rules = Vec::new();
    if config.solo.no_sure_things {
        rules.push(Rule::new(
            RuleSource::OptionalRule,
            "No Sure Things",
            RuleEffect::Flag {
                flag: GameFlag::NoSureThings,
            },
        ));
    }
    if config.solo.extra_goal_push {
        rules.push(Rule::new(
            RuleSource::OptionalRule,
            "Extra Goal Push",
            RuleEffect::AddCallout {
                domain: RuleDomain::GameLength,
                title: "Extra Goal Push".to_string(),
                content: RichText::parse(
                    "Discard one extra token whenever you complete a **Story Goal**.",
                ),
                category: None,
            },
        ));
    }
    rules
}

/// Template notes rendered as scenario-template callouts.
pub(crate) fn template_callouts(notes: &[TemplateNote]) -> Vec<Callout> {
    notes
        .iter()
        .map(|note| {
            Callout::new(
                CalloutCategory::ScenarioTemplate,
                note.title.clone(),
                note.content.clone(),
            )
        })
        .collect()
}

pub(crate) fn has_flag(rules: &[Rule], flag: GameFlag) -> bool {
    rules
        .iter()
        .any(|rule| matches!(rule.effect, RuleEffect::Flag { flag: declared } if declared == flag))
}
