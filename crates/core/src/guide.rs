#![allow(missing_docs)]

//! Step render model: the composed flow with resolved details and sorted callouts.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    callouts::sort_and_filter,
    catalog::{Catalog, StoryCard},
    conflict::ConflictSide,
    flow::compose,
    impact::stale_steps,
    models::{
        rule::callouts_for, step::ids, Callout, CalloutCategory, Configuration, DetailMode,
        RichText, Rule, RuleDomain, Step,
    },
    resolve::{
        active_rules, resolve_alliance, resolve_draft, resolve_game_length, resolve_jobs,
        resolve_nav, resolve_priming, resolve_resources, story_rules, template_callouts,
        AllianceDetails,
        DraftDetails, GameLengthDetails, JobDetails, NavDetails, PrimingDetails, ResourceDetails,
    },
};

/// Conflict choices the table has made so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selections {
    pub credits: Option<ConflictSide>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeView {
    pub id: String,
    pub label: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryDetails {
    pub title: String,
    pub summary: String,
    /// Module labels, with placeholders for ids the catalog does not know.
    pub requirements: Vec<String>,
    pub challenges: Vec<ChallengeView>,
    pub callouts: Vec<Callout>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionalRulesDetails {
    pub enabled: Vec<String>,
    pub callouts: Vec<Callout>,
}

/// Resolved content of one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepDetails {
    Story(StoryDetails),
    GameLength(GameLengthDetails),
    Nav(NavDetails),
    Alliance(AllianceDetails),
    Draft(DraftDetails),
    Resources(ResourceDetails),
    Jobs(JobDetails),
    Priming(PrimingDetails),
    OptionalRules(OptionalRulesDetails),
    /// Steps with nothing to resolve, such as the final hand-off.
    Plain,
}

impl StepDetails {
    pub fn callouts(&self) -> &[Callout] {
        match self {
            StepDetails::Story(details) => &details.callouts,
            StepDetails::GameLength(details) => &details.callouts,
            StepDetails::Nav(details) => &details.callouts,
            StepDetails::Alliance(details) => &details.callouts,
            StepDetails::Draft(details) => &details.callouts,
            StepDetails::Resources(details) => &details.callouts,
            StepDetails::Jobs(details) => &details.callouts,
            StepDetails::Priming(details) => &details.callouts,
            StepDetails::OptionalRules(details) => &details.callouts,
            StepDetails::Plain => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepView {
    pub step: Step,
    pub details: StepDetails,
    /// Display-ready callouts for the step.
    pub callouts: Vec<Callout>,
}

/// Compose the flow and resolve every step of it.
pub fn build_guide(
    catalog: &Catalog,
    config: &Configuration,
    selections: Selections,
    detail_mode: DetailMode,
) -> Vec<StepView> {
    let story = catalog.selected_story(config);
    let rules = active_rules(story, config);
    compose(catalog, config)
        .into_iter()
        .map(|step| {
            let details = resolve_step(&step, config, story, &rules, selections);
            let callouts = sort_and_filter(details.callouts().to_vec(), detail_mode);
            StepView {
                step,
                details,
                callouts,
            }
        })
        .collect()
}

/// Steps at or before `cursor` whose content the selected story changes.
pub fn stale_since(catalog: &Catalog, config: &Configuration, cursor: usize) -> Vec<String> {
    let steps = compose(catalog, config);
    let shown: Vec<String> = steps
        .iter()
        .take(cursor.saturating_add(1))
        .map(|step| step.id.clone())
        .collect();
    let rules = catalog
        .selected_story(config)
        .map(|story| story_rules(story, config))
        .unwrap_or_default();
    stale_steps(&rules, &shown)
}

fn resolve_step(
    step: &Step,
    config: &Configuration,
    story: Option<&StoryCard>,
    rules: &[Rule],
    selections: Selections,
) -> StepDetails {
    match step.id.as_str() {
        ids::STORY => StepDetails::Story(story_details(step, config, story, rules)),
        ids::GAME_LENGTH => StepDetails::GameLength(resolve_game_length(config, step, rules)),
        ids::NAV_DECKS => StepDetails::Nav(resolve_nav(config, step, rules)),
        ids::ALLIANCE_REAVER => StepDetails::Alliance(resolve_alliance(config, step, rules)),
        ids::DRAFT => StepDetails::Draft(resolve_draft(config, step, rules)),
        ids::RESOURCES => {
            StepDetails::Resources(resolve_resources(config, step, rules, selections.credits))
        }
        ids::JOBS => StepDetails::Jobs(resolve_jobs(config, step, rules)),
        ids::PRIMING => StepDetails::Priming(resolve_priming(config, step, rules)),
        ids::OPTIONAL_RULES => StepDetails::OptionalRules(optional_rules_details(step, config)),
        _ => StepDetails::Plain,
    }
}

fn story_details(
    step: &Step,
    config: &Configuration,
    story: Option<&StoryCard>,
    rules: &[Rule],
) -> StoryDetails {
    let mut callouts = template_callouts(&step.overrides.notes);
    let Some(story) = story else {
        let missing = config.story_card.as_deref().unwrap_or_default();
        debug!(story = %missing, "Selected story not in catalog");
        let content = if missing.is_empty() {
            RichText::plain("Pick a story card before continuing.")
        } else {
            RichText::plain(format!("[unknown story: {missing}]"))
        };
        callouts.push(Callout::new(CalloutCategory::Warning, "No Story Card", content));
        return StoryDetails {
            title: String::new(),
            summary: String::new(),
            requirements: Vec::new(),
            challenges: Vec::new(),
            callouts,
        };
    };

    callouts.extend(callouts_for(rules, RuleDomain::General));
    StoryDetails {
        title: story.title.clone(),
        summary: story.summary.clone(),
        requirements: story.requirement_labels(),
        challenges: story
            .challenges
            .iter()
            .map(|challenge| ChallengeView {
                id: challenge.id.clone(),
                label: challenge.label.clone(),
                enabled: config.challenge_enabled(&challenge.id),
            })
            .collect(),
        callouts,
    }
}

fn optional_rules_details(step: &Step, config: &Configuration) -> OptionalRulesDetails {
    let optional = &config.optional_rules;
    let mut enabled: Vec<String> = [
        (optional.resolve_conflicts_manually, "Resolve Conflicts Manually"),
        (optional.high_volume_supply, "High Volume Supply"),
        (optional.optional_ship_upgrades, "Optional Ship Upgrades"),
    ]
    .into_iter()
    .filter(|(on, _)| *on)
    .map(|(_, label)| label.to_string())
    .collect();
    if config.is_solo() {
        enabled.extend(
            [
                (config.solo.no_sure_things, "No Sure Things"),
                (config.solo.extra_goal_push, "Extra Goal Push"),
            ]
            .into_iter()
            .filter(|(on, _)| *on)
            .map(|(_, label)| label.to_string()),
        );
    }

    let mut callouts = template_callouts(&step.overrides.notes);
    if enabled.is_empty() {
        callouts.push(Callout::new(
            CalloutCategory::Info,
            "Optional Rules",
            RichText::plain("No optional rules are in play."),
        ));
    }
    OptionalRulesDetails { enabled, callouts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpansionId, JobMode};

    fn view<'a>(guide: &'a [StepView], id: &str) -> &'a StepView {
        guide
            .iter()
            .find(|view| view.step.id == id)
            .expect("step in guide")
    }

    #[test]
    fn default_guide_resolves_standard_values() -> anyhow::Result<()> {
        let catalog = Catalog::builtin()?;
        let guide = build_guide(
            &catalog,
            &Configuration::default(),
            Selections::default(),
            DetailMode::Concise,
        );
        assert_eq!(guide.len(), ids::STANDARD_ORDER.len());
        match &view(&guide, ids::RESOURCES).details {
            StepDetails::Resources(details) => assert_eq!(details.credits, 3000),
            other => panic!("unexpected details: {other:?}"),
        }
        match &view(&guide, ids::STORY).details {
            StepDetails::Story(details) => {
                assert_eq!(details.title, "First Time in the Captain's Chair")
            }
            other => panic!("unexpected details: {other:?}"),
        }
        assert_eq!(view(&guide, ids::BEGIN).details, StepDetails::Plain);
        Ok(())
    }

    #[test]
    fn story_rules_flow_into_resolved_steps() -> anyhow::Result<()> {
        let catalog = Catalog::builtin()?;
        let mut config = Configuration {
            story_card: Some("desperadoes".to_string()),
            ..Configuration::default()
        };
        config.expansions.set(ExpansionId::Pirates, true);
        let guide = build_guide(&catalog, &config, Selections::default(), DetailMode::Concise);
        match &view(&guide, ids::JOBS).details {
            StepDetails::Jobs(details) => {
                assert_eq!(details.mode, JobMode::NoJobs);
                assert!(details.contacts.is_empty());
            }
            other => panic!("unexpected details: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn manual_conflict_selection_reaches_resources() -> anyhow::Result<()> {
        let catalog = Catalog::builtin()?;
        let mut config = Configuration {
            setup_card: "browncoat_way".to_string(),
            story_card: Some("harkens_folly".to_string()),
            ..Configuration::default()
        };
        config.optional_rules.resolve_conflicts_manually = true;

        let pending = build_guide(&catalog, &config, Selections::default(), DetailMode::Concise);
        let pending = view(&pending, ids::RESOURCES);
        assert!(pending
            .callouts
            .iter()
            .any(|callout| callout.category == CalloutCategory::Warning));
        match &pending.details {
            StepDetails::Resources(details) => {
                assert_eq!(details.credits, 4000);
                assert!(details.conflict.is_some());
            }
            other => panic!("unexpected details: {other:?}"),
        }

        let chosen = build_guide(
            &catalog,
            &config,
            Selections {
                credits: Some(ConflictSide::ScenarioTemplate),
            },
            DetailMode::Concise,
        );
        match &view(&chosen, ids::RESOURCES).details {
            StepDetails::Resources(details) => assert_eq!(details.credits, 12000),
            other => panic!("unexpected details: {other:?}"),
        }
        Ok(())
    }

    #[test]
    fn module_callouts_follow_detail_mode() -> anyhow::Result<()> {
        let catalog = Catalog::builtin()?;
        let mut config = Configuration::default();
        config.expansions.set(ExpansionId::BlueSun, true);

        let concise = build_guide(&catalog, &config, Selections::default(), DetailMode::Concise);
        let detailed = build_guide(&catalog, &config, Selections::default(), DetailMode::Detailed);
        let modules = |guide: &[StepView]| {
            view(guide, ids::NAV_DECKS)
                .callouts
                .iter()
                .filter(|callout| callout.category == CalloutCategory::Module)
                .count()
        };
        assert_eq!(modules(&concise), 0);
        assert_eq!(modules(&detailed), 1);
        Ok(())
    }

    #[test]
    fn unknown_story_becomes_warning() -> anyhow::Result<()> {
        let catalog = Catalog::builtin()?;
        let config = Configuration {
            story_card: Some("lost_in_the_black".to_string()),
            ..Configuration::default()
        };
        let guide = build_guide(&catalog, &config, Selections::default(), DetailMode::Concise);
        let story = view(&guide, ids::STORY);
        assert_eq!(story.callouts.len(), 1);
        assert_eq!(story.callouts[0].category, CalloutCategory::Warning);
        assert!(story.callouts[0]
            .content
            .to_plain_string()
            .contains("lost_in_the_black"));
        Ok(())
    }

    #[test]
    fn stale_since_only_reports_steps_up_to_cursor() -> anyhow::Result<()> {
        let catalog = Catalog::builtin()?;
        let config = Configuration {
            story_card: Some("harkens_folly".to_string()),
            ..Configuration::default()
        };
        let resources_at = ids::STANDARD_ORDER
            .iter()
            .position(|id| *id == ids::RESOURCES)
            .unwrap_or_default();

        assert!(stale_since(&catalog, &config, resources_at - 1).is_empty());
        assert_eq!(
            stale_since(&catalog, &config, resources_at),
            vec![ids::RESOURCES.to_string()]
        );
        assert_eq!(
            stale_since(&catalog, &config, usize::MAX),
            vec![ids::RESOURCES.to_string(), ids::JOBS.to_string()]
        );
        Ok(())
    }

    #[test]
    fn optional_rules_do_not_mark_steps_stale() -> anyhow::Result<()> {
        let catalog = Catalog::builtin()?;
        let mut config = Configuration {
            story_card: Some("harkens_folly".to_string()),
            ..Configuration::default()
        };
        config.optional_rules.high_volume_supply = true;
        config.optional_rules.optional_ship_upgrades = true;

        let stale = stale_since(&catalog, &config, usize::MAX);
        assert!(!stale.contains(&ids::PRIMING.to_string()));
        assert!(!stale.contains(&ids::DRAFT.to_string()));
        assert_eq!(stale, vec![ids::RESOURCES.to_string(), ids::JOBS.to_string()]);
        Ok(())
    }

    #[test]
    fn guide_is_stable_across_calls() -> anyhow::Result<()> {
        let catalog = Catalog::builtin()?;
        let mut config = Configuration {
            story_card: Some("running_on_empty".to_string()),
            ..Configuration::default()
        };
        config.expansions.set(ExpansionId::BreakinAtmo, true);
        config.expansions.set(ExpansionId::Tenth, true);
        assert_eq!(
            build_guide(&catalog, &config, Selections::default(), DetailMode::Detailed),
            build_guide(&catalog, &config, Selections::default(), DetailMode::Detailed)
        );
        Ok(())
    }
}
