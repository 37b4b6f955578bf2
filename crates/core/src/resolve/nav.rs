use serde::{Deserialize, Serialize};

use super::template_callouts;
use crate::models::{
    rule::callouts_for, Callout, CalloutCategory, Configuration, ExpansionId, NavMode, RichText,
    Rule, RuleDomain, RuleEffect, Step,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavDetails {
    pub mode: NavMode,
    /// Modules whose nav cards are shuffled in.
    pub included_modules: Vec<ExpansionId>,
    pub callouts: Vec<Callout>,
}

const NAV_MODULES: [ExpansionId; 2] = [ExpansionId::BlueSun, ExpansionId::Kalidasa];

pub fn resolve_nav(config: &Configuration, step: &Step, rules: &[Rule]) -> NavDetails {
    let mode = rules
        .iter()
        .find_map(|rule| match rule.effect {
            RuleEffect::SetNavMode { mode } => Some(mode),
            _ => None,
        })
        .or(step.overrides.nav_mode)
        .unwrap_or_default();

    let included_modules: Vec<ExpansionId> = NAV_MODULES
        .into_iter()
        .filter(|id| config.expansions.is_active(*id))
        .collect();

    let mut callouts: Vec<Callout> = included_modules
        .iter()
        .map(|id| {
            Callout::new(
                CalloutCategory::Module,
                id.label(),
                RichText::parse(&format!(
                    "Shuffle the **{}** Alliance and Border Nav cards into their decks.",
                    id.label()
                )),
            )
        })
        .collect();
    callouts.extend(template_callouts(&step.overrides.notes));
    callouts.extend(callouts_for(rules, RuleDomain::Nav));

    NavDetails {
        mode,
        included_modules,
        callouts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::StepEntry, models::step::ids};

    fn step(nav_mode: Option<NavMode>) -> Step {
        let mut entry = StepEntry::plain(ids::NAV_DECKS);
        entry.overrides.nav_mode = nav_mode;
        entry.to_step("Clearer Skies, Better Days")
    }

    #[test]
    fn precedence_story_then_template_then_standard() {
        let config = Configuration::default();
        assert_eq!(resolve_nav(&config, &step(None), &[]).mode, NavMode::Standard);
        assert_eq!(
            resolve_nav(&config, &step(Some(NavMode::ClearSkies)), &[]).mode,
            NavMode::ClearSkies
        );
        let rules = [Rule::story(
            "Reavers Rising",
            RuleEffect::SetNavMode {
                mode: NavMode::Reshuffle,
            },
        )];
        assert_eq!(
            resolve_nav(&config, &step(Some(NavMode::ClearSkies)), &rules).mode,
            NavMode::Reshuffle
        );
    }

    #[test]
    fn module_callouts_follow_activation_flags() {
        let mut config = Configuration::default();
        assert!(resolve_nav(&config, &step(None), &[]).callouts.is_empty());

        config.expansions.set(ExpansionId::Kalidasa, true);
        let details = resolve_nav(&config, &step(None), &[]);
        assert_eq!(details.included_modules, vec![ExpansionId::Kalidasa]);
        assert_eq!(details.callouts.len(), 1);
        assert_eq!(details.callouts[0].category, CalloutCategory::Module);
    }
}
