use serde::{Deserialize, Serialize};

use super::{alliance::placement, has_flag, template_callouts};
use crate::models::{
    rule::callouts_for, Callout, Configuration, GameFlag, Rule, RuleDomain, Step, Vessel,
};

pub const STANDARD_LEADER_PLACEMENT: &str =
    "Any sector without the Alliance Cruiser or a Reaver Cutter";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftDetails {
    pub leader_placement: String,
    pub haven_placement: bool,
    /// Single-player setups skip the roll-off entirely.
    pub skip_draft: bool,
    pub callouts: Vec<Callout>,
}

pub fn resolve_draft(config: &Configuration, step: &Step, rules: &[Rule]) -> DraftDetails {
    let leader_placement = placement(rules, Vessel::Leader)
        .or_else(|| step.overrides.leader_placement.clone())
        .unwrap_or_else(|| STANDARD_LEADER_PLACEMENT.to_string());

    let mut callouts = template_callouts(&step.overrides.notes);
    callouts.extend(callouts_for(rules, RuleDomain::Draft));

    DraftDetails {
        leader_placement,
        haven_placement: has_flag(rules, GameFlag::HavenPlacement) || step.overrides.haven_placement,
        skip_draft: step.overrides.skip_draft || config.is_solo(),
        callouts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::StepEntry,
        models::{step::ids, RuleEffect},
    };

    #[test]
    fn defaults_for_multiplayer() {
        let step = StepEntry::plain(ids::DRAFT).to_step("Standard Game Setup");
        let details = resolve_draft(&Configuration::default(), &step, &[]);
        assert_eq!(details.leader_placement, STANDARD_LEADER_PLACEMENT);
        assert!(!details.haven_placement);
        assert!(!details.skip_draft);
    }

    #[test]
    fn haven_flag_and_story_placement() {
        let rules = [
            Rule::story(
                "A Fistful of Scoundrels",
                RuleEffect::Flag {
                    flag: GameFlag::HavenPlacement,
                },
            ),
            Rule::story(
                "A Fistful of Scoundrels",
                RuleEffect::SetShipPlacement {
                    vessel: Vessel::Leader,
                    location: "Silverhold".to_string(),
                },
            ),
        ];
        let mut entry = StepEntry::plain(ids::DRAFT);
        entry.overrides.leader_placement = Some("Your Haven".to_string());
        let details = resolve_draft(
            &Configuration::default(),
            &entry.to_step("Home Sweet Haven"),
            &rules,
        );
        assert_eq!(details.leader_placement, "Silverhold");
        assert!(details.haven_placement);
    }

    #[test]
    fn solo_tables_skip_the_draft() {
        let config = Configuration {
            player_count: 1,
            ..Configuration::default()
        }
        .normalized();
        let step = StepEntry::plain(ids::DRAFT).to_step("Standard Game Setup");
        assert!(resolve_draft(&config, &step, &[]).skip_draft);
    }
}
