use serde::{Deserialize, Serialize};

use super::{has_flag, template_callouts};
use crate::models::{
    rule::callouts_for, Callout, CalloutCategory, Configuration, ExpansionId, GameFlag, RichText,
    Rule, RuleDomain, RuleEffect, Step, Vessel,
};

pub const STANDARD_CRUISER_LOCATION: &str = "Londinium";
pub const STANDARD_REAVER_LOCATION: &str = "Miranda";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllianceDetails {
    pub cruiser: String,
    /// One location per Reaver Cutter, primary cutter first.
    pub reavers: Vec<String>,
    pub alert_tokens: bool,
    pub callouts: Vec<Callout>,
}

pub fn resolve_alliance(config: &Configuration, step: &Step, rules: &[Rule]) -> AllianceDetails {
    let cruiser = placement(rules, Vessel::AllianceCruiser)
        .or_else(|| step.overrides.alliance_cruiser.clone())
        .unwrap_or_else(|| STANDARD_CRUISER_LOCATION.to_string());
    let primary_reaver = placement(rules, Vessel::ReaverCutter)
        .or_else(|| step.overrides.reaver_cutter.clone())
        .unwrap_or_else(|| STANDARD_REAVER_LOCATION.to_string());

    let mut reavers = vec![primary_reaver];
    let mut callouts = Vec::new();
    for (module, border) in [
        (ExpansionId::BlueSun, "Blue Sun Border"),
        (ExpansionId::Kalidasa, "Kalidasa Border"),
    ] {
        if config.expansions.is_active(module) {
            reavers.push(border.to_string());
            callouts.push(Callout::new(
                CalloutCategory::Module,
                module.label(),
                RichText::parse(&format!("Place an extra **Reaver Cutter** in the {border}.")),
            ));
        }
    }
    if config.expansions.is_active(ExpansionId::Crime) {
        callouts.push(Callout::new(
            CalloutCategory::Module,
            ExpansionId::Crime.label(),
            RichText::parse("Keep the **Alert Tokens** beside the board for Alliance Contact."),
        ));
    }

    callouts.extend(template_callouts(&step.overrides.notes));
    callouts.extend(callouts_for(rules, RuleDomain::Alliance));

    AllianceDetails {
        cruiser,
        reavers,
        alert_tokens: has_flag(rules, GameFlag::AllianceAlertTokens),
        callouts,
    }
}

/// First location a rule declares for `vessel`.
pub(crate) fn placement(rules: &[Rule], vessel: Vessel) -> Option<String> {
    rules.iter().find_map(|rule| match &rule.effect {
        RuleEffect::SetShipPlacement {
            vessel: declared,
            location,
        } if *declared == vessel => Some(location.clone()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::StepEntry, models::step::ids};

    fn step() -> Step {
        StepEntry::plain(ids::ALLIANCE_REAVER).to_step("Standard Game Setup")
    }

    #[test]
    fn standard_positions() {
        let details = resolve_alliance(&Configuration::default(), &step(), &[]);
        assert_eq!(details.cruiser, "Londinium");
        assert_eq!(details.reavers, vec!["Miranda".to_string()]);
        assert!(!details.alert_tokens);
        assert!(details.callouts.is_empty());
    }

    #[test]
    fn story_placement_and_flags_apply() {
        let rules = [
            Rule::story(
                "Reavers Rising",
                RuleEffect::SetShipPlacement {
                    vessel: Vessel::ReaverCutter,
                    location: "Regina".to_string(),
                },
            ),
            Rule::story(
                "Reavers Rising",
                RuleEffect::Flag {
                    flag: GameFlag::AllianceAlertTokens,
                },
            ),
        ];
        let mut entry = StepEntry::plain(ids::ALLIANCE_REAVER);
        entry.overrides.reaver_cutter = Some("Ezra".to_string());
        entry.overrides.alliance_cruiser = Some("Bernadette".to_string());
        let details = resolve_alliance(
            &Configuration::default(),
            &entry.to_step("Custom"),
            &rules,
        );
        assert_eq!(details.reavers[0], "Regina");
        assert_eq!(details.cruiser, "Bernadette");
        assert!(details.alert_tokens);
    }

    #[test]
    fn modules_add_cutters() {
        let mut config = Configuration::default();
        config.expansions.set(ExpansionId::BlueSun, true);
        config.expansions.set(ExpansionId::Kalidasa, true);
        let details = resolve_alliance(&config, &step(), &[]);
        assert_eq!(
            details.reavers,
            vec!["Miranda", "Blue Sun Border", "Kalidasa Border"]
        );
        assert!(details
            .callouts
            .iter()
            .all(|callout| callout.category == CalloutCategory::Module));
    }
}
