#![allow(missing_docs)]

//! Which already-shown steps a newly chosen story would change.

use crate::models::{step::ids, GameFlag, Rule, RuleDomain, RuleEffect, Vessel};

/// Steps a single rule can affect.
pub fn affected_steps(effect: &RuleEffect) -> &'static [&'static str] {
    match effect {
        RuleEffect::SetResource { .. }
        | RuleEffect::AddResource { .. }
        | RuleEffect::DisableResource { .. }
        | RuleEffect::CreateTokenStack { .. } => &[ids::RESOURCES],
        RuleEffect::ForbidContact { .. }
        | RuleEffect::AllowContacts { .. }
        | RuleEffect::SetJobMode { .. } => &[ids::JOBS],
        RuleEffect::SetNavMode { .. } => &[ids::NAV_DECKS],
        RuleEffect::MultiplyPrime { .. } | RuleEffect::AddPrime { .. } => &[ids::PRIMING],
        RuleEffect::SetShipPlacement { vessel, .. } => match vessel {
            Vessel::Leader => &[ids::DRAFT],
            Vessel::AllianceCruiser | Vessel::ReaverCutter => &[ids::ALLIANCE_REAVER],
        },
        RuleEffect::AddCallout { domain, .. } => domain_steps(*domain),
        RuleEffect::Flag { flag } => flag_steps(*flag),
    }
}

fn domain_steps(domain: RuleDomain) -> &'static [&'static str] {
    match domain {
        RuleDomain::General => &[],
        RuleDomain::Jobs => &[ids::JOBS],
        RuleDomain::Resources => &[ids::RESOURCES],
        RuleDomain::Nav => &[ids::NAV_DECKS],
        RuleDomain::Alliance => &[ids::ALLIANCE_REAVER],
        RuleDomain::Priming => &[ids::PRIMING],
        RuleDomain::Draft => &[ids::DRAFT],
        RuleDomain::GameLength => &[ids::GAME_LENGTH],
    }
}

fn flag_steps(flag: GameFlag) -> &'static [&'static str] {
    match flag {
        GameFlag::HavenPlacement => &[ids::DRAFT],
        GameFlag::AllianceAlertTokens => &[ids::ALLIANCE_REAVER],
        // Played out at the table, not during setup.
        GameFlag::NoSureThings | GameFlag::DoubleBounties | GameFlag::DisgruntledStart => &[],
    }
}

/// The subset of `shown`, in its order, that `rules` would change.
pub fn stale_steps(rules: &[Rule], shown: &[String]) -> Vec<String> {
    let mut stale: Vec<String> = Vec::new();
    for id in shown {
        if stale.contains(id) {
            continue;
        }
        if rules
            .iter()
            .any(|rule| affected_steps(&rule.effect).contains(&id.as_str()))
        {
            stale.push(id.clone());
        }
    }
    stale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Contact, NavMode, Resource, RichText};

    fn shown(list: &[&str]) -> Vec<String> {
        list.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn only_shown_steps_are_reported() {
        let rules = [
            Rule::story(
                "Harken's Folly",
                RuleEffect::SetResource {
                    resource: Resource::Credits,
                    amount: 4000,
                },
            ),
            Rule::story(
                "Harken's Folly",
                RuleEffect::ForbidContact {
                    contact: Contact::Harken,
                },
            ),
        ];
        let stale = stale_steps(&rules, &shown(&[ids::STORY, ids::NAV_DECKS, ids::RESOURCES]));
        assert_eq!(stale, vec![ids::RESOURCES.to_string()]);
    }

    #[test]
    fn result_follows_flow_order() {
        let rules = [
            Rule::story(
                "Reavers Rising",
                RuleEffect::SetNavMode {
                    mode: NavMode::Reshuffle,
                },
            ),
            Rule::story(
                "Reavers Rising",
                RuleEffect::SetShipPlacement {
                    vessel: Vessel::ReaverCutter,
                    location: "Regina".to_string(),
                },
            ),
        ];
        let flow = shown(&[ids::STORY, ids::NAV_DECKS, ids::ALLIANCE_REAVER, ids::DRAFT]);
        assert_eq!(
            stale_steps(&rules, &flow),
            vec![ids::NAV_DECKS.to_string(), ids::ALLIANCE_REAVER.to_string()]
        );
    }

    #[test]
    fn gameplay_flags_and_general_callouts_are_inert() {
        let rules = [
            Rule::story(
                "Desperadoes",
                RuleEffect::Flag {
                    flag: GameFlag::DoubleBounties,
                },
            ),
            Rule::story(
                "First Time in the Captain's Chair",
                RuleEffect::AddCallout {
                    domain: RuleDomain::General,
                    title: "Welcome".to_string(),
                    content: RichText::plain("Read the story card aloud."),
                    category: None,
                },
            ),
        ];
        let flow: Vec<String> = ids::STANDARD_ORDER.iter().map(|id| id.to_string()).collect();
        assert!(stale_steps(&rules, &flow).is_empty());
    }

    #[test]
    fn haven_flag_marks_draft() {
        let rules = [Rule::story(
            "A Fistful of Scoundrels",
            RuleEffect::Flag {
                flag: GameFlag::HavenPlacement,
            },
        )];
        assert_eq!(
            stale_steps(&rules, &shown(&[ids::DRAFT, ids::DRAFT])),
            vec![ids::DRAFT.to_string()]
        );
    }
}
