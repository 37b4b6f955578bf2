#![allow(missing_docs)]

//! Translation of the legacy flat `setup_config` story shape into tagged rules.

use serde::{Deserialize, Serialize};

use crate::models::{
    Contact, GameFlag, JobMode, NavMode, Resource, RichText, Rule, RuleDomain, RuleEffect,
};

/// Story setup overrides as older content tables declared them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacySetupConfig {
    pub starting_credits: Option<i32>,
    pub credits_bonus: Option<i32>,
    /// Players begin without fuel or parts.
    pub no_fuel_parts: bool,
    pub job_mode: Option<JobMode>,
    pub nav_mode: Option<NavMode>,
    pub prime_multiplier: Option<u32>,
    pub forbidden_contacts: Vec<Contact>,
    pub haven_placement: bool,
    /// Free text shown on the draft step.
    pub special_rule: Option<String>,
    pub goal_tokens_per_player: Option<u32>,
}

/// Convert a legacy config into rules attributed to the story named `story_name`.
///
/// Fields are visited in declaration order, so the output is stable.
pub fn normalize_legacy(legacy: &LegacySetupConfig, story_name: &str) -> Vec<Rule> {
    let mut rules = Vec::new();
    let mut push = |effect: RuleEffect| rules.push(Rule::story(story_name, effect));

    if let Some(amount) = legacy.starting_credits {
        push(RuleEffect::SetResource {
            resource: Resource::Credits,
            amount,
        });
    }
    if let Some(amount) = legacy.credits_bonus {
        push(RuleEffect::AddResource {
            resource: Resource::Credits,
            amount,
        });
    }
    if legacy.no_fuel_parts {
        push(RuleEffect::DisableResource {
            resource: Resource::Fuel,
        });
        push(RuleEffect::DisableResource {
            resource: Resource::Parts,
        });
    }
    if let Some(mode) = legacy.job_mode {
        push(RuleEffect::SetJobMode { mode });
    }
    if let Some(mode) = legacy.nav_mode {
        push(RuleEffect::SetNavMode { mode });
    }
    if let Some(factor) = legacy.prime_multiplier {
        push(RuleEffect::MultiplyPrime { factor });
    }
    for contact in &legacy.forbidden_contacts {
        push(RuleEffect::ForbidContact { contact: *contact });
    }
    if legacy.haven_placement {
        push(RuleEffect::Flag {
            flag: GameFlag::HavenPlacement,
        });
    }
    if let Some(text) = legacy
        .special_rule
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
    {
        push(RuleEffect::AddCallout {
            domain: RuleDomain::Draft,
            title: story_name.to_string(),
            content: RichText::parse(text),
            category: None,
        });
    }
    if let Some(per_player) = legacy.goal_tokens_per_player {
        push(RuleEffect::CreateTokenStack {
            token: "Goal".to_string(),
            per_player,
        });
    }

    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RuleSource;

    #[test]
    fn empty_legacy_config_yields_no_rules() {
        assert!(normalize_legacy(&LegacySetupConfig::default(), "Quiet").is_empty());
    }

    #[test]
    fn translates_every_special_cased_field() -> anyhow::Result<()> {
        let legacy: LegacySetupConfig = serde_json::from_str(
            r#"{
                "starting_credits": 5000,
                "credits_bonus": 500,
                "no_fuel_parts": true,
                "job_mode": "caper_start",
                "nav_mode": "reshuffle",
                "prime_multiplier": 2,
                "forbidden_contacts": ["niska"],
                "haven_placement": true,
                "special_rule": "Leaders start **wanted**.",
                "goal_tokens_per_player": 2
            }"#,
        )?;
        let rules = normalize_legacy(&legacy, "A Fistful of Scoundrels");

        assert!(rules
            .iter()
            .all(|rule| rule.source == RuleSource::Story
                && rule.source_name == "A Fistful of Scoundrels"));
        let effects: Vec<_> = rules.into_iter().map(|rule| rule.effect).collect();
        assert_eq!(
            effects,
            vec![
                RuleEffect::SetResource {
                    resource: Resource::Credits,
                    amount: 5000
                },
                RuleEffect::AddResource {
                    resource: Resource::Credits,
                    amount: 500
                },
                RuleEffect::DisableResource {
                    resource: Resource::Fuel
                },
                RuleEffect::DisableResource {
                    resource: Resource::Parts
                },
                RuleEffect::SetJobMode {
                    mode: JobMode::CaperStart
                },
                RuleEffect::SetNavMode {
                    mode: NavMode::Reshuffle
                },
                RuleEffect::MultiplyPrime { factor: 2 },
                RuleEffect::ForbidContact {
                    contact: Contact::Niska
                },
                RuleEffect::Flag {
                    flag: GameFlag::HavenPlacement
                },
                RuleEffect::AddCallout {
                    domain: RuleDomain::Draft,
                    title: "A Fistful of Scoundrels".to_string(),
                    content: RichText::parse("Leaders start **wanted**."),
                    category: None,
                },
                RuleEffect::CreateTokenStack {
                    token: "Goal".to_string(),
                    per_player: 2
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn blank_special_rule_is_skipped() {
        let legacy = LegacySetupConfig {
            special_rule: Some("   ".to_string()),
            ..LegacySetupConfig::default()
        };
        assert!(normalize_legacy(&legacy, "Blank").is_empty());
    }
}
