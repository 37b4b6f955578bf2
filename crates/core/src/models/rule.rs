//! Tagged rule vocabulary shared by every content source.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::text::RichText;

/// Kind of entity a rule originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSource {
    Story,
    ScenarioTemplate,
    Module,
    OptionalRule,
    ChallengeOption,
}

impl RuleSource {
    pub fn label(self) -> &'static str {
        match self {
            RuleSource::Story => "Story Card",
            RuleSource::ScenarioTemplate => "Setup Card",
            RuleSource::Module => "Expansion",
            RuleSource::OptionalRule => "Optional Rule",
            RuleSource::ChallengeOption => "Challenge",
        }
    }
}

/// A single declared effect plus its attribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub source: RuleSource,
    /// Display name of the originating story, card, module or option.
    pub source_name: String,
    #[serde(flatten)]
    pub effect: RuleEffect,
}

impl Rule {
    pub fn new(source: RuleSource, source_name: impl Into<String>, effect: RuleEffect) -> Self {
        Self {
            source,
            source_name: source_name.into(),
            effect,
        }
    }

    pub fn story(source_name: impl Into<String>, effect: RuleEffect) -> Self {
        Self::new(RuleSource::Story, source_name, effect)
    }
}

/// Every effect a rule can declare. The variant and its fields fully determine the effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleEffect {
    SetResource {
        resource: Resource,
        amount: i32,
    },
    AddResource {
        resource: Resource,
        amount: i32,
    },
    DisableResource {
        resource: Resource,
    },
    ForbidContact {
        contact: Contact,
    },
    AllowContacts {
        contacts: Vec<Contact>,
    },
    SetJobMode {
        mode: JobMode,
    },
    SetNavMode {
        mode: NavMode,
    },
    MultiplyPrime {
        factor: u32,
    },
    AddPrime {
        amount: u32,
    },
    SetShipPlacement {
        vessel: Vessel,
        location: String,
    },
    /// A stack of `per_player` tokens for every player at the table.
    CreateTokenStack {
        token: String,
        per_player: u32,
    },
    AddCallout {
        domain: RuleDomain,
        title: String,
        content: RichText,
        /// Explicit display category; derived from the source when absent.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        category: Option<CalloutCategory>,
    },
    Flag {
        flag: GameFlag,
    },
}

/// Behaviours with no dedicated effect fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameFlag {
    /// Leaders start at a haven instead of picking any sector.
    HavenPlacement,
    /// Alliance alert tokens are placed during setup.
    AllianceAlertTokens,
    NoSureThings,
    DoubleBounties,
    DisgruntledStart,
}

impl GameFlag {
    pub fn label(self) -> &'static str {
        match self {
            GameFlag::HavenPlacement => "Start at a Haven",
            GameFlag::AllianceAlertTokens => "Alliance Alert Tokens",
            GameFlag::NoSureThings => "No Sure Things",
            GameFlag::DoubleBounties => "Double Bounties",
            GameFlag::DisgruntledStart => "Disgruntled Crew",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Credits,
    Fuel,
    Parts,
    Warrants,
}

impl Resource {
    pub const ALL: [Resource; 4] = [
        Resource::Credits,
        Resource::Fuel,
        Resource::Parts,
        Resource::Warrants,
    ];

    /// Amount every player starts with under standard rules.
    pub fn standard_amount(self) -> i32 {
        match self {
            Resource::Credits => 3000,
            Resource::Fuel => 6,
            Resource::Parts => 2,
            Resource::Warrants => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Resource::Credits => "Credits",
            Resource::Fuel => "Fuel",
            Resource::Parts => "Parts",
            Resource::Warrants => "Warrants",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Contact {
    Harken,
    Badger,
    AmnonDuul,
    Patience,
    Niska,
    LordHarrow,
    MrUniverse,
    FantyAndMingo,
    MagistrateHiggins,
}

impl Contact {
    /// Contacts dealt a starting job under standard rules.
    pub const STANDARD: [Contact; 5] = [
        Contact::Harken,
        Contact::Badger,
        Contact::AmnonDuul,
        Contact::Patience,
        Contact::Niska,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Contact::Harken => "Harken",
            Contact::Badger => "Badger",
            Contact::AmnonDuul => "Amnon Duul",
            Contact::Patience => "Patience",
            Contact::Niska => "Niska",
            Contact::LordHarrow => "Lord Harrow",
            Contact::MrUniverse => "Mr. Universe",
            Contact::FantyAndMingo => "Fanty & Mingo",
            Contact::MagistrateHiggins => "Magistrate Higgins",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobMode {
    /// One job from each available contact.
    #[default]
    Standard,
    NoJobs,
    CaperStart,
    RimOnly,
    /// Players pick starting jobs in draft order.
    DraftPick,
}

impl JobMode {
    pub fn label(self) -> &'static str {
        match self {
            JobMode::Standard => "Draw one job from each contact",
            JobMode::NoJobs => "No starting jobs",
            JobMode::CaperStart => "Draw a Caper instead of jobs",
            JobMode::RimOnly => "Draw only Rim Space jobs",
            JobMode::DraftPick => "Pick starting jobs in draft order",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavMode {
    #[default]
    Standard,
    Browncoat,
    Rim,
    Reshuffle,
    FlyingSolo,
    ClearSkies,
}

impl NavMode {
    pub fn label(self) -> &'static str {
        match self {
            NavMode::Standard => "Shuffle each Nav Deck separately",
            NavMode::Browncoat => "Browncoat Nav: shuffle the Reshuffle cards in",
            NavMode::Rim => "Rim Nav: use only Rim Space Nav cards",
            NavMode::Reshuffle => "Reshuffle discards after every Full Burn",
            NavMode::FlyingSolo => "Flying Solo Nav: remove Alliance Cruiser cards",
            NavMode::ClearSkies => "Clearer Skies: remove the Reaver cards",
        }
    }
}

/// Ships whose starting location a rule may set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vessel {
    /// Each player's own ship and leader.
    Leader,
    AllianceCruiser,
    ReaverCutter,
}

/// Setup domain a callout belongs to, used to route it to the right step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleDomain {
    General,
    Jobs,
    Resources,
    Nav,
    Alliance,
    Priming,
    Draft,
    GameLength,
}

/// Display category of a special-rule callout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalloutCategory {
    Story,
    ScenarioTemplate,
    Module,
    Warning,
    Info,
}

impl CalloutCategory {
    /// Category implied by a rule's source.
    pub fn for_source(source: RuleSource) -> Self {
        match source {
            RuleSource::Story | RuleSource::ChallengeOption => CalloutCategory::Story,
            RuleSource::ScenarioTemplate => CalloutCategory::ScenarioTemplate,
            RuleSource::Module => CalloutCategory::Module,
            RuleSource::OptionalRule => CalloutCategory::Info,
        }
    }
}

/// A categorised, titled notice shown inline within a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callout {
    pub category: CalloutCategory,
    pub title: String,
    pub content: RichText,
}

impl Callout {
    pub fn new(category: CalloutCategory, title: impl Into<String>, content: RichText) -> Self {
        Self {
            category,
            title: title.into(),
            content,
        }
    }
}

impl fmt::Display for Callout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.content.to_plain_string())
    }
}

/// Callouts declared for `domain`, in rule order.
pub fn callouts_for(rules: &[Rule], domain: RuleDomain) -> Vec<Callout> {
    rules
        .iter()
        .filter_map(|rule| match &rule.effect {
            RuleEffect::AddCallout {
                domain: rule_domain,
                title,
                content,
                category,
            } if *rule_domain == domain => Some(Callout::new(
                category.unwrap_or_else(|| CalloutCategory::for_source(rule.source)),
                title.clone(),
                content.clone(),
            )),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rule_reads_flat_tagged_json() -> anyhow::Result<()> {
        let rule: Rule = serde_json::from_value(json!({
            "source": "story",
            "source_name": "Harken's Folly",
            "type": "forbid_contact",
            "contact": "harken"
        }))?;
        assert_eq!(rule.source, RuleSource::Story);
        assert_eq!(
            rule.effect,
            RuleEffect::ForbidContact {
                contact: Contact::Harken
            }
        );
        Ok(())
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let parsed = serde_json::from_value::<Rule>(json!({
            "source": "story",
            "source_name": "Broken",
            "type": "flag",
            "flag": "free_text_behaviour"
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn callout_category_follows_source_unless_explicit() {
        let rules = vec![
            Rule::new(
                RuleSource::OptionalRule,
                "Optional Ship Upgrades",
                RuleEffect::AddCallout {
                    domain: RuleDomain::Draft,
                    title: "Upgrades".to_string(),
                    content: RichText::plain("Deal upgrades."),
                    category: None,
                },
            ),
            Rule::story(
                "Desperadoes",
                RuleEffect::AddCallout {
                    domain: RuleDomain::Draft,
                    title: "Heads up".to_string(),
                    content: RichText::plain("Careful."),
                    category: Some(CalloutCategory::Warning),
                },
            ),
            Rule::story(
                "Desperadoes",
                RuleEffect::AddCallout {
                    domain: RuleDomain::Jobs,
                    title: "Elsewhere".to_string(),
                    content: RichText::plain("Not a draft rule."),
                    category: None,
                },
            ),
        ];
        let callouts = callouts_for(&rules, RuleDomain::Draft);
        let categories: Vec<_> = callouts.iter().map(|callout| callout.category).collect();
        assert_eq!(
            categories,
            vec![CalloutCategory::Info, CalloutCategory::Warning]
        );
    }
}
