#![allow(missing_docs)]

//! Built-in setup cards and story cards.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    models::{
        step::default_title, Citation, Configuration, ModuleRef, Rule, Step, StepKind,
        StepOverrides,
    },
    normalize::{normalize_legacy, LegacySetupConfig},
};

const SETUP_CARDS_JSON: &str = include_str!("setup_cards.json");
const STORIES_JSON: &str = include_str!("stories.json");

/// Identifier of the fallback setup card.
pub const STANDARD_SETUP_CARD: &str = "standard";

/// Problems with content tables.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to parse {table}: {source}")]
    Parse {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("setup card table has no `standard` entry")]
    MissingStandardCard,
    #[error("duplicate {table} id `{id}`")]
    DuplicateId { table: &'static str, id: String },
}

/// A single template entry as authored in a setup card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepEntry {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub overrides: StepOverrides,
    #[serde(default)]
    pub citation: Option<Citation>,
}

impl StepEntry {
    /// Bare entry with no overrides.
    pub fn plain(id: &str) -> Self {
        Self {
            id: id.to_string(),
            title: None,
            overrides: StepOverrides::default(),
            citation: None,
        }
    }

    /// Materialise into a flow step attributed to `template_name`.
    pub fn to_step(&self, template_name: &str) -> Step {
        Step {
            id: self.id.clone(),
            kind: StepKind::from_id(&self.id),
            title: self
                .title
                .clone()
                .unwrap_or_else(|| default_title(&self.id)),
            template_name: template_name.to_string(),
            overrides: self.overrides.clone(),
            citation: self.citation.clone(),
        }
    }
}

/// How a paired template fills one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "use", rename_all = "snake_case")]
pub enum PairedEntry {
    /// Take the secondary card's entry for this id.
    Inherit { id: String },
    /// Use this entry regardless of the secondary card.
    Own(StepEntry),
}

impl PairedEntry {
    pub fn id(&self) -> &str {
        match self {
            PairedEntry::Inherit { id } => id,
            PairedEntry::Own(entry) => &entry.id,
        }
    }
}

/// Scenario template: a named ordered list of steps with default overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupCard {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: String,
    /// Solo rules meant to be paired with another card.
    #[serde(default)]
    pub solo_variant: bool,
    #[serde(default)]
    pub requires: Vec<String>,
    pub steps: Vec<StepEntry>,
    /// Template used instead of `steps` when a secondary card is selected.
    #[serde(default)]
    pub pairing: Option<Vec<PairedEntry>>,
}

impl SetupCard {
    pub fn entry(&self, id: &str) -> Option<&StepEntry> {
        self.steps.iter().find(|entry| entry.id == id)
    }

    pub fn required_modules(&self) -> Vec<ModuleRef> {
        self.requires.iter().map(|id| ModuleRef::from_id(id)).collect()
    }
}

/// A per-story toggle that brings extra rules with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeOption {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// Narrative scenario with its rules already in tagged form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryCard {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub requires: Vec<ModuleRef>,
    pub rules: Vec<Rule>,
    pub challenges: Vec<ChallengeOption>,
}

#[derive(Debug, Deserialize)]
struct StoryDefinition {
    id: String,
    title: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    requires: Vec<String>,
    #[serde(default)]
    rules: Vec<Rule>,
    #[serde(default)]
    setup_config: Option<LegacySetupConfig>,
    #[serde(default)]
    challenges: Vec<ChallengeOption>,
}

impl From<StoryDefinition> for StoryCard {
    fn from(definition: StoryDefinition) -> Self {
        let mut rules = definition.rules;
        if let Some(legacy) = &definition.setup_config {
            rules.extend(normalize_legacy(legacy, &definition.title));
        }
        StoryCard {
            requires: definition
                .requires
                .iter()
                .map(|id| ModuleRef::from_id(id))
                .collect(),
            id: definition.id,
            title: definition.title,
            summary: definition.summary,
            rules,
            challenges: definition.challenges,
        }
    }
}

impl StoryCard {
    /// Labels of required modules; unknown ids render as placeholders.
    pub fn requirement_labels(&self) -> Vec<String> {
        self.requires.iter().map(ModuleRef::label).collect()
    }

    /// Whether every known required module is active. Unknown ids never block a story.
    pub fn is_available(&self, config: &Configuration) -> bool {
        modules_active(&self.requires, config)
    }
}

fn modules_active(requires: &[ModuleRef], config: &Configuration) -> bool {
    requires.iter().all(|module| match module {
        ModuleRef::Known(id) => config.expansions.is_active(*id),
        ModuleRef::Unknown(_) => true,
    })
}

/// Immutable content tables consumed by the engine.
#[derive(Debug, Clone)]
pub struct Catalog {
    setup_cards: Vec<SetupCard>,
    stories: Vec<StoryCard>,
    standard_index: usize,
}

impl Catalog {
    /// Tables shipped with the crate.
    pub fn builtin() -> Result<Self, ContentError> {
        Self::from_json(SETUP_CARDS_JSON, STORIES_JSON)
    }

    /// Parse and validate catalog tables.
    pub fn from_json(setup_cards: &str, stories: &str) -> Result<Self, ContentError> {
        let setup_cards: Vec<SetupCard> =
            serde_json::from_str(setup_cards).map_err(|source| ContentError::Parse {
                table: "setup cards",
                source,
            })?;
        let definitions: Vec<StoryDefinition> =
            serde_json::from_str(stories).map_err(|source| ContentError::Parse {
                table: "stories",
                source,
            })?;

        ensure_unique("setup card", setup_cards.iter().map(|card| card.id.as_str()))?;
        ensure_unique(
            "story",
            definitions.iter().map(|story| story.id.as_str()),
        )?;

        let standard_index = setup_cards
            .iter()
            .position(|card| card.id == STANDARD_SETUP_CARD)
            .ok_or(ContentError::MissingStandardCard)?;
        let stories: Vec<StoryCard> = definitions.into_iter().map(StoryCard::from).collect();
        debug!(
            setup_cards = setup_cards.len(),
            stories = stories.len(),
            "Catalog loaded"
        );

        Ok(Self {
            setup_cards,
            stories,
            standard_index,
        })
    }

    pub fn setup_cards(&self) -> &[SetupCard] {
        &self.setup_cards
    }

    pub fn stories(&self) -> &[StoryCard] {
        &self.stories
    }

    pub fn setup_card(&self, id: &str) -> Option<&SetupCard> {
        self.setup_cards.iter().find(|card| card.id == id)
    }

    /// The fallback card. Always present.
    pub fn standard(&self) -> &SetupCard {
        &self.setup_cards[self.standard_index]
    }

    pub fn story(&self, id: &str) -> Option<&StoryCard> {
        self.stories.iter().find(|story| story.id == id)
    }

    /// Story selected by `config`, if it names one the catalog knows.
    pub fn selected_story(&self, config: &Configuration) -> Option<&StoryCard> {
        config.story_card.as_deref().and_then(|id| self.story(id))
    }

    /// Stories playable with the active modules, in table order.
    pub fn available_stories(&self, config: &Configuration) -> Vec<&StoryCard> {
        self.stories
            .iter()
            .filter(|story| story.is_available(config))
            .collect()
    }

    /// Setup cards playable with the active modules, in table order.
    pub fn available_setup_cards(&self, config: &Configuration) -> Vec<&SetupCard> {
        self.setup_cards
            .iter()
            .filter(|card| modules_active(&card.required_modules(), config))
            .collect()
    }
}

fn ensure_unique<'a>(
    table: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ContentError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ContentError::DuplicateId {
                table,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpansionId, JobMode, RuleEffect};

    #[test]
    fn builtin_tables_parse() -> anyhow::Result<()> {
        let catalog = Catalog::builtin()?;
        assert_eq!(catalog.standard().id, STANDARD_SETUP_CARD);
        assert!(catalog.setup_card("flying_solo").is_some());
        assert!(catalog
            .setup_card("flying_solo")
            .and_then(|card| card.pairing.as_ref())
            .is_some());
        assert!(catalog.story("harkens_folly").is_some());
        Ok(())
    }

    #[test]
    fn legacy_story_is_normalized_on_load() -> anyhow::Result<()> {
        let catalog = Catalog::builtin()?;
        let story = catalog
            .story("fistful_scoundrels")
            .expect("legacy story present");
        assert!(story.rules.iter().any(|rule| rule.effect
            == RuleEffect::SetJobMode {
                mode: JobMode::CaperStart
            }));
        assert!(story
            .rules
            .iter()
            .all(|rule| rule.source_name == "A Fistful of Scoundrels"));
        Ok(())
    }

    #[test]
    fn unknown_requirement_renders_placeholder_and_does_not_block() -> anyhow::Result<()> {
        let catalog = Catalog::builtin()?;
        let story = catalog.story("well_traveled").expect("story present");
        assert_eq!(
            story.requirement_labels(),
            vec![
                "Kalidasa".to_string(),
                "[unknown module: jetpack_racing]".to_string()
            ]
        );

        let mut config = Configuration::default();
        assert!(!story.is_available(&config));
        config.expansions.set(ExpansionId::Kalidasa, true);
        assert!(story.is_available(&config));
        Ok(())
    }

    #[test]
    fn missing_standard_card_is_rejected() {
        let result = Catalog::from_json(r#"[{ "id": "other", "label": "Other", "steps": [] }]"#, "[]");
        assert!(matches!(result, Err(ContentError::MissingStandardCard)));
    }

    #[test]
    fn duplicate_story_ids_are_rejected() {
        let result = Catalog::from_json(
            r#"[{ "id": "standard", "label": "Standard", "steps": [] }]"#,
            r#"[{ "id": "dup", "title": "A" }, { "id": "dup", "title": "B" }]"#,
        );
        assert!(matches!(
            result,
            Err(ContentError::DuplicateId { table: "story", .. })
        ));
    }
}
