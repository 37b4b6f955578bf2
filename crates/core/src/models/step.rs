//! Setup steps and the per-step overrides declared by setup cards.

use serde::{Deserialize, Serialize};

use super::{
    rule::{JobMode, NavMode},
    text::RichText,
};

/// Stable step identifiers.
pub mod ids {
    pub const STORY: &str = "setup_story";
    pub const GAME_LENGTH: &str = "setup_game_length";
    pub const NAV_DECKS: &str = "core_nav_decks";
    pub const ALLIANCE_REAVER: &str = "core_alliance_reaver";
    pub const DRAFT: &str = "core_draft";
    pub const RESOURCES: &str = "core_resources";
    pub const JOBS: &str = "core_jobs";
    pub const PRIMING: &str = "core_priming";
    pub const OPTIONAL_RULES: &str = "dynamic_optional_rules";
    pub const BEGIN: &str = "final_begin";

    /// Step order used by the standard setup card.
    pub const STANDARD_ORDER: [&str; 8] = [
        STORY,
        NAV_DECKS,
        ALLIANCE_REAVER,
        DRAFT,
        RESOURCES,
        JOBS,
        PRIMING,
        BEGIN,
    ];
}

/// Role of a step within the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Setup,
    Core,
    Dynamic,
    Final,
}

impl StepKind {
    /// Kind is encoded in the id prefix. Unprefixed ids are treated as core steps.
    pub fn from_id(id: &str) -> Self {
        match id.split_once('_').map(|(prefix, _)| prefix) {
            Some("setup") => StepKind::Setup,
            Some("dynamic") => StepKind::Dynamic,
            Some("final") => StepKind::Final,
            _ => StepKind::Core,
        }
    }
}

/// Rulebook reference for a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub manual: String,
    pub page: u32,
}

/// A scenario-template callout attached to one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateNote {
    pub title: String,
    pub content: RichText,
}

/// Values a setup card declares for a single step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StepOverrides {
    pub starting_credits: Option<i32>,
    pub credits_bonus: Option<i32>,
    pub job_mode: Option<JobMode>,
    pub nav_mode: Option<NavMode>,
    pub prime_base: Option<u32>,
    pub prime_multiplier: Option<u32>,
    pub leader_placement: Option<String>,
    pub haven_placement: bool,
    pub alliance_cruiser: Option<String>,
    pub reaver_cutter: Option<String>,
    pub skip_draft: bool,
    pub game_length_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<TemplateNote>,
}

/// One entry of the composed setup flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    pub kind: StepKind,
    pub title: String,
    /// Display name of the setup card whose template declared this entry.
    pub template_name: String,
    pub overrides: StepOverrides,
    pub citation: Option<Citation>,
}

/// Default heading for a known step id.
pub fn default_title(id: &str) -> String {
    match id {
        ids::STORY => "Choose a Story Card".to_string(),
        ids::GAME_LENGTH => "Set the Game Length".to_string(),
        ids::NAV_DECKS => "Prepare the Nav Decks".to_string(),
        ids::ALLIANCE_REAVER => "Place the Alliance Cruiser and Reavers".to_string(),
        ids::DRAFT => "Draft Leaders and Place Ships".to_string(),
        ids::RESOURCES => "Starting Resources".to_string(),
        ids::JOBS => "Starting Jobs".to_string(),
        ids::PRIMING => "Prime the Pump".to_string(),
        ids::OPTIONAL_RULES => "Optional Rules".to_string(),
        ids::BEGIN => "Begin the Game".to_string(),
        other => other.replace('_', " "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_comes_from_prefix() {
        assert_eq!(StepKind::from_id(ids::STORY), StepKind::Setup);
        assert_eq!(StepKind::from_id(ids::JOBS), StepKind::Core);
        assert_eq!(StepKind::from_id(ids::OPTIONAL_RULES), StepKind::Dynamic);
        assert_eq!(StepKind::from_id(ids::BEGIN), StepKind::Final);
        assert_eq!(StepKind::from_id("mystery"), StepKind::Core);
    }

    #[test]
    fn overrides_default_missing_fields() -> anyhow::Result<()> {
        let overrides: StepOverrides =
            serde_json::from_str(r#"{ "starting_credits": 12000, "haven_placement": true }"#)?;
        assert_eq!(overrides.starting_credits, Some(12000));
        assert!(overrides.haven_placement);
        assert_eq!(overrides.job_mode, None);
        assert!(overrides.notes.is_empty());
        Ok(())
    }
}
