#![allow(missing_docs)]

//! Shared domain models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub mod expansion;
pub mod rule;
pub mod step;
pub mod text;

pub use expansion::{ExpansionId, Expansions, ModuleRef};
pub use rule::{
    Callout, CalloutCategory, Contact, GameFlag, JobMode, NavMode, Resource, Rule, RuleDomain,
    RuleEffect, RuleSource, Vessel,
};
pub use step::{Citation, Step, StepKind, StepOverrides, TemplateNote};
pub use text::RichText;

/// Highest supported player count.
pub const MAX_PLAYERS: usize = 6;

/// Printing of the core box the table is using. Persisted as the record marker field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edition {
    #[default]
    Original,
    Tenth,
}

/// How much rule text the guide shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailMode {
    /// Hide callouts that only restate what an active module implies.
    #[default]
    Concise,
    Detailed,
}

impl DetailMode {
    pub fn toggled(self) -> Self {
        match self {
            DetailMode::Concise => DetailMode::Detailed,
            DetailMode::Detailed => DetailMode::Concise,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    #[default]
    Standard,
    /// Numbered tokens are shuffled in so the final turn is unknown.
    Unpredictable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    pub mode: TimerMode,
    pub game_length_tokens: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            mode: TimerMode::Standard,
            game_length_tokens: 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SoloOptions {
    pub no_sure_things: bool,
    /// Remove one game-length token whenever a goal is completed.
    pub extra_goal_push: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionalRules {
    /// Let the table pick between competing credit values instead of following the story.
    pub resolve_conflicts_manually: bool,
    pub high_volume_supply: bool,
    pub optional_ship_upgrades: bool,
}

/// Complete description of the table being set up.
///
/// Missing fields always fall back to [`Configuration::default`], group by group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub edition: Edition,
    pub expansions: Expansions,
    pub player_count: usize,
    pub player_names: Vec<String>,
    pub setup_card: String,
    pub secondary_setup_card: Option<String>,
    pub story_card: Option<String>,
    pub challenge_options: BTreeMap<String, bool>,
    pub timer: TimerConfig,
    pub solo: SoloOptions,
    pub optional_rules: OptionalRules,
}

impl Default for Configuration {
    fn default() -> Self {
        let player_count = 4;
        Self {
            edition: Edition::default(),
            expansions: Expansions::default(),
            player_count,
            player_names: (1..=player_count).map(default_player_name).collect(),
            setup_card: "standard".to_string(),
            secondary_setup_card: None,
            story_card: Some("first_time_captain".to_string()),
            challenge_options: BTreeMap::new(),
            timer: TimerConfig::default(),
            solo: SoloOptions::default(),
            optional_rules: OptionalRules::default(),
        }
    }
}

impl Configuration {
    /// Clamp the player count and make the name list match it.
    pub fn normalized(mut self) -> Self {
        self.player_count = self.player_count.clamp(1, MAX_PLAYERS);
        self.player_names.truncate(self.player_count);
        for (index, name) in self.player_names.iter_mut().enumerate() {
            let trimmed = name.trim();
            *name = if trimmed.is_empty() {
                default_player_name(index + 1)
            } else {
                trimmed.to_string()
            };
        }
        while self.player_names.len() < self.player_count {
            let next = self.player_names.len() + 1;
            self.player_names.push(default_player_name(next));
        }
        self.secondary_setup_card = self
            .secondary_setup_card
            .filter(|id| !id.trim().is_empty() && *id != self.setup_card);
        self
    }

    pub fn is_solo(&self) -> bool {
        self.player_count == 1
    }

    pub fn challenge_enabled(&self, id: &str) -> bool {
        self.challenge_options.get(id).copied().unwrap_or(false)
    }
}

fn default_player_name(position: usize) -> String {
    format!("Captain {position}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_player_roster() {
        let config = Configuration {
            player_count: 3,
            player_names: vec!["  Mal ".to_string(), String::new()],
            ..Configuration::default()
        }
        .normalized();
        assert_eq!(config.player_names, vec!["Mal", "Captain 2", "Captain 3"]);

        let config = Configuration {
            player_count: 0,
            ..Configuration::default()
        }
        .normalized();
        assert_eq!(config.player_count, 1);
        assert_eq!(config.player_names, vec!["Captain 1"]);
    }

    #[test]
    fn partial_groups_are_filled_from_defaults() -> anyhow::Result<()> {
        let config: Configuration = serde_json::from_str(
            r#"{ "edition": "tenth", "timer": { "mode": "unpredictable" }, "expansions": { "blue_sun": true } }"#,
        )?;
        assert_eq!(config.edition, Edition::Tenth);
        assert_eq!(config.timer.mode, TimerMode::Unpredictable);
        assert_eq!(config.timer.game_length_tokens, 20);
        assert!(config.expansions.blue_sun);
        assert!(!config.expansions.kalidasa);
        assert_eq!(config.setup_card, "standard");
        Ok(())
    }

    #[test]
    fn secondary_card_matching_primary_is_dropped() {
        let config = Configuration {
            setup_card: "flying_solo".to_string(),
            secondary_setup_card: Some("flying_solo".to_string()),
            ..Configuration::default()
        }
        .normalized();
        assert_eq!(config.secondary_setup_card, None);
    }
}
