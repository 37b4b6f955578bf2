#![allow(missing_docs)]

//! Detection of disagreeing directives from independent rule sources.

use serde::{Deserialize, Serialize};

use crate::models::RuleSource;

/// A value together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributed<T> {
    pub value: T,
    pub source: RuleSource,
    pub source_name: String,
}

impl<T> Attributed<T> {
    pub fn new(value: T, source: RuleSource, source_name: impl Into<String>) -> Self {
        Self {
            value,
            source,
            source_name: source_name.into(),
        }
    }
}

/// Which side of a conflict the table chose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictSide {
    Story,
    ScenarioTemplate,
}

/// Two present, differing values for one resolved quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict<T> {
    pub story: Attributed<T>,
    pub template: Attributed<T>,
}

impl<T> Conflict<T> {
    /// Side that applies. Automatic resolution and a missing manual choice both fall back to the story.
    pub fn winning_side(&self, manual: bool, selection: Option<ConflictSide>) -> ConflictSide {
        match (manual, selection) {
            (true, Some(side)) => side,
            _ => ConflictSide::Story,
        }
    }

    pub fn side(&self, side: ConflictSide) -> &Attributed<T> {
        match side {
            ConflictSide::Story => &self.story,
            ConflictSide::ScenarioTemplate => &self.template,
        }
    }
}

/// Build a conflict when both values are present and differ.
pub fn detect<T: PartialEq>(
    story: Option<Attributed<T>>,
    template: Option<Attributed<T>>,
) -> Option<Conflict<T>> {
    match (story, template) {
        (Some(story), Some(template)) if story.value != template.value => {
            Some(Conflict { story, template })
        }
        _ => None,
    }
}
