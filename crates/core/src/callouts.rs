#![allow(missing_docs)]

//! Ordering and filtering of special-rule callouts for display.

use crate::models::{Callout, CalloutCategory, DetailMode};

/// Display rank; lower sorts first. Story and warning share a rank.
pub fn priority(category: CalloutCategory) -> u8 {
    match category {
        CalloutCategory::Module => 1,
        CalloutCategory::ScenarioTemplate => 2,
        CalloutCategory::Story | CalloutCategory::Warning => 3,
        CalloutCategory::Info => 4,
    }
}

/// Stable-sort by priority and drop module callouts unless the detail mode is detailed.
///
/// Exact duplicates collapse into their first occurrence.
pub fn sort_and_filter(callouts: Vec<Callout>, detail_mode: DetailMode) -> Vec<Callout> {
    let mut visible: Vec<Callout> = Vec::with_capacity(callouts.len());
    for callout in callouts {
        if detail_mode != DetailMode::Detailed && callout.category == CalloutCategory::Module {
            continue;
        }
        if !visible.contains(&callout) {
            visible.push(callout);
        }
    }
    visible.sort_by_key(|callout| priority(callout.category));
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RichText;

    fn callout(category: CalloutCategory, title: &str) -> Callout {
        Callout::new(category, title, RichText::plain(title))
    }

    fn sample() -> Vec<Callout> {
        vec![
            callout(CalloutCategory::Module, "module"),
            callout(CalloutCategory::Story, "story"),
            callout(CalloutCategory::Info, "info"),
            callout(CalloutCategory::Warning, "warning"),
        ]
    }

    fn titles(callouts: &[Callout]) -> Vec<&str> {
        callouts.iter().map(|callout| callout.title.as_str()).collect()
    }

    #[test]
    fn detailed_mode_sorts_by_priority() {
        let sorted = sort_and_filter(sample(), DetailMode::Detailed);
        assert_eq!(titles(&sorted), vec!["module", "story", "warning", "info"]);
    }

    #[test]
    fn concise_mode_drops_module_callouts() {
        let sorted = sort_and_filter(sample(), DetailMode::Concise);
        assert_eq!(titles(&sorted), vec!["story", "warning", "info"]);
    }

    #[test]
    fn equal_ranks_keep_input_order() {
        let input = vec![
            callout(CalloutCategory::Info, "late"),
            callout(CalloutCategory::Warning, "first"),
            callout(CalloutCategory::ScenarioTemplate, "card"),
            callout(CalloutCategory::Story, "second"),
        ];
        let sorted = sort_and_filter(input, DetailMode::Concise);
        assert_eq!(titles(&sorted), vec!["card", "first", "second", "late"]);
        let again = sort_and_filter(sorted.clone(), DetailMode::Concise);
        assert_eq!(again, sorted);
    }

    #[test]
    fn duplicates_collapse() {
        let input = vec![
            callout(CalloutCategory::Story, "same"),
            callout(CalloutCategory::Story, "same"),
            callout(CalloutCategory::Info, "same"),
        ];
        let sorted = sort_and_filter(input, DetailMode::Detailed);
        assert_eq!(sorted.len(), 2);
    }
}
