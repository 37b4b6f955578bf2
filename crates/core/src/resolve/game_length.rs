use serde::{Deserialize, Serialize};

use super::template_callouts;
use crate::models::{
    rule::callouts_for, Callout, CalloutCategory, Configuration, RichText, Rule, RuleDomain, Step,
    TimerMode,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLengthDetails {
    pub tokens: u32,
    pub timer: TimerMode,
    pub callouts: Vec<Callout>,
}

pub fn resolve_game_length(config: &Configuration, step: &Step, rules: &[Rule]) -> GameLengthDetails {
    let tokens = step
        .overrides
        .game_length_tokens
        .unwrap_or(config.timer.game_length_tokens);

    let mut callouts = Vec::new();
    if config.timer.mode == TimerMode::Unpredictable {
        callouts.push(Callout::new(
            CalloutCategory::Info,
            "Unpredictable Timer",
            RichText::parse(
                "Shuffle the numbered tokens face down into the stack. The game ends when the **last** numbered token is revealed.",
            ),
        ));
    }
    callouts.extend(template_callouts(&step.overrides.notes));
    callouts.extend(callouts_for(rules, RuleDomain::GameLength));

    GameLengthDetails {
        tokens,
        timer: config.timer.mode,
        callouts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::StepEntry, models::step::ids};

    #[test]
    fn template_tokens_override_timer_setting() {
        let mut config = Configuration::default();
        config.timer.game_length_tokens = 15;

        let plain = StepEntry::plain(ids::GAME_LENGTH).to_step("Awful Lonely in the Big Black");
        assert_eq!(resolve_game_length(&config, &plain, &[]).tokens, 15);

        let mut entry = StepEntry::plain(ids::GAME_LENGTH);
        entry.overrides.game_length_tokens = Some(20);
        assert_eq!(
            resolve_game_length(&config, &entry.to_step("Flying Solo"), &[]).tokens,
            20
        );
    }

    #[test]
    fn unpredictable_timer_adds_info() {
        let mut config = Configuration::default();
        config.timer.mode = TimerMode::Unpredictable;
        let step = StepEntry::plain(ids::GAME_LENGTH).to_step("Flying Solo");
        let details = resolve_game_length(&config, &step, &[]);
        assert_eq!(details.callouts.len(), 1);
        assert_eq!(details.callouts[0].category, CalloutCategory::Info);
    }
}
