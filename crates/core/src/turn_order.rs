#![allow(missing_docs)]

//! Draft outcome: who picks first, and the order ships are placed.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Highest face of the draft die.
pub const DIE_SIDES: u32 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRoll {
    pub player: String,
    pub value: u32,
    #[serde(default)]
    pub winner: bool,
}

impl PlayerRoll {
    pub fn new(player: impl Into<String>, value: u32) -> Self {
        Self {
            player: player.into(),
            value,
            winner: false,
        }
    }
}

/// Result of one draft action. Recomputed whole, never patched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftState {
    pub rolls: Vec<PlayerRoll>,
    pub draft_order: Vec<String>,
    /// Always the exact reverse of `draft_order`.
    pub placement_order: Vec<String>,
}

impl DraftState {
    pub fn winner(&self) -> Option<&PlayerRoll> {
        self.rolls.iter().find(|roll| roll.winner)
    }
}

/// Winner is `override_winner` when it indexes a player, else the first highest roll.
pub fn resolve(rolls: &[PlayerRoll], player_count: usize, override_winner: Option<usize>) -> DraftState {
    let count = player_count.min(rolls.len());
    if count == 0 {
        return DraftState::default();
    }
    let rolls = &rolls[..count];

    let winner = override_winner
        .filter(|index| *index < count)
        .unwrap_or_else(|| first_max(rolls.iter().map(|roll| roll.value)));

    let draft_order: Vec<String> = (0..count)
        .map(|offset| rolls[(winner + offset) % count].player.clone())
        .collect();
    let placement_order = draft_order.iter().rev().cloned().collect();

    let rolls = rolls
        .iter()
        .enumerate()
        .map(|(index, roll)| PlayerRoll {
            winner: index == winner,
            ..roll.clone()
        })
        .collect();

    DraftState {
        rolls,
        draft_order,
        placement_order,
    }
}

/// Roll a d6 per player; only tied leaders re-roll until one remains.
///
/// The returned rolls are the first-round values.
pub fn run_automated<R: Rng + ?Sized>(player_names: &[String], rng: &mut R) -> DraftState {
    let rolls: Vec<PlayerRoll> = player_names
        .iter()
        .map(|name| PlayerRoll::new(name.as_str(), rng.gen_range(1..=DIE_SIDES)))
        .collect();
    if rolls.is_empty() {
        return DraftState::default();
    }

    let mut current: Vec<(usize, u32)> = rolls
        .iter()
        .enumerate()
        .map(|(index, roll)| (index, roll.value))
        .collect();
    loop {
        let best = current.iter().map(|(_, value)| *value).max().unwrap_or(0);
        let tied: Vec<usize> = current
            .iter()
            .filter(|(_, value)| *value == best)
            .map(|(index, _)| *index)
            .collect();
        if let [winner] = tied.as_slice() {
            return resolve(&rolls, rolls.len(), Some(*winner));
        }
        current = tied
            .into_iter()
            .map(|index| (index, rng.gen_range(1..=DIE_SIDES)))
            .collect();
    }
}

/// A lone captain always wins with a six.
pub fn solo(player_name: &str) -> DraftState {
    resolve(&[PlayerRoll::new(player_name, DIE_SIDES)], 1, None)
}

fn first_max(values: impl Iterator<Item = u32>) -> usize {
    let mut best: Option<(usize, u32)> = None;
    for (index, value) in values.enumerate() {
        if best.map_or(true, |(_, top)| value > top) {
            best = Some((index, value));
        }
    }
    best.map_or(0, |(index, _)| index)
}
