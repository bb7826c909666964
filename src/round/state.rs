//! Round state and core round types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::input::TiltStatus;
use crate::settings::Settings;

/// Top-level round mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Editing the deck and settings
    #[default]
    Setup,
    /// Cards are live and input is accepted
    Running,
    /// Round over, results frozen
    Finished,
}

/// Normalized player intent produced by every input channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Team guessed it
    Got,
    /// Give up on this card
    Pass,
    /// Skip without scoring
    Next,
}

/// Why a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    Manual,
    DeckExhausted,
    TimeUp,
}

impl EndReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndReason::Manual => "ended early",
            EndReason::DeckExhausted => "reached end of list",
            EndReason::TimeUp => "time's up",
        }
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score counters. `shown` counts every applied action including skips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Counters {
    pub shown: u32,
    pub got: u32,
    pub pass: u32,
}

impl Counters {
    /// Cards skipped with `Next`
    pub fn nexts(&self) -> u32 {
        self.shown - self.got - self.pass
    }

    pub fn apply(&mut self, action: Action) {
        self.shown += 1;
        match action {
            Action::Got => self.got += 1,
            Action::Pass => self.pass += 1,
            Action::Next => {}
        }
    }
}

/// Mutable state of the current round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoundState {
    pub mode: Mode,
    /// Position in the deck (0..=deck length)
    pub index: usize,
    pub counters: Counters,
    pub time_left_secs: u32,
}

/// Frozen results of a finished round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResults {
    pub shown: u32,
    pub got: u32,
    pub pass: u32,
    pub deck_size: usize,
    pub reason: EndReason,
}

/// Notifications for the presentation layer, drained by the host after
/// each input or tick.
#[derive(Debug, Clone, PartialEq)]
pub enum RoundEvent {
    /// Round entered `Running`; first card is at index 0
    Started { deck_size: usize, time_left_secs: u32 },
    /// An action was applied; `index` is the new deck position
    ActionApplied {
        action: Action,
        index: usize,
        counters: Counters,
    },
    /// Feedback delay elapsed; show the card at `index`
    CardRevealed { index: usize },
    TimeLeft(u32),
    Status(TiltStatus),
    /// Host should attach its orientation listener
    TiltAttached,
    /// Host should drop its orientation listener
    TiltDetached,
    /// Fire-and-forget persistence request
    SaveSettings(Settings),
    Finished(RoundResults),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_apply() {
        let mut c = Counters::default();
        c.apply(Action::Got);
        c.apply(Action::Pass);
        c.apply(Action::Next);
        c.apply(Action::Got);
        assert_eq!(c.shown, 4);
        assert_eq!(c.got, 2);
        assert_eq!(c.pass, 1);
        assert_eq!(c.nexts(), 1);
    }

    #[test]
    fn test_end_reason_text() {
        assert_eq!(EndReason::DeckExhausted.to_string(), "reached end of list");
    }
}
