//! Round state machine
//!
//! `Setup -> Running -> Finished`, with `Finished -> Setup` (edit) and
//! `Finished -> Running` (play again). All input channels and the round
//! timer funnel through [`RoundController`]; nothing here blocks or spawns.

pub mod controller;
pub mod deck;
pub mod state;
pub mod timer;

pub use controller::RoundController;
pub use deck::{Card, Deck};
pub use state::{Action, Counters, EndReason, Mode, RoundEvent, RoundResults, RoundState};
pub use timer::{RoundTimer, TimerTick};
