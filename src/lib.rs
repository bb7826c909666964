//! Phrase Party - a single-device party guessing game
//!
//! Core modules:
//! - `round`: Round state machine (deck, counters, timer, end conditions)
//! - `input`: Swipe classification and tilt recognition
//! - `platform`: Collaborator interfaces (motion permission)
//! - `settings`: Player preferences persisted in LocalStorage

pub mod error;
pub mod input;
pub mod platform;
pub mod round;
pub mod settings;

pub use error::GameError;
pub use input::{RateLimiter, SwipeClassifier, TiltCalibration, TiltRecognizer, TiltStatus};
pub use round::{
    Action, Card, Counters, Deck, EndReason, Mode, RoundController, RoundEvent, RoundResults,
    RoundState, RoundTimer,
};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Swipe must complete within this window (ms)
    pub const SWIPE_MAX_DURATION_MS: f64 = 800.0;
    /// Minimum horizontal travel for a swipe (px)
    pub const SWIPE_MIN_DISTANCE_PX: f32 = 42.0;
    /// Maximum vertical drift before a swipe counts as diagonal (px)
    pub const SWIPE_MAX_VERTICAL_PX: f32 = 80.0;

    /// Forward tilt past baseline that scores a card (degrees)
    pub const TILT_FORWARD_DEG: f64 = 18.0;
    /// Backward tilt past baseline that passes a card (degrees)
    pub const TILT_BACKWARD_DEG: f64 = -18.0;
    /// Half-width of the neutral band used for re-arming (degrees)
    pub const TILT_NEUTRAL_ZONE_DEG: f64 = 10.0;
    /// Extra band around neutral where the baseline keeps drifting (degrees)
    pub const TILT_BASELINE_SLACK_DEG: f64 = 4.0;
    /// Exponential smoothing factor for baseline drift correction
    pub const TILT_BASELINE_SMOOTHING: f64 = 0.12;
    /// Minimum gap between two tilt actions (ms)
    pub const TILT_MIN_INTERVAL_MS: f64 = 700.0;

    /// Host poll interval for the round timer (ms)
    pub const TIMER_POLL_MS: u32 = 250;
    /// Delay between an accepted action and revealing the next card (ms)
    pub const FEEDBACK_DELAY_MS: f64 = 420.0;

    /// Round length bounds (seconds)
    pub const DEFAULT_ROUND_SECONDS: u32 = 60;
    pub const MIN_ROUND_SECONDS: u32 = 10;
    pub const MAX_ROUND_SECONDS: u32 = 600;
}
