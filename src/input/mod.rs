//! Input channels
//!
//! Each channel turns raw platform events into a single normalized
//! [`Action`](crate::round::Action). Mode gating lives in the controller.

pub mod rate_limit;
pub mod swipe;
pub mod tilt;

pub use rate_limit::RateLimiter;
pub use swipe::{SwipeClassifier, SwipeStart, classify};
pub use tilt::{TiltCalibration, TiltReading, TiltRecognizer, TiltStatus};
