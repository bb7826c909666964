//! Horizontal swipe classification
//!
//! A swipe is recorded on pointer/touch down and classified on the matching
//! up. Rightward scores the card, leftward passes it. Anything too slow, too
//! short or too diagonal is dropped.

use glam::Vec2;

use crate::consts::{SWIPE_MAX_DURATION_MS, SWIPE_MAX_VERTICAL_PX, SWIPE_MIN_DISTANCE_PX};
use crate::round::Action;

/// In-flight gesture start point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeStart {
    pub pos: Vec2,
    pub time_ms: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SwipeClassifier {
    start: Option<SwipeStart>,
}

impl SwipeClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }

    /// Record a gesture start. Ignored while another gesture is in flight.
    pub fn begin(&mut self, x: f32, y: f32, time_ms: f64) {
        if self.start.is_some() {
            return;
        }
        self.start = Some(SwipeStart {
            pos: Vec2::new(x, y),
            time_ms,
        });
    }

    /// Finish the in-flight gesture and classify it
    pub fn finish(&mut self, x: f32, y: f32, time_ms: f64) -> Option<Action> {
        let start = self.start.take()?;
        classify(start.pos, Vec2::new(x, y), time_ms - start.time_ms)
    }

    /// Drop any in-flight gesture (round ended, pointer cancelled)
    pub fn cancel(&mut self) {
        self.start = None;
    }
}

/// Classify a completed gesture from its endpoints and duration
pub fn classify(start: Vec2, end: Vec2, dt_ms: f64) -> Option<Action> {
    let delta = end - start;
    if dt_ms > SWIPE_MAX_DURATION_MS {
        log::trace!("swipe rejected: too slow ({dt_ms:.0} ms)");
        return None;
    }
    if delta.x.abs() < SWIPE_MIN_DISTANCE_PX {
        log::trace!("swipe rejected: too short ({:.0} px)", delta.x);
        return None;
    }
    if delta.y.abs() > SWIPE_MAX_VERTICAL_PX {
        log::trace!("swipe rejected: too diagonal ({:.0} px)", delta.y);
        return None;
    }
    if delta.x > 0.0 {
        Some(Action::Got)
    } else {
        Some(Action::Pass)
    }
}
