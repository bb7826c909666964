//! Tilt gesture recognition from device orientation
//!
//! The first sample of a round defines "flat". Small deviations slowly pull
//! the baseline along so a phone that settles on someone's forehead stays
//! calibrated. Tilting past the trigger angle fires once, then the recognizer
//! stays disarmed until the device comes back to the neutral band.

use crate::consts::*;
use crate::input::RateLimiter;
use crate::round::Action;

/// Coarse tilt phase reported to the display layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiltStatus {
    /// Attached, waiting for the first sample
    Ready,
    #[default]
    Neutral,
    Forward,
    Backward,
    /// Tilt is disabled or was refused by the platform
    Off,
    /// Tilt is enabled but the platform grant is still outstanding
    NeedsPermission,
}

impl TiltStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TiltStatus::Ready => "Ready",
            TiltStatus::Neutral => "Neutral",
            TiltStatus::Forward => "Forward",
            TiltStatus::Backward => "Backward",
            TiltStatus::Off => "Off",
            TiltStatus::NeedsPermission => "Needs permission",
        }
    }
}

/// Per-round calibration state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltCalibration {
    /// Calibrated "flat" beta angle (degrees)
    pub neutral_beta: f64,
    pub has_baseline: bool,
    /// Cleared on fire, set again on return to neutral
    pub armed: bool,
    pub debounce: RateLimiter,
}

impl Default for TiltCalibration {
    fn default() -> Self {
        Self {
            neutral_beta: 0.0,
            has_baseline: false,
            armed: true,
            debounce: RateLimiter::new(TILT_MIN_INTERVAL_MS),
        }
    }
}

/// Result of feeding one orientation sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltReading {
    pub action: Option<Action>,
    pub status: TiltStatus,
}

#[derive(Debug, Clone, Default)]
pub struct TiltRecognizer {
    calibration: TiltCalibration,
    attached: bool,
}

impl TiltRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calibration(&self) -> &TiltCalibration {
        &self.calibration
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Forget everything learned in a previous round
    pub fn reset(&mut self) {
        self.calibration = TiltCalibration::default();
    }

    /// Start accepting samples
    pub fn attach(&mut self) {
        if !self.attached {
            log::debug!("tilt recognizer attached");
        }
        self.attached = true;
    }

    /// Stop accepting samples and disarm
    pub fn detach(&mut self) {
        if self.attached {
            log::debug!("tilt recognizer detached");
        }
        self.attached = false;
        self.calibration.armed = false;
    }

    /// Feed one `beta` sample. Returns None while detached or for a
    /// non-finite angle.
    pub fn sample(&mut self, beta: f64, now_ms: f64) -> Option<TiltReading> {
        if !self.attached || !beta.is_finite() {
            return None;
        }
        let cal = &mut self.calibration;

        if !cal.has_baseline {
            cal.neutral_beta = beta;
            cal.has_baseline = true;
        } else {
            let drift = beta - cal.neutral_beta;
            if drift.abs() <= TILT_NEUTRAL_ZONE_DEG + TILT_BASELINE_SLACK_DEG {
                cal.neutral_beta += drift * TILT_BASELINE_SMOOTHING;
            }
        }

        let delta = beta - cal.neutral_beta;
        let status = phase_for(delta);

        if !cal.armed {
            if delta.abs() <= TILT_NEUTRAL_ZONE_DEG {
                cal.armed = true;
            }
            return Some(TiltReading { action: None, status });
        }

        let action = if delta >= TILT_FORWARD_DEG {
            Some(Action::Got)
        } else if delta <= TILT_BACKWARD_DEG {
            Some(Action::Pass)
        } else {
            None
        };

        let action = match action {
            Some(action) if cal.debounce.try_fire(now_ms) => {
                cal.armed = false;
                log::debug!("tilt {:?} at delta {:.1}°", action, delta);
                Some(action)
            }
            Some(_) => {
                log::trace!("tilt suppressed by debounce");
                None
            }
            None => None,
        };

        Some(TiltReading { action, status })
    }
}

fn phase_for(delta: f64) -> TiltStatus {
    if delta > TILT_NEUTRAL_ZONE_DEG {
        TiltStatus::Forward
    } else if delta < -TILT_NEUTRAL_ZONE_DEG {
        TiltStatus::Backward
    } else {
        TiltStatus::Neutral
    }
}
