//! Wall-clock round countdown
//!
//! Remaining time is always recomputed from the start timestamp, so a host
//! that polls late (background tab, slow frame) never accumulates drift.

/// Outcome of a timer poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// Not running
    Idle,
    Running { time_left_secs: u32 },
    /// Reached zero on this poll; the timer has stopped itself
    Expired,
}

#[derive(Debug, Clone, Default)]
pub struct RoundTimer {
    duration_secs: u32,
    started_at_ms: Option<f64>,
}

impl RoundTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the countdown
    pub fn start(&mut self, duration_secs: u32, now_ms: f64) {
        self.duration_secs = duration_secs;
        self.started_at_ms = Some(now_ms);
    }

    /// Safe to call when not running
    pub fn stop(&mut self) {
        self.started_at_ms = None;
    }

    pub fn is_running(&self) -> bool {
        self.started_at_ms.is_some()
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    /// Whole seconds remaining at `now_ms` (0 when stopped)
    pub fn time_left(&self, now_ms: f64) -> u32 {
        let Some(start) = self.started_at_ms else {
            return 0;
        };
        let elapsed_secs = ((now_ms - start).max(0.0) / 1000.0).floor();
        (self.duration_secs as f64 - elapsed_secs).max(0.0) as u32
    }

    pub fn poll(&mut self, now_ms: f64) -> TimerTick {
        if !self.is_running() {
            return TimerTick::Idle;
        }
        match self.time_left(now_ms) {
            0 => {
                self.stop();
                TimerTick::Expired
            }
            time_left_secs => TimerTick::Running { time_left_secs },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_down_from_wall_clock() {
        let mut t = RoundTimer::new();
        t.start(60, 10_000.0);
        assert_eq!(t.poll(10_000.0), TimerTick::Running { time_left_secs: 60 });
        assert_eq!(t.poll(10_999.0), TimerTick::Running { time_left_secs: 60 });
        assert_eq!(t.poll(11_000.0), TimerTick::Running { time_left_secs: 59 });
        // A long gap between polls lands on the right value
        assert_eq!(t.poll(40_250.0), TimerTick::Running { time_left_secs: 30 });
    }

    #[test]
    fn test_expires_once() {
        let mut t = RoundTimer::new();
        t.start(10, 0.0);
        assert_eq!(t.poll(9_750.0), TimerTick::Running { time_left_secs: 1 });
        assert_eq!(t.poll(10_000.0), TimerTick::Expired);
        assert!(!t.is_running());
        assert_eq!(t.poll(10_250.0), TimerTick::Idle);
    }

    #[test]
    fn test_late_poll_still_expires() {
        let mut t = RoundTimer::new();
        t.start(10, 0.0);
        assert_eq!(t.poll(95_000.0), TimerTick::Expired);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut t = RoundTimer::new();
        t.stop();
        t.start(30, 0.0);
        t.stop();
        t.stop();
        assert_eq!(t.poll(1_000.0), TimerTick::Idle);
        assert_eq!(t.time_left(1_000.0), 0);
    }

    #[test]
    fn test_clock_going_backwards_clamps() {
        let mut t = RoundTimer::new();
        t.start(30, 5_000.0);
        assert_eq!(t.time_left(4_000.0), 30);
    }
}
