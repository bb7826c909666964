//! Minimum-interval gate for discrete action channels

/// Allows at most one fire per `min_interval_ms`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimiter {
    pub min_interval_ms: f64,
    /// Time of the last accepted fire (None = never fired this round)
    pub last_fire_ms: Option<f64>,
}

impl RateLimiter {
    pub fn new(min_interval_ms: f64) -> Self {
        Self {
            min_interval_ms,
            last_fire_ms: None,
        }
    }

    /// True if a fire at `now_ms` would be accepted
    pub fn ready(&self, now_ms: f64) -> bool {
        match self.last_fire_ms {
            Some(last) => now_ms - last >= self.min_interval_ms,
            None => true,
        }
    }

    pub fn mark(&mut self, now_ms: f64) {
        self.last_fire_ms = Some(now_ms);
    }

    /// Check and mark in one step
    pub fn try_fire(&mut self, now_ms: f64) -> bool {
        if self.ready(now_ms) {
            self.mark(now_ms);
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.last_fire_ms = None;
    }
}
