//! Debounce and configuration window timers
//!
//! Both timers are driven by explicit millisecond timestamps so they can be
//! ticked from any loop and tested without a clock.

/// Quiet-period timer for auto-save
///
/// Armed by every accepted edit. Due once strictly more than `delay_ms` has
/// passed since the last arming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveDebounce {
    delay_ms: u64,
    armed_at_ms: Option<u64>,
}

impl SaveDebounce {
    pub const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            armed_at_ms: None,
        }
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    /// (Re)start the quiet period at `now_ms`
    pub fn arm(&mut self, now_ms: u64) {
        self.armed_at_ms = Some(now_ms);
    }

    pub fn disarm(&mut self) {
        self.armed_at_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.armed_at_ms.is_some()
    }

    /// Timestamp of the last arming
    pub fn armed_at_ms(&self) -> Option<u64> {
        self.armed_at_ms
    }

    pub fn is_due(&self, now_ms: u64) -> bool {
        match self.armed_at_ms {
            Some(at) => now_ms.saturating_sub(at) > self.delay_ms,
            None => false,
        }
    }
}

/// Countdown for the timed configuration window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowTimer {
    timeout_ms: u64,
    started_at_ms: Option<u64>,
}

impl WindowTimer {
    pub const fn new(timeout_ms: u64) -> Self {
        Self {
            timeout_ms,
            started_at_ms: None,
        }
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    pub fn start(&mut self, now_ms: u64) {
        self.started_at_ms = Some(now_ms);
    }

    pub fn is_running(&self) -> bool {
        self.started_at_ms.is_some()
    }

    /// True once strictly more than `timeout_ms` has elapsed since `start`
    pub fn is_expired(&self, now_ms: u64) -> bool {
        match self.started_at_ms {
            Some(at) => now_ms.saturating_sub(at) > self.timeout_ms,
            None => false,
        }
    }

    /// Time left before expiry; `None` when not started
    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.started_at_ms
            .map(|at| self.timeout_ms.saturating_sub(now_ms.saturating_sub(at)))
    }
}
