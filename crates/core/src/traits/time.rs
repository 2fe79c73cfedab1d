//! Time abstraction for session timing.
//!
//! The session only needs a monotonic millisecond counter: debounce and the
//! configuration window are both measured against it. Firmware binds this to
//! the platform timer, host tests use [`MockTime`].

use core::cell::Cell;

/// Monotonic millisecond clock.
///
/// # Example
///
/// ```
/// use webconf_core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// let started = time.now_ms();
/// time.advance(1_500);
/// assert_eq!(time.elapsed_ms_since(started), 1_500);
/// ```
pub trait TimeSource {
    /// Returns milliseconds since system start.
    fn now_ms(&self) -> u64;

    /// Returns milliseconds elapsed since `reference_ms`.
    ///
    /// Saturates to zero when the reference lies in the future.
    fn elapsed_ms_since(&self, reference_ms: u64) -> u64 {
        self.now_ms().saturating_sub(reference_ms)
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Controllable clock for host tests.
///
/// Interior mutability lets a test keep advancing time while the session
/// holds a shared reference to the same clock.
#[derive(Debug, Clone, Default)]
pub struct MockTime {
    current_ms: Cell<u64>,
}

impl MockTime {
    /// Creates a clock starting at 0 ms.
    pub fn new() -> Self {
        Self {
            current_ms: Cell::new(0),
        }
    }

    /// Creates a clock starting at `ms`.
    pub fn with_initial(ms: u64) -> Self {
        Self {
            current_ms: Cell::new(ms),
        }
    }

    /// Sets the absolute time.
    pub fn set(&self, ms: u64) {
        self.current_ms.set(ms);
    }

    /// Moves time forward by `ms`.
    pub fn advance(&self, ms: u64) {
        self.current_ms.set(self.current_ms.get().saturating_add(ms));
    }
}

impl TimeSource for MockTime {
    fn now_ms(&self) -> u64 {
        self.current_ms.get()
    }
}
