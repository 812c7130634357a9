//! Capped exponential backoff for accept retries.

use std::time::Duration;

/// Default first retry delay.
pub const DEFAULT_MIN_DELAY: Duration = Duration::from_millis(5);

/// Default retry delay ceiling.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(1);

/// Backoff state owned by a single accept loop.
///
/// The delay starts at zero, jumps to `min` on the first failure of a streak
/// and doubles on each following failure until it reaches `max`. A successful
/// accept resets it to zero.
#[derive(Debug, Clone)]
pub struct AcceptBackoff {
    current: Duration,
    min: Duration,
    max: Duration,
}

impl AcceptBackoff {
    /// Create a backoff with the given bounds.
    ///
    /// A zero `min` falls back to [`DEFAULT_MIN_DELAY`] so a failure streak
    /// always sleeps. `max` is raised to `min` if lower.
    pub fn new(min: Duration, max: Duration) -> Self {
        let min = if min.is_zero() { DEFAULT_MIN_DELAY } else { min };
        Self {
            current: Duration::ZERO,
            min,
            max: max.max(min),
        }
    }

    /// Advance after a transient failure and return the delay to sleep.
    pub fn next_delay(&mut self) -> Duration {
        let next = if self.current.is_zero() {
            self.min
        } else {
            self.current.saturating_mul(2)
        };
        self.current = next.min(self.max);
        self.current
    }

    /// Clear the failure streak.
    pub fn reset(&mut self) {
        self.current = Duration::ZERO;
    }
}

impl Default for AcceptBackoff {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DELAY, DEFAULT_MAX_DELAY)
    }
}
