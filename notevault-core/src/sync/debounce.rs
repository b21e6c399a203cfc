//! Debounce timer for autosave.
//!
//! Each input event restarts a fixed quiet period; only the trailing edge
//! after the period elapses should trigger a save. Cancellation on a new
//! keystroke is a first-class operation here, not a side effect of
//! dropping a timer handle.

use std::time::{Duration, Instant};

/// Default quiet period before an autosave fires.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_secs(1);

/// Trailing-edge debounce timer owned by whoever drives the coordinator.
pub struct SaveDebouncer {
    quiet_period: Duration,
    last_input: Option<Instant>,
}

impl SaveDebouncer {
    /// Create a debouncer with the given quiet period.
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            last_input: None,
        }
    }

    /// Record an input event, restarting the quiet period.
    pub fn record_input(&mut self) {
        self.last_input = Some(Instant::now());
    }

    /// Cancel any pending save trigger.
    pub fn cancel(&mut self) {
        self.last_input = None;
    }

    /// True when the quiet period has elapsed since the last input.
    /// Consumes the pending trigger so a save fires exactly once per
    /// quiet period.
    pub fn take_ready(&mut self) -> bool {
        match self.last_input {
            Some(at) if at.elapsed() >= self.quiet_period => {
                self.last_input = None;
                true
            }
            _ => false,
        }
    }

    /// True when input is pending but the quiet period has not elapsed.
    pub fn is_pending(&self) -> bool {
        self.last_input.is_some()
    }

    /// Time remaining until the pending trigger fires, if any.
    pub fn time_until_fire(&self) -> Option<Duration> {
        self.last_input
            .map(|at| self.quiet_period.saturating_sub(at.elapsed()))
    }
}

impl Default for SaveDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_not_ready_without_input() {
        let mut debouncer = SaveDebouncer::new(Duration::from_millis(50));
        assert!(!debouncer.take_ready());
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_fires_after_quiet_period() {
        let mut debouncer = SaveDebouncer::new(Duration::from_millis(50));
        debouncer.record_input();

        assert!(!debouncer.take_ready());
        thread::sleep(Duration::from_millis(80));
        assert!(debouncer.take_ready());

        // Trigger is consumed; it fires once.
        assert!(!debouncer.take_ready());
    }

    #[test]
    fn test_new_input_restarts_period() {
        // Wide margins to avoid flaky behavior on slow CI runners.
        let mut debouncer = SaveDebouncer::new(Duration::from_millis(200));
        debouncer.record_input();

        thread::sleep(Duration::from_millis(120));
        debouncer.record_input();

        thread::sleep(Duration::from_millis(120));
        // 240ms since first input, but only 120ms since the second.
        assert!(!debouncer.take_ready());

        thread::sleep(Duration::from_millis(150));
        assert!(debouncer.take_ready());
    }

    #[test]
    fn test_cancel_clears_pending() {
        let mut debouncer = SaveDebouncer::new(Duration::from_millis(30));
        debouncer.record_input();
        debouncer.cancel();

        thread::sleep(Duration::from_millis(60));
        assert!(!debouncer.take_ready());
    }

    #[test]
    fn test_time_until_fire() {
        let mut debouncer = SaveDebouncer::new(Duration::from_secs(1));
        assert!(debouncer.time_until_fire().is_none());

        debouncer.record_input();
        let remaining = debouncer.time_until_fire().unwrap();
        assert!(remaining <= Duration::from_secs(1));
    }
}
