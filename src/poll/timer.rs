//! Debounce and confirmation timers
//!
//! Screen automation runs on a capture loop, so "wait" means "keep
//! polling until enough time and enough sightings have passed". A
//! [`Timer`] tracks both: a wall-clock interval and a minimum number of
//! observations. Rules use timers to debounce taps; loops use them to
//! demand that a success condition holds across several frames before
//! trusting it.

use std::time::{Duration, Instant};

/// Combined interval and observation-count gate
///
/// A fresh (or [`clear`](Timer::clear)ed) timer is immediately
/// reachable, so the first pass through a rule fires without delay.
/// After [`start`](Timer::start) or [`reset`](Timer::reset) the timer
/// blocks until `interval` has elapsed and [`reached`](Timer::reached)
/// has been called at least `count` times.
#[derive(Debug, Clone)]
pub struct Timer {
    interval: Duration,
    count: u32,
    started_at: Option<Instant>,
    observed: u32,
}

impl Timer {
    /// Timer gated on `interval` with a single observation
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            count: 1,
            started_at: None,
            observed: 1,
        }
    }

    /// Convenience constructor from milliseconds
    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// Require at least `count` observations once started
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        // Keep the fresh timer immediately reachable
        if self.started_at.is_none() {
            self.observed = count;
        }
        self
    }

    /// Arm the timer if it is not already running
    pub fn start(&mut self) -> &mut Self {
        if !self.started() {
            self.started_at = Some(Instant::now());
            self.observed = 0;
        }
        self
    }

    /// Whether the timer is running
    pub fn started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Time since start, zero if not started
    pub fn current(&self) -> Duration {
        self.started_at.map_or(Duration::ZERO, |t| t.elapsed())
    }

    /// Record an observation and test the gate
    ///
    /// True when the interval has elapsed (trivially so for an unstarted
    /// timer) and this is at least the `count`-th observation.
    pub fn reached(&mut self) -> bool {
        self.observed = self.observed.saturating_add(1);
        let elapsed_ok = match self.started_at {
            Some(t) => t.elapsed() >= self.interval,
            None => true,
        };
        elapsed_ok && self.observed >= self.count
    }

    /// Restart the interval and forget all observations
    pub fn reset(&mut self) -> &mut Self {
        self.started_at = Some(Instant::now());
        self.observed = 0;
        self
    }

    /// Restart the interval but keep the observation tally
    pub fn reset_clock(&mut self) -> &mut Self {
        self.started_at = Some(Instant::now());
        self
    }

    /// Disarm the timer, making it immediately reachable again
    pub fn clear(&mut self) -> &mut Self {
        self.started_at = None;
        self.observed = self.count;
        self
    }

    /// [`reached`](Timer::reached), resetting on success
    pub fn reached_and_reset(&mut self) -> bool {
        if self.reached() {
            self.reset();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_fresh_timer_is_reachable() {
        let mut t = Timer::from_millis(10_000);
        assert!(!t.started());
        assert!(t.reached());
    }

    #[test]
    fn test_started_timer_blocks_until_interval() {
        let mut t = Timer::from_millis(30);
        t.start();
        assert!(t.started());
        assert!(!t.reached());
        thread::sleep(Duration::from_millis(40));
        assert!(t.reached());
    }

    #[test]
    fn test_start_is_idempotent() {
        let mut t = Timer::from_millis(30);
        t.start();
        thread::sleep(Duration::from_millis(40));
        // A second start must not restart the interval
        t.start();
        assert!(t.reached());
    }

    #[test]
    fn test_observation_count_gate() {
        let mut t = Timer::from_millis(1).with_count(3);
        t.start();
        thread::sleep(Duration::from_millis(5));
        assert!(!t.reached());
        assert!(!t.reached());
        assert!(t.reached());
    }

    #[test]
    fn test_reset_restarts_both_gates() {
        let mut t = Timer::from_millis(20).with_count(2);
        t.start();
        thread::sleep(Duration::from_millis(30));
        t.reached();
        assert!(t.reached());
        t.reset();
        assert!(!t.reached());
        thread::sleep(Duration::from_millis(30));
        assert!(t.reached());
    }

    #[test]
    fn test_reset_clock_keeps_observations() {
        let mut t = Timer::from_millis(20).with_count(2);
        t.start();
        thread::sleep(Duration::from_millis(30));
        t.reached();
        t.reached();
        t.reset_clock();
        assert!(!t.reached());
        thread::sleep(Duration::from_millis(30));
        // Tally survived the clock reset, one observation suffices
        assert!(t.reached());
    }

    #[test]
    fn test_clear_forces_reachable() {
        let mut t = Timer::from_millis(60_000).with_count(5);
        t.start();
        assert!(!t.reached());
        t.clear();
        assert!(!t.started());
        assert!(t.reached());
    }

    #[test]
    fn test_reached_and_reset() {
        let mut t = Timer::from_millis(20);
        t.start();
        assert!(!t.reached_and_reset());
        thread::sleep(Duration::from_millis(30));
        assert!(t.reached_and_reset());
        // The success reset re-armed the interval
        assert!(!t.reached_and_reset());
    }

    #[test]
    fn test_current_tracks_elapsed() {
        let mut t = Timer::from_millis(1000);
        assert_eq!(t.current(), Duration::ZERO);
        t.start();
        thread::sleep(Duration::from_millis(10));
        assert!(t.current() >= Duration::from_millis(10));
    }
}
