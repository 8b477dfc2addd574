//! Humanized input variation
//!
//! Machine-perfect taps land on the same pixel with the same cadence.
//! [`Jitter`] spreads tap points over the middle of a button and varies
//! the pauses between actions so the input stream looks hand-driven.

use std::time::Duration;

use rand::rngs::ThreadRng;
use rand::Rng;

use crate::vision::Rect;

/// Fraction of a button's extent taps are spread over, centered
const SPREAD: f32 = 0.6;

/// Randomness source for taps and delays
pub struct Jitter {
    rng: ThreadRng,
}

impl Jitter {
    /// Create a new jitter source
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }

    /// Pick a tap point inside the central portion of `rect`
    pub fn point_in(&mut self, rect: Rect) -> (i32, i32) {
        let span_w = ((rect.w as f32 * SPREAD) as u32).max(1);
        let span_h = ((rect.h as f32 * SPREAD) as u32).max(1);
        let x0 = rect.x + (rect.w.saturating_sub(span_w)) / 2;
        let y0 = rect.y + (rect.h.saturating_sub(span_h)) / 2;
        let x = x0 + self.rng.random_range(0..span_w);
        let y = y0 + self.rng.random_range(0..span_h);
        (x as i32, y as i32)
    }

    /// Short pause after a tap, 80 to 250 ms
    pub fn settle(&mut self) -> Duration {
        Duration::from_millis(self.rng.random_range(80..=250))
    }

    /// Vary a base delay by up to `variance_percent` in either direction
    pub fn spread_ms(&mut self, base_ms: u64, variance_percent: u64) -> Duration {
        let variance = base_ms * variance_percent / 100;
        let low = base_ms.saturating_sub(variance);
        let high = base_ms + variance;
        Duration::from_millis(self.rng.random_range(low..=high))
    }
}

impl Default for Jitter {
    fn default() -> Self {
        Self::new()
    }
}
