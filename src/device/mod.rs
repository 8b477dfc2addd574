//! Device backends
//!
//! A device is whatever sits between the core and a real screen: it
//! produces frames, accepts taps, and runs digit reads. The core is
//! written against the [`Device`] trait so the same tasks drive the
//! Android bridge in production and [`SimDevice`](sim::SimDevice) in
//! tests.

pub mod android;
pub mod bridge;
pub mod humanize;
pub mod input;
pub mod sim;

use std::time::Duration;

use crate::vision::{DigitReader, Perceptor};

pub use android::{channel, AndroidDevice, AndroidLink, Command};
pub use humanize::Jitter;
pub use input::{ScreenCoords, REF_HEIGHT, REF_WIDTH};
pub use sim::SimDevice;

/// Input side of a device
pub trait Actuator {
    /// Tap at reference-resolution coordinates
    fn tap(&mut self, x: i32, y: i32) -> Result<(), DeviceError>;

    /// Let the game catch up
    fn sleep(&mut self, duration: Duration);

    /// Forget recent taps, e.g. after a page settles
    fn clear_input_history(&mut self);

    /// Reset the idle watchdog after deliberate waiting
    fn clear_stuck_detector(&mut self);
}

/// Full device surface the core drives
pub trait Device: Perceptor + DigitReader + Actuator {}

impl<T: Perceptor + DigitReader + Actuator> Device for T {}

/// Failures a device backend can raise
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("no frame arrived within {0:?}")]
    CaptureTimeout(Duration),
    #[error("frame buffer holds {actual} bytes, expected {expected} for {width}x{height}")]
    InvalidFrame {
        expected: usize,
        actual: usize,
        width: u32,
        height: u32,
    },
    #[error("tapped {target} {count} times without progress")]
    TooManyTaps { target: String, count: u32 },
    #[error("no taps issued for {idle:?}, automation looks stuck")]
    Stuck { idle: Duration },
    #[error("digit read failed: {0}")]
    Recognizer(String),
    #[error("device link closed")]
    Disconnected,
}
