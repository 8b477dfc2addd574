//! Polling primitives
//!
//! The game never pushes events; the core finds out what happened by
//! looking. This module holds the two building blocks of that style:
//! [`Timer`] for time-and-sightings gates and [`ActionLoop`] for
//! prioritized watch-and-react loops.

pub mod runner;
pub mod timer;

pub use runner::{Act, ActionLoop, Cond, Rule, Verdict};
pub use timer::Timer;
