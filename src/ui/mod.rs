//! Screen graph and navigation
//!
//! The game is modeled as a directed graph of screens. [`page`] holds
//! the graph and its breadth-first router, [`map`] wires the standard
//! screens, [`navigate`] walks routes on a live device.

pub mod assets;
pub mod map;
pub mod navigate;
pub mod page;

pub use map::{Pages, PAGES};
pub use navigate::Navigator;
pub use page::{Page, PageGraph, PageId, Transition};

use crate::device::DeviceError;

/// Ways navigation can fail
#[derive(Debug, thiserror::Error)]
pub enum NavigateError {
    #[error("no route from {from} to {to}")]
    NoRoute {
        from: &'static str,
        to: &'static str,
    },
    #[error("timed out waiting for {waiting_for}")]
    Timeout { waiting_for: &'static str },
    #[error("lost on the way to {expected}, landed on {found}")]
    Lost {
        expected: &'static str,
        found: &'static str,
    },
    #[error(transparent)]
    Device(#[from] DeviceError),
}
