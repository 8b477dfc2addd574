//! Game tasks
//!
//! A task is a small state machine over navigation and polling loops:
//! bring the game to its screen, work until done, report how it went.
//! Failures that leave the game in a sane place recover by navigating
//! back before returning the error.

pub mod arena;
pub mod coop;

pub use arena::{ArenaMode, ArenaTask};
pub use coop::CoopTask;

use crate::ai::SelectError;
use crate::device::DeviceError;
use crate::ui::NavigateError;

/// How a finished task left things
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Did its work
    Completed,
    /// The game mode is closed right now, e.g. between seasons
    Unavailable,
    /// Nothing to do, e.g. no attempts left
    Nothing,
}

/// Ways a task can fail
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error(transparent)]
    Navigate(#[from] NavigateError),
    #[error(transparent)]
    Device(#[from] DeviceError),
    #[error(transparent)]
    Select(#[from] SelectError),
    #[error("{task}: the game rejected the operation")]
    OperationFailed { task: &'static str },
    #[error("{task}: no progress within the pass limit")]
    Stalled { task: &'static str },
}
