//! Decision engines
//!
//! Pure scoring logic with no device access. Tasks read numbers off the
//! screen, hand them in here, and act on the answer.

pub mod opponent;

pub use opponent::{choose, rank, select, Candidate, ScoreDimension, SelectError, Strategy};
