use thiserror::Error;

use crate::phase::PhaseKind;

/// Misuse of the pagination API.
///
/// Fetch failures never show up here: they are recorded inside the phase with
/// [`PaginationState::set_error`](crate::PaginationState::set_error).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerError {
    #[error("retry requested without a recorded failure (phase: {phase})")]
    InvalidState { phase: PhaseKind },

    #[error("no pages are appended yet")]
    EmptyState,
}

pub type Result<T> = std::result::Result<T, PagerError>;
