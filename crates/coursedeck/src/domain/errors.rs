//! Domain-specific errors.

use thiserror::Error;

/// Errors raised by lesson, note, and quiz operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("course '{0}' not found")]
    CourseNotFound(String),
    #[error("lesson '{0}' not found")]
    LessonNotFound(String),
    #[error("lesson '{0}' is locked")]
    LessonLocked(String),
    #[error("note '{0}' not found")]
    NoteNotFound(String),
    #[error("a note needs a title")]
    MissingNoteTitle,
    #[error("rating must be between 1 and 5, got '{0}'")]
    InvalidRating(String),
    #[error("a review needs some text")]
    EmptyReview,
}

/// Errors raised by the bookmark store.
///
/// Toggling unknown ids is never an error; the only failure is using the store without a live
/// provider, which is an integration bug and must surface immediately.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkError {
    #[error("bookmark store used outside of a BookmarkProvider")]
    ProviderMissing,
}
