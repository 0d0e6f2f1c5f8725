use thiserror::Error;

/// Validation failures raised before anything reaches the store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Review text must not be empty")]
    EmptyReviewText,

    #[error("Rating must be at least {min} star(s), got {got}")]
    StarsBelowMinimum { got: i64, min: i64 },

    #[error("A review is already being submitted")]
    SubmissionInFlight,

    #[error("Display name must not be empty")]
    EmptyName,

    #[error("Mentors must provide a scheduling URL")]
    MissingSchedulingUrl,
}
