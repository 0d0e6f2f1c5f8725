//! Aggregate rating math and the review submission state machine.
//!
//! The aggregate is maintained incrementally from the previously stored mean
//! and the review count, never by re-summing the review list:
//!
//! ```text
//! new = (current * count + stars) / (count + 1)
//! ```

use std::sync::{Mutex, Weak};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::MIN_REVIEW_STARS;
use crate::error::DomainError;
use crate::models::Review;

/// Fold one more star value into a running mean.
///
/// With `current_review_count == 0` the result is exactly `stars`.
pub fn next_rating(current_rating: f64, current_review_count: usize, stars: i64) -> f64 {
    let count = current_review_count as f64;
    (current_rating * count + stars as f64) / (count + 1.0)
}

// ---------------------------------------------------------------------------
// Draft
// ---------------------------------------------------------------------------

/// A review about to be submitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReviewDraft {
    pub reviewer_name: String,
    pub text: String,
    pub stars: i64,
}

impl ReviewDraft {
    /// Stars above 5 are accepted on purpose; only the lower bound is enforced.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.text.trim().is_empty() {
            return Err(DomainError::EmptyReviewText);
        }
        if self.stars < MIN_REVIEW_STARS {
            return Err(DomainError::StarsBelowMinimum {
                got: self.stars,
                min: MIN_REVIEW_STARS,
            });
        }
        Ok(())
    }

    pub fn into_review(self) -> Review {
        Review {
            reviewer_name: self.reviewer_name,
            text: self.text,
            stars: self.stars,
        }
    }
}

// ---------------------------------------------------------------------------
// Form state machine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    Committed,
    /// Carries the message to surface to the submitter.
    Failed(String),
}

/// Input side of the review flow.
///
/// `Idle -> Submitting -> {Committed | Failed}`. There is no cancel: once
/// submitting, the form waits for the outcome. A commit clears the inputs, a
/// failure keeps them so the user can resubmit.
#[derive(Debug, Clone)]
pub struct ReviewForm {
    text: String,
    stars: i64,
    state: SubmissionState,
}

impl ReviewForm {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            stars: 0,
            state: SubmissionState::Idle,
        }
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_stars(&mut self, stars: i64) {
        self.stars = stars;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn stars(&self) -> i64 {
        self.stars
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Validate the inputs and move to `Submitting`.
    ///
    /// On a validation error the state is left untouched.
    pub fn begin_submit(&mut self, reviewer_name: &str) -> Result<ReviewDraft, DomainError> {
        if self.state == SubmissionState::Submitting {
            return Err(DomainError::SubmissionInFlight);
        }

        let draft = ReviewDraft {
            reviewer_name: reviewer_name.to_string(),
            text: self.text.clone(),
            stars: self.stars,
        };
        draft.validate()?;

        self.state = SubmissionState::Submitting;
        Ok(draft)
    }

    pub fn finish<E: std::fmt::Display>(&mut self, outcome: Result<(), E>) {
        match outcome {
            Ok(()) => {
                self.text.clear();
                self.stars = 0;
                self.state = SubmissionState::Committed;
            }
            Err(e) => {
                self.state = SubmissionState::Failed(e.to_string());
            }
        }
    }
}

impl Default for ReviewForm {
    fn default() -> Self {
        Self::new()
    }
}

/// Hand a submission outcome back to the form that started it.
///
/// Returns `false` (and does nothing) when the form has been dropped in the
/// meantime.
pub fn deliver<E: std::fmt::Display>(form: &Weak<Mutex<ReviewForm>>, outcome: Result<(), E>) -> bool {
    let Some(form) = form.upgrade() else {
        debug!("Review form gone before submission finished, dropping outcome");
        return false;
    };
    let Ok(mut guard) = form.lock() else {
        return false;
    };
    guard.finish(outcome);
    true
}
