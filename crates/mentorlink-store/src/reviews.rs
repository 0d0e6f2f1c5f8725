//! Applying a review to a mentor's aggregate rating.
//!
//! Submission is read-modify-write: read the mentor, fold the new stars into
//! the stored mean, then write the new mean and append the review in one
//! update. The read and the write are separate calls.
//!
//! Under [`RatingWriteMode::LastWriteWins`] (the default) two reviewers who
//! read the same snapshot both compute from it; both reviews are appended,
//! but the scalar rating written last silently replaces the other one.
//! [`RatingWriteMode::Conditional`] instead makes the write conditional on
//! the review count seen at read time, and the losing submission fails with
//! `StoreError::Conflict` so the user can resubmit. That mode changes
//! observable behavior and is opt-in.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use mentorlink_shared::constants::COLLECTION_MENTORS;
use mentorlink_shared::models::{Mentor, Review};
use mentorlink_shared::rating::{next_rating, ReviewDraft};
use mentorlink_shared::types::MentorId;

use crate::document_store::DocumentStore;
use crate::documents::DocumentUpdate;
use crate::error::Result;
use crate::mentors::get_mentor;
use crate::records::{field, review_to_value};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RatingWriteMode {
    #[default]
    LastWriteWins,
    Conditional,
}

impl FromStr for RatingWriteMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last_write_wins" | "racy" => Ok(Self::LastWriteWins),
            "conditional" | "transactional" => Ok(Self::Conditional),
            other => Err(format!("unknown rating write mode: {other}")),
        }
    }
}

/// Everything needed to write one review, computed from a snapshot.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReviewCommit {
    pub mentor_id: MentorId,
    pub review: Review,
    /// Review count in the snapshot the rating was computed from.
    pub based_on_review_count: usize,
    pub new_rating: f64,
}

pub fn plan_review(snapshot: &Mentor, draft: ReviewDraft) -> Result<ReviewCommit> {
    draft.validate()?;
    let based_on_review_count = snapshot.review_count();
    Ok(ReviewCommit {
        mentor_id: snapshot.id.clone(),
        new_rating: next_rating(snapshot.rating, based_on_review_count, draft.stars),
        review: draft.into_review(),
        based_on_review_count,
    })
}

pub async fn commit_review(
    store: &dyn DocumentStore,
    commit: &ReviewCommit,
    mode: RatingWriteMode,
) -> Result<()> {
    let mut update = DocumentUpdate::new()
        .append(field::REVIEWS, review_to_value(&commit.review))
        .set(field::RATINGS, commit.new_rating);
    if mode == RatingWriteMode::Conditional {
        update = update.expect_array_len(field::REVIEWS, commit.based_on_review_count);
    }

    if let Err(e) = store
        .update(COLLECTION_MENTORS, commit.mentor_id.as_str(), update)
        .await
    {
        warn!(mentor = %commit.mentor_id, error = %e, "Review write rejected");
        return Err(e);
    }

    info!(
        mentor = %commit.mentor_id,
        stars = commit.review.stars,
        rating = commit.new_rating,
        ?mode,
        "Review committed"
    );
    Ok(())
}

/// Read the mentor, plan, and commit. Nothing is applied if the write fails.
pub async fn submit_review(
    store: &dyn DocumentStore,
    mentor_id: &MentorId,
    draft: ReviewDraft,
    mode: RatingWriteMode,
) -> Result<ReviewCommit> {
    draft.validate()?;
    let snapshot = get_mentor(store, mentor_id).await?;
    let commit = plan_review(&snapshot, draft)?;
    commit_review(store, &commit, mode).await?;
    Ok(commit)
}
