//! Typed entities produced by the store's normalization step.
//!
//! Everything here is already "clean": missing or malformed fields in the
//! underlying documents were replaced by defaults before these structs were
//! built, so consumers never see a partially-typed record.

use serde::{Deserialize, Serialize};

use crate::types::{MentorId, Role, TaskId, UserId};

// ---------------------------------------------------------------------------
// Mentor
// ---------------------------------------------------------------------------

/// A mentorship provider as listed in the directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Mentor {
    pub id: MentorId,
    pub name: String,
    pub bio: String,
    /// Download URL of the profile photo, empty when none was uploaded.
    pub photo: String,
    /// Comma-separated tag list exactly as the mentor typed it.
    pub skills: String,
    /// Comma-separated tag list exactly as the mentor typed it.
    pub mentorship_areas: String,
    pub experience_years: u32,
    pub availability: String,
    pub occupation: String,
    pub company: String,
    pub linkedin: String,
    /// Running mean of all review stars, `0.0` before the first review.
    pub rating: f64,
    pub views: u64,
    /// Chronological (insertion) order.
    pub reviews: Vec<Review>,
}

impl Mentor {
    pub fn review_count(&self) -> usize {
        self.reviews.len()
    }
}

/// One review left by a mentee. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Display name at submission time; not updated on later renames.
    pub reviewer_name: String,
    pub text: String,
    pub stars: i64,
}

// ---------------------------------------------------------------------------
// User account
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Scheduling widget URL. Only meaningful for mentors.
    pub scheduling_url: String,
    pub photo_url: String,
    /// Raw comma-separated interest list of a mentee.
    pub areas_of_interest: String,
    pub sessions_count: u32,
    /// Mentor this mentee registered with, if any.
    pub mentor_id: Option<MentorId>,
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

/// Entry of the mentor dashboard planning list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub owner_id: UserId,
    pub text: String,
}
