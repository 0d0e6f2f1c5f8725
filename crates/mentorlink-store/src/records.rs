//! Store-boundary normalization.
//!
//! Documents are loosely typed bags. This module is the single place where
//! they become the typed models of `mentorlink-shared`: any missing or
//! wrongly-typed field is replaced by a default and never reported as an
//! error, so one malformed record cannot break a listing.

use serde_json::{json, Value};

use mentorlink_shared::models::{Mentor, Review, Task, UserAccount};
use mentorlink_shared::types::{MentorId, Role, TaskId, UserId};

use crate::documents::{Document, Fields};

/// Field names as stored in documents.
pub mod field {
    pub const NAME: &str = "name";
    pub const BIO: &str = "bio";
    pub const PHOTO: &str = "photo";
    pub const SKILLS: &str = "skills";
    pub const MENTORSHIP_AREAS: &str = "mentorshipAreas";
    pub const EXPERIENCE: &str = "experience";
    pub const AVAILABILITY: &str = "availability";
    pub const OCCUPATION: &str = "occupation";
    pub const COMPANY: &str = "company";
    pub const LINKEDIN: &str = "linkedin";
    pub const RATINGS: &str = "ratings";
    pub const VIEWS: &str = "views";
    pub const REVIEWS: &str = "reviews";

    pub const REVIEWER_NAME: &str = "reviewerName";
    pub const REVIEW_TEXT: &str = "review";
    pub const REVIEW_RATING: &str = "rating";

    pub const EMAIL: &str = "email";
    pub const ROLE: &str = "role";
    pub const SCHEDULING_URL: &str = "calendlyUrl";
    pub const PHOTO_URL: &str = "photoURL";
    pub const AREAS_OF_INTEREST: &str = "areasOfInterest";
    pub const SESSIONS_COUNT: &str = "sessionsCount";
    pub const MENTOR_ID: &str = "mentorId";

    pub const TEXT: &str = "text";
    pub const OWNER_ID: &str = "ownerId";
}

// ---------------------------------------------------------------------------
// Lenient field readers
// ---------------------------------------------------------------------------

fn text(fields: &Fields, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

fn unsigned(fields: &Fields, key: &str) -> u64 {
    match fields.get(key) {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn float(fields: &Fields, key: &str) -> f64 {
    let value = match fields.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    };
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn integer(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

// ---------------------------------------------------------------------------
// Documents -> models
// ---------------------------------------------------------------------------

pub fn review_from_value(value: &Value) -> Review {
    let Some(entry) = value.as_object() else {
        return Review {
            reviewer_name: String::new(),
            text: String::new(),
            stars: 0,
        };
    };
    Review {
        reviewer_name: text(entry, field::REVIEWER_NAME),
        text: text(entry, field::REVIEW_TEXT),
        stars: integer(entry.get(field::REVIEW_RATING)),
    }
}

pub fn mentor_from_document(doc: &Document) -> Mentor {
    let f = &doc.fields;
    let reviews = f
        .get(field::REVIEWS)
        .and_then(Value::as_array)
        .map(|items| items.iter().map(review_from_value).collect())
        .unwrap_or_default();

    Mentor {
        id: MentorId::from(doc.id.as_str()),
        name: text(f, field::NAME),
        bio: text(f, field::BIO),
        photo: text(f, field::PHOTO),
        skills: text(f, field::SKILLS),
        mentorship_areas: text(f, field::MENTORSHIP_AREAS),
        experience_years: u32::try_from(unsigned(f, field::EXPERIENCE)).unwrap_or(u32::MAX),
        availability: text(f, field::AVAILABILITY),
        occupation: text(f, field::OCCUPATION),
        company: text(f, field::COMPANY),
        linkedin: text(f, field::LINKEDIN),
        rating: float(f, field::RATINGS),
        views: unsigned(f, field::VIEWS),
        reviews,
    }
}

pub fn account_from_document(doc: &Document) -> UserAccount {
    let f = &doc.fields;
    UserAccount {
        id: UserId::from(doc.id.as_str()),
        name: text(f, field::NAME),
        email: text(f, field::EMAIL),
        role: Role::parse_lenient(&text(f, field::ROLE)),
        scheduling_url: text(f, field::SCHEDULING_URL),
        photo_url: text(f, field::PHOTO_URL),
        areas_of_interest: text(f, field::AREAS_OF_INTEREST),
        sessions_count: u32::try_from(unsigned(f, field::SESSIONS_COUNT)).unwrap_or(u32::MAX),
        mentor_id: non_empty(text(f, field::MENTOR_ID)).map(MentorId::from),
    }
}

pub fn task_from_document(doc: &Document) -> Task {
    Task {
        id: TaskId::from(doc.id.as_str()),
        owner_id: UserId::from(text(&doc.fields, field::OWNER_ID)),
        text: text(&doc.fields, field::TEXT),
    }
}

// ---------------------------------------------------------------------------
// Models -> document values
// ---------------------------------------------------------------------------

pub fn review_to_value(review: &Review) -> Value {
    json!({
        field::REVIEWER_NAME: review.reviewer_name,
        field::REVIEW_TEXT: review.text,
        field::REVIEW_RATING: review.stars,
    })
}
