//! Mentor directory records.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use mentorlink_shared::constants::COLLECTION_MENTORS;
use mentorlink_shared::error::DomainError;
use mentorlink_shared::models::Mentor;
use mentorlink_shared::types::MentorId;

use crate::document_store::{require, DocumentStore};
use crate::documents::{Document, DocumentUpdate, FieldEq, Fields};
use crate::error::Result;
use crate::records::{field, mentor_from_document};

/// The fields a mentor edits about themselves.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct MentorProfile {
    pub name: String,
    pub bio: String,
    pub photo: String,
    pub skills: String,
    pub mentorship_areas: String,
    pub experience_years: u32,
    pub availability: String,
    pub occupation: String,
    pub company: String,
    pub linkedin: String,
}

impl MentorProfile {
    pub fn validate(&self) -> std::result::Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::EmptyName);
        }
        Ok(())
    }

    fn field_values(&self) -> [(&'static str, Value); 10] {
        [
            (field::NAME, json!(self.name.trim())),
            (field::BIO, json!(self.bio)),
            (field::PHOTO, json!(self.photo)),
            (field::SKILLS, json!(self.skills)),
            (field::MENTORSHIP_AREAS, json!(self.mentorship_areas)),
            (field::EXPERIENCE, json!(self.experience_years)),
            (field::AVAILABILITY, json!(self.availability)),
            (field::OCCUPATION, json!(self.occupation)),
            (field::COMPANY, json!(self.company)),
            (field::LINKEDIN, json!(self.linkedin)),
        ]
    }
}

pub async fn register_mentor(store: &dyn DocumentStore, profile: &MentorProfile) -> Result<Mentor> {
    profile.validate()?;

    let mut fields: Fields = profile
        .field_values()
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    fields.insert(field::RATINGS.into(), json!(0.0));
    fields.insert(field::VIEWS.into(), json!(0));
    fields.insert(field::REVIEWS.into(), json!([]));

    let id = store.add_document(COLLECTION_MENTORS, fields.clone()).await?;
    info!(mentor = %id, name = %profile.name, "Mentor registered");

    Ok(mentor_from_document(&Document { id, fields }))
}

pub async fn get_mentor(store: &dyn DocumentStore, id: &MentorId) -> Result<Mentor> {
    let doc = require(store, COLLECTION_MENTORS, id.as_str()).await?;
    Ok(mentor_from_document(&doc))
}

pub async fn list_mentors(store: &dyn DocumentStore) -> Result<Vec<Mentor>> {
    let docs = store.query(COLLECTION_MENTORS, &[]).await?;
    Ok(docs.iter().map(mentor_from_document).collect())
}

/// Mentors are matched to accounts by display name; the first match wins.
pub async fn find_mentor_by_name(store: &dyn DocumentStore, name: &str) -> Result<Option<Mentor>> {
    let docs = store
        .query(COLLECTION_MENTORS, &[FieldEq::new(field::NAME, name)])
        .await?;
    Ok(docs.first().map(mentor_from_document))
}

/// Replace the profile fields. Rating, views and reviews are untouched.
pub async fn update_mentor_profile(
    store: &dyn DocumentStore,
    id: &MentorId,
    profile: &MentorProfile,
) -> Result<Mentor> {
    profile.validate()?;

    let update = profile
        .field_values()
        .into_iter()
        .fold(DocumentUpdate::new(), |update, (k, v)| update.set(k, v));
    store.update(COLLECTION_MENTORS, id.as_str(), update).await?;

    get_mentor(store, id).await
}

/// Count a "connect" click.
///
/// The new value is computed from `snapshot`, which the caller read earlier.
/// Two viewers holding the same snapshot both write `views + 1`, and one of
/// the increments is lost.
pub async fn record_view(store: &dyn DocumentStore, snapshot: &Mentor) -> Result<u64> {
    let views = snapshot.views + 1;
    store
        .update(
            COLLECTION_MENTORS,
            snapshot.id.as_str(),
            DocumentUpdate::new().set(field::VIEWS, views),
        )
        .await?;
    Ok(views)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_store::tests::open_store;
    use crate::error::StoreError;

    fn profile(name: &str, skills: &str) -> MentorProfile {
        MentorProfile {
            name: name.to_string(),
            skills: skills.to_string(),
            experience_years: 4,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn register_and_read_back() {
        let (store, _dir) = open_store();
        let created = register_mentor(&store, &profile("Ada", "Rust, Go")).await.unwrap();
        assert_eq!(created.rating, 0.0);
        assert_eq!(created.views, 0);

        let fetched = get_mentor(&store, &created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.experience_years, 4);

        let listed = list_mentors(&store).await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn blank_name_rejected() {
        let (store, _dir) = open_store();
        let err = register_mentor(&store, &profile("  ", "")).await.unwrap_err();
        assert!(matches!(err, StoreError::Invalid(DomainError::EmptyName)));
    }

    #[tokio::test]
    async fn missing_mentor_is_not_found() {
        let (store, _dir) = open_store();
        let err = get_mentor(&store, &MentorId::from("nope")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn find_by_name() {
        let (store, _dir) = open_store();
        register_mentor(&store, &profile("Ada", "")).await.unwrap();
        register_mentor(&store, &profile("Grace", "")).await.unwrap();

        let found = find_mentor_by_name(&store, "Grace").await.unwrap().unwrap();
        assert_eq!(found.name, "Grace");
        assert!(find_mentor_by_name(&store, "grace").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn profile_update_keeps_aggregates() {
        let (store, _dir) = open_store();
        let created = register_mentor(&store, &profile("Ada", "Rust")).await.unwrap();
        record_view(&store, &created).await.unwrap();

        let updated = update_mentor_profile(&store, &created.id, &profile("Ada L.", "Rust, C"))
            .await
            .unwrap();
        assert_eq!(updated.name, "Ada L.");
        assert_eq!(updated.skills, "Rust, C");
        assert_eq!(updated.views, 1);
    }

    #[tokio::test]
    async fn sequential_views_count_up() {
        let (store, _dir) = open_store();
        let mentor = register_mentor(&store, &profile("Ada", "")).await.unwrap();

        record_view(&store, &mentor).await.unwrap();
        let fresh = get_mentor(&store, &mentor.id).await.unwrap();
        assert_eq!(record_view(&store, &fresh).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn concurrent_views_from_stale_snapshot_lose_an_increment() {
        let (store, _dir) = open_store();
        let mentor = register_mentor(&store, &profile("Ada", "")).await.unwrap();

        // Two viewers opened the directory before either clicked.
        let seen_by_a = get_mentor(&store, &mentor.id).await.unwrap();
        let seen_by_b = get_mentor(&store, &mentor.id).await.unwrap();
        record_view(&store, &seen_by_a).await.unwrap();
        record_view(&store, &seen_by_b).await.unwrap();

        let after = get_mentor(&store, &mentor.id).await.unwrap();
        assert_eq!(after.views, 1);
    }
}
