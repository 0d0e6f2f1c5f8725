//! User accounts: one document per identity-provider user, keyed by its ID.

use serde::Deserialize;
use serde_json::json;
use tracing::info;

use mentorlink_shared::constants::COLLECTION_USERS;
use mentorlink_shared::error::DomainError;
use mentorlink_shared::models::UserAccount;
use mentorlink_shared::types::{MentorId, Role, UserId};

use crate::document_store::{require, DocumentStore};
use crate::documents::{Document, DocumentUpdate, FieldEq, Fields};
use crate::error::Result;
use crate::records::{account_from_document, field};

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub scheduling_url: String,
}

impl NewAccount {
    pub fn validate(&self) -> std::result::Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::EmptyName);
        }
        if self.role == Role::Mentor && self.scheduling_url.trim().is_empty() {
            return Err(DomainError::MissingSchedulingUrl);
        }
        Ok(())
    }
}

/// Partial profile edit; `None` leaves the field alone.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub areas_of_interest: Option<String>,
    pub scheduling_url: Option<String>,
    pub photo_url: Option<String>,
    pub mentor_id: Option<MentorId>,
}

/// Store the account created for `user_id` at sign-up.
///
/// Only mentors keep a scheduling URL.
pub async fn create_account(
    store: &dyn DocumentStore,
    user_id: &UserId,
    account: &NewAccount,
) -> Result<UserAccount> {
    account.validate()?;

    let scheduling_url = match account.role {
        Role::Mentor => account.scheduling_url.trim(),
        Role::Mentee => "",
    };

    let fields: Fields = [
        (field::NAME, json!(account.name.trim())),
        (field::EMAIL, json!(account.email)),
        (field::ROLE, json!(account.role.as_str())),
        (field::SCHEDULING_URL, json!(scheduling_url)),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    store
        .set_document(COLLECTION_USERS, user_id.as_str(), fields.clone())
        .await?;
    info!(user = %user_id, role = %account.role, "Account created");

    Ok(account_from_document(&Document {
        id: user_id.to_string(),
        fields,
    }))
}

pub async fn get_account(store: &dyn DocumentStore, user_id: &UserId) -> Result<UserAccount> {
    let doc = require(store, COLLECTION_USERS, user_id.as_str()).await?;
    Ok(account_from_document(&doc))
}

pub async fn update_profile(
    store: &dyn DocumentStore,
    user_id: &UserId,
    changes: &ProfileUpdate,
) -> Result<UserAccount> {
    let mut update = DocumentUpdate::new();
    if let Some(name) = &changes.name {
        if name.trim().is_empty() {
            return Err(DomainError::EmptyName.into());
        }
        update = update.set(field::NAME, name.trim());
    }
    if let Some(interests) = &changes.areas_of_interest {
        update = update.set(field::AREAS_OF_INTEREST, interests.as_str());
    }
    if let Some(url) = &changes.scheduling_url {
        update = update.set(field::SCHEDULING_URL, url.trim());
    }
    if let Some(url) = &changes.photo_url {
        update = update.set(field::PHOTO_URL, url.as_str());
    }
    if let Some(mentor_id) = &changes.mentor_id {
        update = update.set(field::MENTOR_ID, mentor_id.as_str());
    }

    if !update.is_empty() {
        store
            .update(COLLECTION_USERS, user_id.as_str(), update)
            .await?;
    }
    get_account(store, user_id).await
}

/// The mentor-role account whose display name equals `name`.
pub async fn find_mentor_account_by_name(
    store: &dyn DocumentStore,
    name: &str,
) -> Result<Option<UserAccount>> {
    let docs = store
        .query(
            COLLECTION_USERS,
            &[
                FieldEq::new(field::NAME, name),
                FieldEq::new(field::ROLE, Role::Mentor.as_str()),
            ],
        )
        .await?;
    Ok(docs.first().map(account_from_document))
}

/// Mentees on the whole platform.
pub async fn count_mentees(store: &dyn DocumentStore) -> Result<usize> {
    let docs = store
        .query(
            COLLECTION_USERS,
            &[FieldEq::new(field::ROLE, Role::Mentee.as_str())],
        )
        .await?;
    Ok(docs.len())
}

/// Mentees that registered with `mentor_id`.
pub async fn count_mentees_for(store: &dyn DocumentStore, mentor_id: &MentorId) -> Result<usize> {
    let docs = store
        .query(
            COLLECTION_USERS,
            &[
                FieldEq::new(field::MENTOR_ID, mentor_id.as_str()),
                FieldEq::new(field::ROLE, Role::Mentee.as_str()),
            ],
        )
        .await?;
    Ok(docs.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_store::tests::open_store;
    use crate::error::StoreError;

    fn mentee(name: &str) -> NewAccount {
        NewAccount {
            name: name.to_string(),
            email: format!("{name}@example.com"),
            role: Role::Mentee,
            scheduling_url: "https://calendly.com/ignored".to_string(),
        }
    }

    fn mentor(name: &str) -> NewAccount {
        NewAccount {
            name: name.to_string(),
            email: format!("{name}@example.com"),
            role: Role::Mentor,
            scheduling_url: format!("https://calendly.com/{name}"),
        }
    }

    #[tokio::test]
    async fn mentee_account_drops_scheduling_url() {
        let (store, _dir) = open_store();
        let account = create_account(&store, &UserId::from("u1"), &mentee("sam"))
            .await
            .unwrap();
        assert_eq!(account.role, Role::Mentee);
        assert_eq!(account.scheduling_url, "");
        assert_eq!(get_account(&store, &UserId::from("u1")).await.unwrap(), account);
    }

    #[tokio::test]
    async fn mentor_requires_scheduling_url() {
        let (store, _dir) = open_store();
        let mut account = mentor("ada");
        account.scheduling_url = " ".into();
        let err = create_account(&store, &UserId::from("u1"), &account)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Invalid(DomainError::MissingSchedulingUrl)
        ));
    }

    #[tokio::test]
    async fn partial_profile_update() {
        let (store, _dir) = open_store();
        let id = UserId::from("u1");
        create_account(&store, &id, &mentee("sam")).await.unwrap();

        let updated = update_profile(
            &store,
            &id,
            &ProfileUpdate {
                areas_of_interest: Some("Rust, Go".into()),
                mentor_id: Some(MentorId::from("m1")),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "sam");
        assert_eq!(updated.areas_of_interest, "Rust, Go");
        assert_eq!(updated.mentor_id, Some(MentorId::from("m1")));

        let err = update_profile(
            &store,
            &id,
            &ProfileUpdate {
                name: Some("".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StoreError::Invalid(DomainError::EmptyName)));
    }

    #[tokio::test]
    async fn update_unknown_account_is_not_found() {
        let (store, _dir) = open_store();
        let err = update_profile(
            &store,
            &UserId::from("ghost"),
            &ProfileUpdate {
                photo_url: Some("x".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn mentee_counts() {
        let (store, _dir) = open_store();
        create_account(&store, &UserId::from("a"), &mentee("a")).await.unwrap();
        create_account(&store, &UserId::from("b"), &mentee("b")).await.unwrap();
        create_account(&store, &UserId::from("c"), &mentor("c")).await.unwrap();

        let pick = ProfileUpdate {
            mentor_id: Some(MentorId::from("m1")),
            ..Default::default()
        };
        update_profile(&store, &UserId::from("a"), &pick).await.unwrap();
        update_profile(&store, &UserId::from("c"), &pick).await.unwrap();

        assert_eq!(count_mentees(&store).await.unwrap(), 2);
        assert_eq!(
            count_mentees_for(&store, &MentorId::from("m1")).await.unwrap(),
            1
        );
    }

    #[tokio::test]
    async fn mentor_account_lookup_by_name_and_role() {
        let (store, _dir) = open_store();
        create_account(&store, &UserId::from("a"), &mentee("ada")).await.unwrap();
        assert!(find_mentor_account_by_name(&store, "ada").await.unwrap().is_none());

        create_account(&store, &UserId::from("b"), &mentor("ada")).await.unwrap();
        let found = find_mentor_account_by_name(&store, "ada").await.unwrap().unwrap();
        assert_eq!(found.scheduling_url, "https://calendly.com/ada");
    }
}
