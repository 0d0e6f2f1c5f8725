//! Caller identity as asserted by the upstream identity provider.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use mentorlink_shared::models::UserAccount;
use mentorlink_shared::types::{Role, UserId};
use mentorlink_store::{accounts, DocumentStore};

use crate::error::ServerError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The signed-in user. Rejects the request when the header is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(pub UserId);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| CurrentUser(UserId::from(v)))
            .ok_or(ServerError::Unauthenticated)
    }
}

impl CurrentUser {
    pub async fn account(&self, store: &dyn DocumentStore) -> Result<UserAccount, ServerError> {
        Ok(accounts::get_account(store, &self.0).await?)
    }

    pub async fn mentor_account(&self, store: &dyn DocumentStore) -> Result<UserAccount, ServerError> {
        let account = self.account(store).await?;
        if account.role != Role::Mentor {
            return Err(ServerError::Forbidden("Mentor account required".into()));
        }
        Ok(account)
    }
}
