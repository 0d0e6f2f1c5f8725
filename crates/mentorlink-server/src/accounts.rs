//! Account creation and the signed-in user's own profile.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use mentorlink_shared::badge::Badge;
use mentorlink_shared::models::UserAccount;
use mentorlink_shared::types::Role;
use mentorlink_store::accounts::{self, NewAccount, ProfileUpdate};

use crate::api::AppState;
use crate::error::ServerError;
use crate::identity::CurrentUser;

#[derive(Serialize)]
pub struct AccountResponse {
    #[serde(flatten)]
    account: UserAccount,
    /// Only mentees earn badges.
    #[serde(skip_serializing_if = "Option::is_none")]
    badge: Option<Badge>,
}

impl From<UserAccount> for AccountResponse {
    fn from(account: UserAccount) -> Self {
        let badge = (account.role == Role::Mentee).then(|| Badge::for_sessions(account.sessions_count));
        Self { account, badge }
    }
}

pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<NewAccount>,
) -> Result<(StatusCode, Json<AccountResponse>), ServerError> {
    let account = accounts::create_account(state.store(), &user.0, &req).await?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

pub async fn me(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<AccountResponse>, ServerError> {
    Ok(Json(user.account(state.store()).await?.into()))
}

pub async fn update_me(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(changes): Json<ProfileUpdate>,
) -> Result<Json<AccountResponse>, ServerError> {
    let account = accounts::update_profile(state.store(), &user.0, &changes).await?;
    Ok(Json(account.into()))
}
