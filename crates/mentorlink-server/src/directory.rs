//! Mentor directory: listing, profiles, connect, booking and reviews.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use mentorlink_shared::constants::BOOKING_UNAVAILABLE_MESSAGE;
use mentorlink_shared::directory::rank;
use mentorlink_shared::models::{Mentor, Review, UserAccount};
use mentorlink_shared::rating::ReviewDraft;
use mentorlink_shared::tags::InterestProfile;
use mentorlink_shared::types::{MentorId, Role};
use mentorlink_store::mentors::{self, MentorProfile};
use mentorlink_store::{accounts, reviews};

use crate::api::AppState;
use crate::error::ServerError;
use crate::identity::CurrentUser;

#[derive(Debug, Default, Deserialize)]
pub struct DirectoryQuery {
    #[serde(default)]
    q: String,
}

#[derive(Serialize)]
pub struct DirectoryResponse {
    recommended: Vec<Mentor>,
    all: Vec<Mentor>,
}

/// Interests of the caller when they are a signed-in mentee; empty otherwise.
async fn caller_interests(
    state: &AppState,
    user: Option<&CurrentUser>,
) -> Result<InterestProfile, ServerError> {
    let Some(user) = user else {
        return Ok(InterestProfile::default());
    };
    match accounts::get_account(state.store(), &user.0).await {
        Ok(account) if account.role == Role::Mentee => {
            Ok(InterestProfile::parse(&account.areas_of_interest))
        }
        Ok(_) => Ok(InterestProfile::default()),
        Err(mentorlink_store::StoreError::NotFound { .. }) => Ok(InterestProfile::default()),
        Err(e) => Err(e.into()),
    }
}

pub async fn list(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Query(query): Query<DirectoryQuery>,
) -> Result<Json<DirectoryResponse>, ServerError> {
    let mentors = mentors::list_mentors(state.store()).await?;
    let interests = caller_interests(&state, user.as_ref()).await?;

    let view = rank(&mentors, &interests, &query.q);
    Ok(Json(DirectoryResponse {
        recommended: view.recommended.into_iter().cloned().collect(),
        all: view.all.into_iter().cloned().collect(),
    }))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<MentorId>,
) -> Result<Json<Mentor>, ServerError> {
    Ok(Json(mentors::get_mentor(state.store(), &id).await?))
}

/// Entries are tied to accounts by name, so the two must agree.
fn ensure_account_name(profile: &MentorProfile, account: &UserAccount) -> Result<(), ServerError> {
    if profile.name.trim() != account.name {
        return Err(ServerError::BadRequest(format!(
            "Profile name must match the account name '{}'",
            account.name
        )));
    }
    Ok(())
}

pub async fn register(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(profile): Json<MentorProfile>,
) -> Result<(StatusCode, Json<Mentor>), ServerError> {
    let account = user.mentor_account(state.store()).await?;
    ensure_account_name(&profile, &account)?;
    let mentor = mentors::register_mentor(state.store(), &profile).await?;
    Ok((StatusCode::CREATED, Json(mentor)))
}

/// Mentors may only edit the directory entry carrying their own name.
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<MentorId>,
    Json(profile): Json<MentorProfile>,
) -> Result<Json<Mentor>, ServerError> {
    let account = user.mentor_account(state.store()).await?;
    let current = mentors::get_mentor(state.store(), &id).await?;
    if current.name != account.name {
        return Err(ServerError::Forbidden("Not your mentor profile".into()));
    }
    ensure_account_name(&profile, &account)?;
    Ok(Json(
        mentors::update_mentor_profile(state.store(), &id, &profile).await?,
    ))
}

#[derive(Serialize)]
pub struct ConnectResponse {
    views: u64,
}

pub async fn connect(
    State(state): State<AppState>,
    Path(id): Path<MentorId>,
) -> Result<Json<ConnectResponse>, ServerError> {
    let snapshot = mentors::get_mentor(state.store(), &id).await?;
    let views = mentors::record_view(state.store(), &snapshot).await?;
    debug!(mentor = %id, views, "Mentor connect");
    Ok(Json(ConnectResponse { views }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    scheduling_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

/// Scheduling link from the mentor's own account, matched by name.
pub async fn booking(
    State(state): State<AppState>,
    Path(id): Path<MentorId>,
) -> Result<Json<BookingResponse>, ServerError> {
    let mentor = mentors::get_mentor(state.store(), &id).await?;
    let url = accounts::find_mentor_account_by_name(state.store(), &mentor.name)
        .await?
        .map(|account| account.scheduling_url)
        .filter(|url| !url.trim().is_empty());

    Ok(Json(match url {
        Some(url) => BookingResponse {
            available: true,
            scheduling_url: Some(url),
            message: None,
        },
        None => BookingResponse {
            available: false,
            scheduling_url: None,
            message: Some(BOOKING_UNAVAILABLE_MESSAGE),
        },
    }))
}

#[derive(Deserialize)]
pub struct ReviewRequest {
    text: String,
    stars: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    review: Review,
    rating: f64,
    review_count: usize,
}

pub async fn submit_review(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<MentorId>,
    Json(req): Json<ReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>), ServerError> {
    let reviewer = user.account(state.store()).await?;
    let draft = ReviewDraft {
        reviewer_name: reviewer.name,
        text: req.text,
        stars: req.stars,
    };

    let commit =
        reviews::submit_review(state.store(), &id, draft, state.rating_write_mode).await?;
    Ok((
        StatusCode::CREATED,
        Json(ReviewResponse {
            review: commit.review,
            rating: commit.new_rating,
            review_count: commit.based_on_review_count + 1,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use mentorlink_store::RatingWriteMode;
    use serde_json::json;

    use super::*;
    use crate::api::tests::test_app;

    fn names(list: &serde_json::Value) -> Vec<&str> {
        list.as_array()
            .unwrap()
            .iter()
            .map(|m| m["name"].as_str().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn directory_recommends_by_interest() {
        let app = test_app(RatingWriteMode::default()).await;
        app.seed_mentor("m1", "Ada", "Rust, Systems").await;
        app.seed_mentor("m2", "Grace", "COBOL").await;
        app.seed_mentee("u1", "Mia", "rust").await;

        let (status, body) = app.call(Method::GET, "/mentors", Some("u1"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body["recommended"]), vec!["Ada"]);
        assert_eq!(names(&body["all"]), vec!["Ada", "Grace"]);

        let (_, body) = app.call(Method::GET, "/mentors?q=grace", Some("u1"), None).await;
        assert!(names(&body["recommended"]).is_empty());
        assert_eq!(names(&body["all"]), vec!["Grace"]);

        // The query is matched as typed, surrounding spaces included.
        let (_, body) = app.call(Method::GET, "/mentors?q=%20grace", Some("u1"), None).await;
        assert!(names(&body["all"]).is_empty());

        // Anonymous callers get no recommendations.
        let (_, body) = app.call(Method::GET, "/mentors", None, None).await;
        assert!(names(&body["recommended"]).is_empty());
        assert_eq!(names(&body["all"]).len(), 2);
    }

    #[tokio::test]
    async fn only_mentors_register_profiles() {
        let app = test_app(RatingWriteMode::default()).await;
        app.seed_mentee("u1", "Mia", "").await;
        let (status, _) = app
            .call(Method::POST, "/mentors", Some("u1"), Some(json!({ "name": "Mia" })))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn profile_edit_is_owner_only() {
        let app = test_app(RatingWriteMode::default()).await;
        let ada = app.seed_mentor("m1", "Ada", "Rust").await;
        app.seed_mentor("m2", "Grace", "COBOL").await;

        let uri = format!("/mentors/{ada}");
        let (status, _) = app
            .call(Method::PUT, &uri, Some("m2"), Some(json!({ "name": "Ada" })))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = app
            .call(
                Method::PUT,
                &uri,
                Some("m1"),
                Some(json!({ "name": "Ada", "skills": "Rust, Embedded", "bio": "hi" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["skills"], "Rust, Embedded");
        assert_eq!(body["bio"], "hi");
    }

    #[tokio::test]
    async fn profile_name_stays_tied_to_account() {
        let app = test_app(RatingWriteMode::default()).await;
        let ada = app.seed_mentor("m1", "Ada", "Rust").await;
        app.seed_mentor("m2", "Grace", "COBOL").await;
        let uri = format!("/mentors/{ada}");

        let (status, _) = app
            .call(Method::PUT, &uri, Some("m1"), Some(json!({ "name": "Ada Lovelace" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // The owner still has full access afterwards.
        let (status, _) = app
            .call(Method::PUT, &uri, Some("m1"), Some(json!({ "name": "Ada", "bio": "x" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = app.call(Method::GET, "/dashboard", Some("m1"), None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, booking) = app
            .call(Method::GET, &format!("{uri}/booking"), None, None)
            .await;
        assert_eq!(booking["available"], true);

        // Nobody can list an entry under another mentor's name.
        let (status, _) = app
            .call(Method::POST, "/mentors", Some("m2"), Some(json!({ "name": "Ada" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn connect_counts_views() {
        let app = test_app(RatingWriteMode::default()).await;
        let id = app.seed_mentor("m1", "Ada", "Rust").await;
        let uri = format!("/mentors/{id}/connect");

        let (_, body) = app.call(Method::POST, &uri, None, None).await;
        assert_eq!(body["views"], 1);
        let (_, body) = app.call(Method::POST, &uri, None, None).await;
        assert_eq!(body["views"], 2);

        let (status, _) = app.call(Method::POST, "/mentors/ghost/connect", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn booking_uses_mentor_account_link() {
        let app = test_app(RatingWriteMode::default()).await;
        let id = app.seed_mentor("m1", "Ada", "Rust").await;

        let (status, body) = app
            .call(Method::GET, &format!("/mentors/{id}/booking"), None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["available"], true);
        assert_eq!(body["schedulingUrl"], "https://calendly.com/m1");

        // Rename the account so the lookup by name no longer matches.
        app.call(Method::PUT, "/accounts/me", Some("m1"), Some(json!({ "name": "Ada L" })))
            .await;
        let (_, body) = app
            .call(Method::GET, &format!("/mentors/{id}/booking"), None, None)
            .await;
        assert_eq!(body["available"], false);
        assert_eq!(body["message"], BOOKING_UNAVAILABLE_MESSAGE);
    }

    #[tokio::test]
    async fn reviews_update_rating() {
        let app = test_app(RatingWriteMode::default()).await;
        let id = app.seed_mentor("m1", "Ada", "Rust").await;
        app.seed_mentee("u1", "Mia", "").await;
        let uri = format!("/mentors/{id}/reviews");

        let (status, body) = app
            .call(Method::POST, &uri, Some("u1"), Some(json!({ "text": "Great", "stars": 5 })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["rating"], 5.0);
        assert_eq!(body["reviewCount"], 1);
        assert_eq!(body["review"]["reviewerName"], "Mia");

        let (_, body) = app
            .call(Method::POST, &uri, Some("u1"), Some(json!({ "text": "Ok", "stars": 2 })))
            .await;
        assert_eq!(body["rating"], 3.5);

        let (_, mentor) = app.call(Method::GET, &format!("/mentors/{id}"), None, None).await;
        assert_eq!(mentor["rating"], 3.5);
        assert_eq!(mentor["reviews"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn review_errors() {
        let app = test_app(RatingWriteMode::Conditional).await;
        let id = app.seed_mentor("m1", "Ada", "Rust").await;
        app.seed_mentee("u1", "Mia", "").await;
        let uri = format!("/mentors/{id}/reviews");

        let (status, _) = app
            .call(Method::POST, &uri, Some("u1"), Some(json!({ "text": " ", "stars": 4 })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .call(Method::POST, &uri, Some("u1"), Some(json!({ "text": "Hi", "stars": 0 })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .call(
                Method::POST,
                "/mentors/ghost/reviews",
                Some("u1"),
                Some(json!({ "text": "Hi", "stars": 4 })),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = app
            .call(Method::POST, &uri, None, Some(json!({ "text": "Hi", "stars": 4 })))
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
