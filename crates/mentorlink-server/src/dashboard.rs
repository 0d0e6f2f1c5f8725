//! Mentor dashboard: statistics and the planning list.

use std::convert::Infallible;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::{self, Stream, StreamExt};
use serde::{Deserialize, Serialize};

use mentorlink_shared::models::{Mentor, Task};
use mentorlink_shared::tags::display_tags;
use mentorlink_shared::types::TaskId;
use mentorlink_store::{accounts, mentors, tasks, ChangeEvent, TaskWatch};

use crate::api::AppState;
use crate::error::ServerError;
use crate::identity::CurrentUser;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    mentor_id: String,
    views: u64,
    mentees_registered: usize,
    total_mentees: usize,
    rating: f64,
    review_count: usize,
    skills: Vec<String>,
}

/// The directory entry belonging to the calling mentor, matched by name.
async fn own_profile(state: &AppState, user: &CurrentUser) -> Result<Mentor, ServerError> {
    let account = user.mentor_account(state.store()).await?;
    mentors::find_mentor_by_name(state.store(), &account.name)
        .await?
        .ok_or_else(|| ServerError::NotFound("No mentor profile for this account".into()))
}

pub async fn overview(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<DashboardResponse>, ServerError> {
    let mentor = own_profile(&state, &user).await?;
    let mentees_registered = accounts::count_mentees_for(state.store(), &mentor.id).await?;
    let total_mentees = accounts::count_mentees(state.store()).await?;

    Ok(Json(DashboardResponse {
        mentor_id: mentor.id.to_string(),
        views: mentor.views,
        mentees_registered,
        total_mentees,
        rating: mentor.rating,
        review_count: mentor.review_count(),
        skills: display_tags(&mentor.skills),
    }))
}

#[derive(Deserialize)]
pub struct TaskRequest {
    text: String,
}

pub async fn list_tasks(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Task>>, ServerError> {
    user.mentor_account(state.store()).await?;
    Ok(Json(tasks::list_tasks(state.store(), &user.0).await?))
}

pub async fn add_task(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<TaskRequest>,
) -> Result<(StatusCode, Json<Task>), ServerError> {
    user.mentor_account(state.store()).await?;
    let task = tasks::add_task(state.store(), &user.0, &req.text).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn edit_task(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<TaskId>,
    Json(req): Json<TaskRequest>,
) -> Result<Json<Task>, ServerError> {
    user.mentor_account(state.store()).await?;
    Ok(Json(
        tasks::edit_task(state.store(), &user.0, &id, &req.text).await?,
    ))
}

pub async fn delete_task(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<TaskId>,
) -> Result<StatusCode, ServerError> {
    user.mentor_account(state.store()).await?;
    tasks::delete_task(state.store(), &user.0, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Changes to the caller's tasks until the store shuts down.
fn task_changes(watch: TaskWatch) -> impl Stream<Item = ChangeEvent> {
    stream::unfold(watch, |mut watch| async move {
        watch.recv().await.map(|event| (event, watch))
    })
}

/// Server-sent events telling the dashboard to refetch its task list.
pub async fn task_events(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ServerError> {
    user.mentor_account(state.store()).await?;
    let watch = tasks::watch_tasks(state.store(), &user.0);

    let events = task_changes(watch).map(|change| {
        let event = Event::default().event("task");
        Ok(event
            .json_data(&change)
            .unwrap_or_else(|_| Event::default().event("task").data(change.id)))
    });
    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}
