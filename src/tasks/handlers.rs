use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        repo::User,
        session::{MaybeUser, SessionUser},
    },
    error::AppError,
    pages,
    state::AppState,
    tasks::{dto::NewTaskForm, repo::Task},
};

pub fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/add_task", get(add_task_page))
        .route("/tasks", post(create_task))
        .route("/tasks/:task_id/delete", post(delete_task))
}

/// Home shows the caller's tasks when the session resolves; a cookie whose
/// user row is gone renders the anonymous page.
#[instrument(skip(state, user_id))]
pub async fn home(
    State(state): State<AppState>,
    MaybeUser(user_id): MaybeUser,
) -> Result<Html<String>, AppError> {
    let user = match user_id {
        Some(id) => User::find_by_id(&state.db, id).await?,
        None => None,
    };
    let tasks = match &user {
        Some(user) => Task::list_for_owner(&state.db, user.id).await?,
        None => Vec::new(),
    };
    Ok(Html(pages::home(user.as_ref(), &tasks)))
}

#[instrument(skip(state, user_id))]
pub async fn add_task_page(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
) -> Result<Response, AppError> {
    // a session referencing a deleted user goes back through login
    if User::find_by_id(&state.db, user_id).await?.is_none() {
        warn!(user_id, "session user no longer exists");
        return Ok(Redirect::to("/login").into_response());
    }
    Ok(Html(pages::add_task()).into_response())
}

#[instrument(skip(state, user_id, payload))]
pub async fn create_task(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Form(payload): Form<NewTaskForm>,
) -> Result<Redirect, AppError> {
    let description = payload.description.as_deref().filter(|d| !d.is_empty());
    let task = Task::create(&state.db, user_id, &payload.title, description).await?;
    info!(task_id = task.id, owner_id = user_id, "task created");
    Ok(Redirect::to("/"))
}

#[instrument(skip(state, user_id))]
pub async fn delete_task(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Path(task_id): Path<i64>,
) -> Result<Redirect, AppError> {
    if !Task::delete_for_owner(&state.db, task_id, user_id).await? {
        warn!(task_id, owner_id = user_id, "delete of missing or foreign task");
        return Err(AppError::TaskNotFound);
    }
    info!(task_id, owner_id = user_id, "task deleted");
    Ok(Redirect::to("/"))
}
