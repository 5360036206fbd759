use axum::{extract::State, routing::post, Json, Router};
use serde_json::json;
use tracing::{info, instrument};

use crate::{
    assistant::{
        dto::{ChatReply, ChatRequest},
        engine::{user_thread_key, UserContext, DEMO_THREAD_KEY},
    },
    auth::{repo::User, session::MaybeUser},
    error::AppError,
    state::AppState,
    tasks::repo::Task,
};

pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", post(chat))
        .route("/chat_with_user", post(chat_with_user))
        .route("/reload_event", post(reload_event))
}

/// Anonymous demo conversation on a single shared thread.
#[instrument(skip(state, payload))]
pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let reply = state
        .assistant()
        .chat(DEMO_THREAD_KEY, None, &payload.message)
        .await?;
    Ok(Json(ChatReply { reply }))
}

/// Authenticated conversation over the caller's own task list.
#[instrument(skip(state, user_id, payload))]
pub async fn chat_with_user(
    State(state): State<AppState>,
    MaybeUser(user_id): MaybeUser,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let user_id = user_id.ok_or(AppError::Unauthenticated)?;
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(AppError::Unauthenticated)?;
    let tasks = Task::list_for_owner(&state.db, user.id).await?;

    let context = UserContext {
        display_name: user.name.clone(),
        tasks,
    };
    let reply = state
        .assistant()
        .chat(&user_thread_key(user.id), Some(&context), &payload.message)
        .await?;
    Ok(Json(ChatReply { reply }))
}

/// Clears the shared demo thread.
#[instrument(skip(state))]
pub async fn reload_event(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.assistant().reset(DEMO_THREAD_KEY);
    info!("demo thread reset");
    Json(json!({ "status": "ok" }))
}
