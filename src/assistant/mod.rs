use crate::state::AppState;
use axum::Router;

mod dto;
pub mod engine;
pub mod handlers;
pub mod model;
pub mod threads;

pub fn router() -> Router<AppState> {
    handlers::chat_routes()
}
