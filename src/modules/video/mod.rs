use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};

pub mod composition;
pub mod dto;
pub mod handler;
pub mod model;
pub mod repository;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/process", post(handler::process_video))
        .route("/recent-videos", get(handler::recent_videos))
}
