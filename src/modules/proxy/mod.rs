use crate::state::AppState;
use axum::Router;
use axum::routing::get;

pub mod handler;
pub mod service;

pub fn router() -> Router<AppState> {
    Router::new().route("/proxy-video", get(handler::proxy_video))
}
