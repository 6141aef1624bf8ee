use super::service::{ProxyService, RelayError};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::error;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProxyQuery {
    /// Remote video to relay.
    pub url: Option<String>,
}

/// Relay a remote video with permissive cross-origin headers
#[utoipa::path(
    get,
    path = "/proxy-video",
    params(ProxyQuery),
    responses(
        (status = 200, description = "Video bytes", content_type = "video/mp4"),
        (status = 400, description = "Missing or invalid URL"),
        (status = 500, description = "Remote fetch failed")
    ),
    tag = "Proxy"
)]
pub async fn proxy_video(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
) -> impl IntoResponse {
    let Some(url) = query.url.filter(|u| !u.trim().is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Video URL is required").into_response();
    };

    match ProxyService::relay(&state.http, url.trim()).await {
        Ok(bytes) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "video/mp4")
            .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
            .body(Body::from(bytes))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()),
        Err(RelayError::InvalidUrl(_)) => {
            (StatusCode::BAD_REQUEST, "Video URL must be an absolute http(s) URL").into_response()
        }
        Err(e) => {
            error!("Error proxying video: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Error fetching video").into_response()
        }
    }
}
