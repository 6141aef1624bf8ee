use super::dto::{ProcessVideoForm, ProcessVideoResponse, RecentVideosQuery, RecentVideosResponse};
use super::service::{PipelineError, StagedAsset, VideoService};
use crate::common::response::{ApiError, ApiSuccess, ErrorResponse};
use crate::state::AppState;
use axum::{
    extract::{
        Multipart, Query, State,
        multipart::MultipartRejection,
        rejection::QueryRejection,
    },
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{error, info};
use validator::Validate;

/// Composite an overlay image onto a video
///
/// Multipart fields: `video` (file) or `videoUrl` (text), plus `overlayImage` (file).
#[utoipa::path(
    post,
    path = "/process",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video processed", body = ProcessVideoResponse),
        (status = 400, description = "Missing or invalid input", body = ErrorResponse),
        (status = 500, description = "Staging or transcoding failed", body = ErrorResponse)
    ),
    tag = "Video"
)]
pub async fn process_video(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> impl IntoResponse {
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            return ApiError(rejection.body_text(), StatusCode::BAD_REQUEST).into_response();
        }
    };

    let form = match ProcessVideoForm::from_multipart(multipart).await {
        Ok(form) => form,
        Err(e) => return ApiError(e.to_string(), StatusCode::BAD_REQUEST).into_response(),
    };

    let (source, overlay) = form.into_inputs();
    info!("Processing video request");

    // Detached so staged objects are still released if the client goes away.
    let pipeline = tokio::spawn(async move { VideoService::process(&state, source, overlay).await });
    let outcome = match pipeline.await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("Video pipeline task aborted: {}", e);
            return ApiError(
                "Failed to process video.".to_string(),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .into_response();
        }
    };

    match outcome {
        Ok(processed) => {
            info!(
                "Video {} ready (recorded: {})",
                processed.record.id, processed.persisted
            );
            ApiSuccess(
                ProcessVideoResponse { url: processed.job },
                StatusCode::OK,
            )
            .into_response()
        }
        Err(PipelineError::Validation(message)) => {
            ApiError(message, StatusCode::BAD_REQUEST).into_response()
        }
        Err(e) => {
            error!("Error processing video: {}", e);
            let message = match e {
                PipelineError::Staging {
                    asset: StagedAsset::Video,
                    ..
                } => "Failed to upload video file.",
                PipelineError::Staging {
                    asset: StagedAsset::Overlay,
                    ..
                } => "Failed to upload overlay image.",
                _ => "Failed to process video.",
            };
            ApiError(message.to_string(), StatusCode::INTERNAL_SERVER_ERROR).into_response()
        }
    }
}

/// List the most recently processed videos, newest first
#[utoipa::path(
    get,
    path = "/recent-videos",
    params(RecentVideosQuery),
    responses(
        (status = 200, description = "Recent videos", body = RecentVideosResponse),
        (status = 400, description = "Invalid limit", body = ErrorResponse),
        (status = 500, description = "Internal Server Error", body = ErrorResponse)
    ),
    tag = "Video"
)]
pub async fn recent_videos(
    State(state): State<AppState>,
    query: Result<Query<RecentVideosQuery>, QueryRejection>,
) -> impl IntoResponse {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            return ApiError(rejection.body_text(), StatusCode::BAD_REQUEST).into_response();
        }
    };

    if let Err(e) = query.validate() {
        return ApiError(e.to_string(), StatusCode::BAD_REQUEST).into_response();
    }

    let limit = query.limit.unwrap_or(state.config.recent_videos_limit);

    match VideoService::recent(&state, limit).await {
        Ok(videos) => ApiSuccess(RecentVideosResponse { videos }, StatusCode::OK).into_response(),
        Err(e) => {
            error!("Error fetching recent videos: {}", e);
            ApiError(
                "Failed to fetch recent videos.".to_string(),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .into_response()
        }
    }
}
