use crate::common::response::ErrorResponse;
use crate::infrastructure::transcoder::streampot::{JobStatus, TranscodeResult};
use crate::modules::video::dto::{ProcessVideoResponse, RecentVideosResponse};
use crate::modules::video::model::ProcessedVideoRecord;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::video::handler::process_video,
        crate::modules::video::handler::recent_videos,
        crate::modules::proxy::handler::proxy_video,
    ),
    components(
        schemas(
            ProcessVideoResponse, RecentVideosResponse, ProcessedVideoRecord,
            TranscodeResult, JobStatus, ErrorResponse,
        )
    ),
    tags(
        (name = "Video", description = "Overlay compositing and history"),
        (name = "Proxy", description = "Cross-origin video relay")
    )
)]
pub struct ApiDoc;
