use super::model::{OverlayAsset, ProcessedVideoRecord, VideoSource};
use crate::common::upload::{UploadedFile, read_file, read_text};
use crate::infrastructure::transcoder::streampot::TranscodeResult;
use anyhow::{Result, anyhow};
use axum::extract::Multipart;
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

pub const VIDEO_FIELD: &str = "video";
pub const VIDEO_URL_FIELD: &str = "videoUrl";
pub const OVERLAY_FIELD: &str = "overlayImage";

#[derive(Debug, Serialize, ToSchema)]
pub struct ProcessVideoResponse {
    /// The completed transcoding job; the composite is under `outputs["output.mp4"]`.
    pub url: TranscodeResult,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecentVideosResponse {
    pub videos: Vec<ProcessedVideoRecord>,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecentVideosQuery {
    #[validate(range(min = 1, max = 20, message = "limit must be between 1 and 20"))]
    pub limit: Option<i64>,
}

/// The multipart body of `POST /process`.
#[derive(Debug, Default)]
pub struct ProcessVideoForm {
    pub video: Option<UploadedFile>,
    pub video_url: Option<String>,
    pub overlay: Option<UploadedFile>,
}

impl ProcessVideoForm {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| anyhow!("Malformed multipart body: {}", e))?
        {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                VIDEO_FIELD => {
                    let file = read_file(field, "video/", "video/mp4").await?;
                    form.video = Some(file).filter(|f| !f.bytes.is_empty());
                }
                VIDEO_URL_FIELD => {
                    let url = read_text(field).await?;
                    form.video_url = Some(url.trim().to_string()).filter(|u| !u.is_empty());
                }
                OVERLAY_FIELD => {
                    let file = read_file(field, "image/", mime::IMAGE_PNG.essence_str()).await?;
                    form.overlay = Some(file).filter(|f| !f.bytes.is_empty());
                }
                other => debug!("Ignoring multipart field {:?}", other),
            }
        }

        Ok(form)
    }

    /// An uploaded file takes precedence over a URL.
    pub fn into_inputs(self) -> (Option<VideoSource>, Option<OverlayAsset>) {
        let source = match (self.video, self.video_url) {
            (Some(file), _) => Some(VideoSource::Uploaded {
                bytes: file.bytes,
                content_type: file.content_type,
            }),
            (None, Some(url)) => Some(VideoSource::Referenced { url }),
            (None, None) => None,
        };

        let overlay = self.overlay.map(|file| OverlayAsset {
            bytes: file.bytes,
            content_type: file.content_type,
        });

        (source, overlay)
    }
}
