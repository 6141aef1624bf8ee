use super::composition::{OUTPUT_NAME, OVERLAY_COMPOSITION};
use super::model::{OverlayAsset, ProcessedVideo, ProcessedVideoRecord, StagedObject, VideoSource};
use crate::infrastructure::storage::s3::{ObjectStore, StorageError, generate_key};
use crate::infrastructure::transcoder::streampot::TranscodeError;
use crate::state::AppState;
use bytes::Bytes;
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

pub const MISSING_INPUT: &str = "Both video (file or URL) and overlay image are required.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StagedAsset {
    Video,
    Overlay,
}

impl fmt::Display for StagedAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StagedAsset::Video => f.write_str("video"),
            StagedAsset::Overlay => f.write_str("overlay"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Validation(String),

    #[error("failed to stage {asset}: {source}")]
    Staging {
        asset: StagedAsset,
        #[source]
        source: StorageError,
    },

    #[error(transparent)]
    Transcode(#[from] TranscodeError),
}

/// Objects uploaded during one pipeline run. Every object recorded here is
/// deleted by `release`, whatever the outcome of the run.
struct StagingScope<'a> {
    storage: &'a dyn ObjectStore,
    staged: Vec<StagedObject>,
}

impl<'a> StagingScope<'a> {
    fn new(storage: &'a dyn ObjectStore) -> Self {
        Self {
            storage,
            staged: Vec::with_capacity(2),
        }
    }

    async fn stage(
        &mut self,
        bucket: &str,
        key: String,
        body: Bytes,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let url = self.storage.upload(bucket, &key, body, content_type).await?;
        self.staged.push(StagedObject {
            bucket: bucket.to_string(),
            key,
            url: url.clone(),
        });
        Ok(url)
    }

    async fn release(self) {
        for object in self.staged.iter().rev() {
            match self.storage.delete(&object.bucket, &object.key).await {
                Ok(()) => info!("🧹 Removed staged object {}", object.url),
                Err(e) => warn!("Failed to remove staged object: {}", e),
            }
        }
    }
}

pub struct VideoService;

impl VideoService {
    /// Composites `overlay` onto `source` and records the result.
    ///
    /// Staging, transcoding and persistence run strictly in that order. Staged
    /// objects are removed before returning on every path, including failures.
    /// A failed history insert is logged and reported through
    /// `ProcessedVideo::persisted`; it never fails the request.
    pub async fn process(
        state: &AppState,
        source: Option<VideoSource>,
        overlay: Option<OverlayAsset>,
    ) -> Result<ProcessedVideo, PipelineError> {
        let (source, overlay) = Self::validate(source, overlay)?;

        let mut scope = StagingScope::new(state.storage.as_ref());
        let outcome = Self::run(state, &mut scope, source, overlay).await;
        scope.release().await;

        outcome
    }

    pub async fn recent(state: &AppState, limit: i64) -> anyhow::Result<Vec<ProcessedVideoRecord>> {
        state.history.list_recent(limit).await
    }

    fn validate(
        source: Option<VideoSource>,
        overlay: Option<OverlayAsset>,
    ) -> Result<(VideoSource, OverlayAsset), PipelineError> {
        let (Some(source), Some(overlay)) = (source, overlay) else {
            return Err(PipelineError::Validation(MISSING_INPUT.to_string()));
        };

        let source = match source {
            VideoSource::Uploaded { bytes, .. } if bytes.is_empty() => {
                return Err(PipelineError::Validation("Uploaded video is empty.".to_string()));
            }
            VideoSource::Referenced { url } => {
                let url = url.trim().to_string();
                let usable = Url::parse(&url)
                    .map(|u| matches!(u.scheme(), "http" | "https"))
                    .unwrap_or(false);
                if !usable {
                    return Err(PipelineError::Validation(
                        "Video URL must be an absolute http(s) URL.".to_string(),
                    ));
                }
                VideoSource::Referenced { url }
            }
            uploaded => uploaded,
        };

        if overlay.bytes.is_empty() {
            return Err(PipelineError::Validation("Overlay image is empty.".to_string()));
        }

        Ok((source, overlay))
    }

    async fn run(
        state: &AppState,
        scope: &mut StagingScope<'_>,
        source: VideoSource,
        overlay: OverlayAsset,
    ) -> Result<ProcessedVideo, PipelineError> {
        let video_url = match source {
            VideoSource::Uploaded {
                bytes,
                content_type,
            } => {
                info!("⬆️ Staging uploaded video ({} bytes)", bytes.len());
                scope
                    .stage(
                        &state.config.temp_video_bucket,
                        generate_key("video", "mp4"),
                        bytes,
                        &content_type,
                    )
                    .await
                    .map_err(|source| PipelineError::Staging {
                        asset: StagedAsset::Video,
                        source,
                    })?
            }
            VideoSource::Referenced { url } => url,
        };

        info!("⬆️ Staging overlay ({} bytes)", overlay.bytes.len());
        let overlay_url = scope
            .stage(
                &state.config.temp_overlay_bucket,
                generate_key("overlay", "png"),
                overlay.bytes,
                &overlay.content_type,
            )
            .await
            .map_err(|source| PipelineError::Staging {
                asset: StagedAsset::Overlay,
                source,
            })?;

        let inputs = [video_url, overlay_url];
        let job = state
            .transcoder
            .run(&inputs, &OVERLAY_COMPOSITION, &[OVERLAY_COMPOSITION.output])
            .await?;

        let output_url = job
            .output_url(OUTPUT_NAME)
            .ok_or_else(|| TranscodeError::MissingOutput {
                id: job.id.to_string(),
                output: OUTPUT_NAME.to_string(),
            })?;

        let record = ProcessedVideoRecord::new(output_url);
        let persisted = match state.history.insert(&record).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Video {} processed but not recorded: {}", record.url, e);
                false
            }
        };

        info!("✅ Processed video available at {}", record.url);
        Ok(ProcessedVideo {
            record,
            job,
            persisted,
        })
    }
}
