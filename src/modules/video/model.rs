use crate::infrastructure::transcoder::streampot::TranscodeResult;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// A finished composite, as listed under recent videos.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, ToSchema)]
pub struct ProcessedVideoRecord {
    pub id: Uuid,
    pub url: String,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
}

impl ProcessedVideoRecord {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum VideoSource {
    Uploaded { bytes: Bytes, content_type: String },
    Referenced { url: String },
}

#[derive(Debug, Clone)]
pub struct OverlayAsset {
    pub bytes: Bytes,
    pub content_type: String,
}

/// An object uploaded for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedObject {
    pub bucket: String,
    pub key: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct ProcessedVideo {
    pub record: ProcessedVideoRecord,
    pub job: TranscodeResult,
    /// False when the history insert failed; the video itself is still valid.
    pub persisted: bool,
}
