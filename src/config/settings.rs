use crate::config::env::{self, EnvKey};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_STREAMPOT_URL: &str = "https://api.streampot.io/v1";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 30 * 1024 * 1024;

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    /// Falls back to the in-memory history store when absent.
    pub database_url: Option<String>,
    pub storage_endpoint: String,
    pub storage_region: String,
    pub storage_access_key: String,
    pub storage_secret_key: String,
    pub storage_public_url: String,
    pub temp_video_bucket: String,
    pub temp_overlay_bucket: String,
    pub streampot_api_key: String,
    pub streampot_base_url: String,
    pub streampot_poll_interval_ms: u64,
    pub transcode_timeout_secs: Option<u64>,
    pub max_upload_bytes: usize,
    pub recent_videos_limit: i64,
}

impl AppConfig {
    pub fn new() -> Result<Self, std::env::VarError> {
        Ok(Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 3000),
            database_url: env::get_opt(EnvKey::DatabaseUrl),
            storage_endpoint: env::get(EnvKey::StorageEndpoint)?,
            storage_region: env::get_or(EnvKey::StorageRegion, "us-east-1"),
            storage_access_key: env::get(EnvKey::StorageAccessKey)?,
            storage_secret_key: env::get(EnvKey::StorageSecretKey)?,
            storage_public_url: env::get(EnvKey::StoragePublicUrl)?,
            temp_video_bucket: env::get_or(EnvKey::TempVideoBucket, "temp-videos"),
            temp_overlay_bucket: env::get_or(EnvKey::TempOverlayBucket, "temp-overlays"),
            streampot_api_key: env::get(EnvKey::StreamPotApiKey)?,
            streampot_base_url: env::get_or(EnvKey::StreamPotBaseUrl, DEFAULT_STREAMPOT_URL),
            streampot_poll_interval_ms: env::get_parsed(EnvKey::StreamPotPollIntervalMs, 1000),
            transcode_timeout_secs: env::get_opt(EnvKey::TranscodeTimeoutSecs)
                .and_then(|v| v.parse().ok()),
            max_upload_bytes: env::get_parsed(EnvKey::MaxUploadBytes, DEFAULT_MAX_UPLOAD_BYTES),
            recent_videos_limit: env::get_parsed(EnvKey::RecentVideosLimit, 3),
        })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.streampot_poll_interval_ms)
    }

    pub fn transcode_timeout(&self) -> Option<Duration> {
        self.transcode_timeout_secs.map(Duration::from_secs)
    }
}
