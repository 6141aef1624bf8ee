use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    DatabaseUrl,
    StorageEndpoint,
    StorageRegion,
    StorageAccessKey,
    StorageSecretKey,
    StoragePublicUrl,
    TempVideoBucket,
    TempOverlayBucket,
    StreamPotApiKey,
    StreamPotBaseUrl,
    StreamPotPollIntervalMs,
    TranscodeTimeoutSecs,
    MaxUploadBytes,
    RecentVideosLimit,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::DatabaseUrl => "DATABASE_URL",
            EnvKey::StorageEndpoint => "STORAGE_ENDPOINT",
            EnvKey::StorageRegion => "STORAGE_REGION",
            EnvKey::StorageAccessKey => "STORAGE_ACCESS_KEY",
            EnvKey::StorageSecretKey => "STORAGE_SECRET_KEY",
            EnvKey::StoragePublicUrl => "STORAGE_PUBLIC_URL",
            EnvKey::TempVideoBucket => "STORAGE_BUCKET_TEMP_VIDEOS",
            EnvKey::TempOverlayBucket => "STORAGE_BUCKET_TEMP_OVERLAYS",
            EnvKey::StreamPotApiKey => "STREAMPOT_API_KEY",
            EnvKey::StreamPotBaseUrl => "STREAMPOT_BASE_URL",
            EnvKey::StreamPotPollIntervalMs => "STREAMPOT_POLL_INTERVAL_MS",
            EnvKey::TranscodeTimeoutSecs => "TRANSCODE_TIMEOUT_SECS",
            EnvKey::MaxUploadBytes => "MAX_UPLOAD_BYTES",
            EnvKey::RecentVideosLimit => "RECENT_VIDEOS_LIMIT",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

/// Unset and blank values both count as absent.
pub fn get_opt(key: EnvKey) -> Option<String> {
    env::var(key.as_str()).ok().filter(|v| !v.trim().is_empty())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
