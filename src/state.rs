use crate::config::settings::AppConfig;
use crate::infrastructure::storage::s3::ObjectStore;
use crate::infrastructure::transcoder::streampot::Transcoder;
use crate::modules::video::repository::HistoryStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub storage: Arc<dyn ObjectStore>,
    pub transcoder: Arc<dyn Transcoder>,
    pub history: Arc<dyn HistoryStore>,
    /// Shared client for outbound fetches (proxy relay).
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        storage: Arc<dyn ObjectStore>,
        transcoder: Arc<dyn Transcoder>,
        history: Arc<dyn HistoryStore>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            config,
            storage,
            transcoder,
            history,
            http,
        }
    }
}
