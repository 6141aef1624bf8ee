use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::settings::AppConfig;
use crate::infrastructure::db::pool;
use crate::infrastructure::storage::s3::StorageService;
use crate::infrastructure::transcoder::streampot::StreamPotClient;
use crate::modules::video::repository::{
    HistoryStore, MemoryHistoryRepository, PgHistoryRepository,
};
use crate::state::AppState;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod modules;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    info!("Starting server...");

    let config = AppConfig::new().context("Missing required environment variable")?;

    let history: Arc<dyn HistoryStore> = match &config.database_url {
        Some(url) => {
            let db = pool::connect_to_db(url).await?;
            pool::migrate(&db).await?;
            Arc::new(PgHistoryRepository::new(db))
        }
        None => {
            warn!("DATABASE_URL not set, recent videos are kept in memory");
            Arc::new(MemoryHistoryRepository::new())
        }
    };

    let storage = StorageService::new(
        &config.storage_endpoint,
        &config.storage_region,
        &config.storage_access_key,
        &config.storage_secret_key,
        &config.storage_public_url,
    );

    let http = reqwest::Client::new();
    let transcoder = StreamPotClient::new(
        http.clone(),
        &config.streampot_base_url,
        &config.streampot_api_key,
        config.poll_interval(),
        config.transcode_timeout(),
    );

    let port = config.server_port;
    let state = AppState::new(
        config,
        Arc::new(storage),
        Arc::new(transcoder),
        history,
        http,
    );
    let app = app::create_app(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    info!("Server running on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}
