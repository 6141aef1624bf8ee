//! Recording fakes for the pipeline's collaborators.

use crate::config::settings::{AppConfig, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_STREAMPOT_URL};
use crate::infrastructure::storage::s3::{ObjectStore, StorageError};
use crate::infrastructure::transcoder::filter::FilterGraphSpec;
use crate::infrastructure::transcoder::streampot::{
    JobId, JobStatus, TranscodeError, TranscodeResult, Transcoder,
};
use crate::modules::video::model::{OverlayAsset, ProcessedVideoRecord};
use crate::modules::video::repository::HistoryStore;
use crate::state::AppState;
use anyhow::anyhow;
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use bytes::Bytes;
use http_body_util::BodyExt;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub fn test_config() -> AppConfig {
    AppConfig {
        server_port: 0,
        database_url: None,
        storage_endpoint: "http://localhost:9000".to_string(),
        storage_region: "us-east-1".to_string(),
        storage_access_key: "access".to_string(),
        storage_secret_key: "secret".to_string(),
        storage_public_url: "https://storage.test".to_string(),
        temp_video_bucket: "temp-videos".to_string(),
        temp_overlay_bucket: "temp-overlays".to_string(),
        streampot_api_key: "secret".to_string(),
        streampot_base_url: DEFAULT_STREAMPOT_URL.to_string(),
        streampot_poll_interval_ms: 1,
        transcode_timeout_secs: None,
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        recent_videos_limit: 3,
    }
}

pub fn test_state(
    storage: Arc<dyn ObjectStore>,
    transcoder: Arc<dyn Transcoder>,
    history: Arc<dyn HistoryStore>,
) -> AppState {
    AppState::new(test_config(), storage, transcoder, history, reqwest::Client::new())
}

pub fn overlay_png(bytes: Bytes) -> OverlayAsset {
    OverlayAsset {
        bytes,
        content_type: mime::IMAGE_PNG.to_string(),
    }
}

/// (bucket, key)
type ObjectRef = (String, String);

#[derive(Default)]
pub struct RecordingStore {
    uploads: Mutex<Vec<ObjectRef>>,
    deletes: Mutex<Vec<ObjectRef>>,
    urls: HashMap<String, String>,
    failing_bucket: Option<String>,
    failing_deletes: bool,
}

impl RecordingStore {
    pub fn with_url(mut self, bucket: &str, url: &str) -> Self {
        self.urls.insert(bucket.to_string(), url.to_string());
        self
    }

    pub fn failing_uploads_to(mut self, bucket: &str) -> Self {
        self.failing_bucket = Some(bucket.to_string());
        self
    }

    pub fn failing_deletes(mut self) -> Self {
        self.failing_deletes = true;
        self
    }

    pub fn uploads(&self) -> Vec<ObjectRef> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<ObjectRef> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for RecordingStore {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        _body: Bytes,
        _content_type: &str,
    ) -> Result<String, StorageError> {
        self.uploads
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string()));

        if self.failing_bucket.as_deref() == Some(bucket) {
            return Err(StorageError::Upload {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: "bucket unavailable".to_string(),
            });
        }

        Ok(self
            .urls
            .get(bucket)
            .cloned()
            .unwrap_or_else(|| format!("https://storage.test/{bucket}/{key}")))
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), StorageError> {
        self.deletes
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string()));

        if self.failing_deletes {
            return Err(StorageError::Delete {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: "access denied".to_string(),
            });
        }
        Ok(())
    }
}

enum Outcome {
    Output(String),
    NoOutputs,
    Fail,
}

pub struct StubTranscoder {
    outcome: Outcome,
    gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl StubTranscoder {
    fn with(outcome: Outcome) -> Self {
        Self {
            outcome,
            gate: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn succeeding(output_url: &str) -> Self {
        Self::with(Outcome::Output(output_url.to_string()))
    }

    /// Succeeds, but only once `gate` is notified.
    pub fn gated(output_url: &str, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::succeeding(output_url)
        }
    }

    pub fn without_outputs() -> Self {
        Self::with(Outcome::NoOutputs)
    }

    pub fn failing() -> Self {
        Self::with(Outcome::Fail)
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transcoder for StubTranscoder {
    async fn run(
        &self,
        inputs: &[String],
        filters: &FilterGraphSpec,
        outputs: &[&str],
    ) -> Result<TranscodeResult, TranscodeError> {
        self.calls.lock().unwrap().push(inputs.to_vec());
        assert_eq!(outputs, [filters.output]);

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let outputs = match &self.outcome {
            Outcome::Fail => {
                return Err(TranscodeError::JobFailed {
                    id: "1".to_string(),
                    message: "ffmpeg exited with code 1".to_string(),
                });
            }
            Outcome::NoOutputs => BTreeMap::new(),
            Outcome::Output(url) => BTreeMap::from([(filters.output.to_string(), url.clone())]),
        };

        Ok(TranscodeResult {
            id: JobId::Number(1),
            status: JobStatus::Completed,
            outputs,
            created_at: None,
            completed_at: None,
            logs: None,
            message: None,
        })
    }
}

#[derive(Default)]
pub struct RecordingHistory {
    records: Mutex<Vec<ProcessedVideoRecord>>,
    failing: bool,
}

impl RecordingHistory {
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    pub fn records(&self) -> Vec<ProcessedVideoRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoryStore for RecordingHistory {
    async fn insert(&self, record: &ProcessedVideoRecord) -> anyhow::Result<()> {
        if self.failing {
            return Err(anyhow!("connection refused"));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn list_recent(&self, limit: i64) -> anyhow::Result<Vec<ProcessedVideoRecord>> {
        if self.failing {
            return Err(anyhow!("connection refused"));
        }
        let mut records = self.records();
        records.reverse();
        records.truncate(limit as usize);
        Ok(records)
    }
}

const BOUNDARY: &str = "X-OVERLAY-TEST-BOUNDARY";

pub struct Part {
    name: &'static str,
    file: Option<(&'static str, &'static str)>,
    data: &'static [u8],
}

impl Part {
    pub fn file(
        name: &'static str,
        file_name: &'static str,
        content_type: &'static str,
        data: &'static [u8],
    ) -> Self {
        Self {
            name,
            file: Some((file_name, content_type)),
            data,
        }
    }

    pub fn text(name: &'static str, value: &'static str) -> Self {
        Self {
            name,
            file: None,
            data: value.as_bytes(),
        }
    }
}

pub fn multipart_request(uri: &str, parts: &[Part]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part.file {
            Some((file_name, content_type)) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                    part.name, file_name, content_type
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", part.name).as_bytes(),
            ),
        }
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::post(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn json_body(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
