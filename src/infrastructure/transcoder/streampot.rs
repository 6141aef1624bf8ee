use super::filter::{FilterGraphSpec, FilterNode};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("transcoding service unreachable: {0}")]
    Request(#[from] reqwest::Error),

    #[error("transcoding service rejected the request ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("transcoding service returned an unreadable job: {0}")]
    Malformed(#[source] reqwest::Error),

    #[error("job {id} failed: {message}")]
    JobFailed { id: String, message: String },

    #[error("job {id} finished without output {output}")]
    MissingOutput { id: String, output: String },

    #[error("job did not finish within {0:?}")]
    TimedOut(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Uploading,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JobId {
    Number(u64),
    Text(String),
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobId::Number(n) => write!(f, "{}", n),
            JobId::Text(s) => f.write_str(s),
        }
    }
}

/// A transcoding job as reported by the service. Once completed, `outputs`
/// maps every requested output name to its public URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TranscodeResult {
    #[schema(value_type = String)]
    pub id: JobId,
    pub status: JobStatus,
    #[serde(default)]
    pub outputs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl TranscodeResult {
    pub fn output_url(&self, name: &str) -> Option<&str> {
        self.outputs.get(name).map(String::as_str)
    }
}

/// Runs a filter graph over remote inputs and resolves once the job is done.
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn run(
        &self,
        inputs: &[String],
        filters: &FilterGraphSpec,
        outputs: &[&str],
    ) -> Result<TranscodeResult, TranscodeError>;
}

#[derive(Serialize)]
#[serde(tag = "name", content = "value", rename_all = "camelCase")]
enum Action<'a> {
    Input([&'a str; 1]),
    /// One argument: the whole node list.
    ComplexFilter([&'a [FilterNode]; 1]),
    Output([&'a str; 1]),
}

fn build_actions<'a>(
    inputs: &'a [String],
    filters: &'a FilterGraphSpec,
    outputs: &'a [&'a str],
) -> Vec<Action<'a>> {
    let mut actions: Vec<Action<'a>> = inputs
        .iter()
        .map(|url| Action::Input([url.as_str()]))
        .collect();
    actions.push(Action::ComplexFilter([filters.nodes]));
    actions.extend(outputs.iter().map(|name| Action::Output([*name])));
    actions
}

/// Client for the StreamPot job API.
#[derive(Clone)]
pub struct StreamPotClient {
    http: reqwest::Client,
    base_url: String,
    secret: String,
    poll_interval: Duration,
    timeout: Option<Duration>,
}

impl StreamPotClient {
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        secret: &str,
        poll_interval: Duration,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            secret: secret.to_string(),
            poll_interval,
            timeout,
        }
    }

    async fn submit(&self, actions: &[Action<'_>]) -> Result<TranscodeResult, TranscodeError> {
        let response = self
            .http
            .post(format!("{}/", self.base_url))
            .bearer_auth(&self.secret)
            .json(actions)
            .send()
            .await?;

        Self::decode(response).await
    }

    pub async fn check_status(&self, id: &JobId) -> Result<TranscodeResult, TranscodeError> {
        let response = self
            .http
            .get(format!("{}/jobs/{}", self.base_url, id))
            .bearer_auth(&self.secret)
            .send()
            .await?;

        Self::decode(response).await
    }

    async fn decode(response: reqwest::Response) -> Result<TranscodeResult, TranscodeError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscodeError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<TranscodeResult>().await.map_err(|e| {
            if e.is_decode() {
                TranscodeError::Malformed(e)
            } else {
                TranscodeError::Request(e)
            }
        })
    }

    async fn run_and_wait(&self, actions: &[Action<'_>]) -> Result<TranscodeResult, TranscodeError> {
        let submitted = self.submit(actions).await?;
        let id = submitted.id;
        info!("🎬 StreamPot job {} submitted", id);

        loop {
            let job = self.check_status(&id).await?;
            match job.status {
                JobStatus::Completed => {
                    info!("✅ StreamPot job {} completed", id);
                    return Ok(job);
                }
                JobStatus::Failed => {
                    return Err(TranscodeError::JobFailed {
                        id: id.to_string(),
                        message: job.message.unwrap_or_else(|| "no message".to_string()),
                    });
                }
                JobStatus::Unknown => {
                    warn!("StreamPot job {} reported an unrecognised status, still polling", id);
                    tokio::time::sleep(self.poll_interval).await;
                }
                status => {
                    debug!("StreamPot job {} is {:?}", id, status);
                    tokio::time::sleep(self.poll_interval).await;
                }
            }
        }
    }
}

#[async_trait]
impl Transcoder for StreamPotClient {
    async fn run(
        &self,
        inputs: &[String],
        filters: &FilterGraphSpec,
        outputs: &[&str],
    ) -> Result<TranscodeResult, TranscodeError> {
        let actions = build_actions(inputs, filters, outputs);

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.run_and_wait(&actions))
                .await
                .map_err(|_| TranscodeError::TimedOut(limit))?,
            None => self.run_and_wait(&actions).await,
        }
    }
}
