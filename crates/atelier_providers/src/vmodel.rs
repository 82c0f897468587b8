//! VModel template video-swap driver (submit-and-poll).

use crate::poller::{JobPoller, PollStatus};
use crate::render;
use async_trait::async_trait;
use atelier_core::{
    AsyncJob, JobStatus, MediaReference, ProviderOutcome, ProviderSuccess, TransformKind,
    TransformRequest,
};
use atelier_error::{AtelierResult, ProviderError, ProviderErrorKind};
use atelier_interface::{InvocationMode, TransformDriver};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, instrument};

const API_BASE: &str = "https://api.vmodel.ai/api/tasks/v1";
const MODEL_VERSION: &str = "85e248d268bcc04f5302cf9645663c2c12acd03c953ec1a4bbfdc252a65bddc0";
const TIMEOUT: Duration = Duration::from_secs(180);
const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// VModel driver for swapping a face into a template video.
///
/// The primary reference is the template video URL and the secondary the
/// user's face image; video renders are slow, so this driver carries the
/// longest deadline in the registry.
#[derive(Debug, Clone)]
pub struct VModelProvider {
    client: Client,
    api_token: String,
}

fn build_create_payload(source: &str, target: &str) -> Value {
    json!({
        "version": MODEL_VERSION,
        "input": {
            "source": source,
            "target": target,
            "keep_fps": false,
            "disable_safety_checker": false,
        },
    })
}

#[derive(Debug, Deserialize)]
struct CreateResponse {
    result: Option<CreatedTask>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedTask {
    task_id: String,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    result: Option<TaskState>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TaskState {
    #[serde(default)]
    status: String,
    #[serde(default)]
    output: Vec<String>,
    #[serde(default)]
    error: Option<String>,
}

fn poll_status(state: TaskState) -> AtelierResult<PollStatus<String>> {
    match state.status.as_str() {
        "succeeded" => match state.output.into_iter().next() {
            Some(url) => Ok(PollStatus::Completed(url)),
            None => Err(ProviderError::new(ProviderErrorKind::EmptyOutput))?,
        },
        "failed" | "canceled" => Ok(PollStatus::Failed(
            state
                .error
                .unwrap_or_else(|| "VModel task failed".to_string()),
        )),
        "starting" | "queued" => Ok(PollStatus::Pending(JobStatus::Pending)),
        _ => Ok(PollStatus::Pending(JobStatus::Processing)),
    }
}

impl VModelProvider {
    /// Create a driver bound to an API token.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_token: api_token.into(),
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> AtelierResult<reqwest::Response> {
        let response = request
            .header("Authorization", format!("Bearer {}", self.api_token))
            .send()
            .await
            .map_err(|e| {
                ProviderError::new(ProviderErrorKind::Transport(format!("Request failed: {e}")))
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::new(ProviderErrorKind::Remote {
                status: Some(status),
                message,
            }))?;
        }
        Ok(response)
    }

    async fn create_task(&self, payload: &Value) -> AtelierResult<String> {
        debug!("Creating VModel task");
        let response = self
            .send(self.client.post(format!("{API_BASE}/create")).json(payload))
            .await?;
        let created: CreateResponse = response.json().await.map_err(|e| {
            ProviderError::new(ProviderErrorKind::Parse(format!(
                "Failed to parse VModel response: {e}"
            )))
        })?;
        match created.result {
            Some(task) => Ok(task.task_id),
            None => Err(ProviderError::new(ProviderErrorKind::Remote {
                status: None,
                message: created
                    .message
                    .unwrap_or_else(|| "VModel returned no task id".to_string()),
            }))?,
        }
    }

    async fn poll_once(&self, task_id: &str) -> AtelierResult<PollStatus<String>> {
        let response = self
            .send(self.client.get(format!("{API_BASE}/status/{task_id}")))
            .await?;
        let status: StatusResponse = response.json().await.map_err(|e| {
            ProviderError::new(ProviderErrorKind::Parse(format!(
                "Failed to parse VModel status: {e}"
            )))
        })?;
        match status.result {
            Some(state) => poll_status(state),
            None => Err(ProviderError::new(ProviderErrorKind::Parse(
                status
                    .message
                    .unwrap_or_else(|| "VModel status carried no result".to_string()),
            )))?,
        }
    }
}

#[async_trait]
impl TransformDriver for VModelProvider {
    #[instrument(skip(self, request))]
    async fn invoke(&self, request: &TransformRequest) -> AtelierResult<ProviderOutcome> {
        if request.kind != TransformKind::VideoSwap {
            return Err(ProviderError::new(ProviderErrorKind::Unsupported(format!(
                "VModel serves template video swap only, not {}",
                request.kind
            ))))?;
        }
        let face = request.secondary.as_ref().ok_or_else(|| {
            ProviderError::new(ProviderErrorKind::Unsupported(
                "video swap requires a secondary face image".to_string(),
            ))
        })?;

        let payload = build_create_payload(&render(face), &render(&request.primary));
        let task_id = self.create_task(&payload).await?;
        debug!(task_id = %task_id, "VModel task created");

        let mut job = AsyncJob::new(task_id.clone(), TIMEOUT);
        let poller = JobPoller::new(POLL_INTERVAL);
        let url = poller.run(&mut job, || self.poll_once(&task_id)).await?;

        Ok(ProviderOutcome::Resolved(ProviderSuccess {
            media: MediaReference::Url(url),
            provider: self.name().to_string(),
            attribution: Some("vmodel video-swap".to_string()),
        }))
    }

    fn name(&self) -> &str {
        "VModel"
    }

    fn timeout(&self) -> Duration {
        TIMEOUT
    }

    fn mode(&self) -> InvocationMode {
        InvocationMode::SubmitAndPoll
    }

    fn supports(&self, kind: TransformKind) -> bool {
        kind == TransformKind::VideoSwap
    }
}
