//! PiAPI face-swap driver (submit-and-poll, webhook-capable).

use crate::poller::{JobPoller, PollStatus};
use crate::render;
use async_trait::async_trait;
use atelier_core::{
    AcceptedJob, AsyncJob, JobStatus, MediaKind, MediaReference, ProviderOutcome, ProviderSuccess,
    TransformKind, TransformParams, TransformRequest,
};
use atelier_error::{AtelierResult, ProviderError, ProviderErrorKind};
use atelier_interface::{InvocationMode, TransformDriver};
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, instrument};

const API_BASE: &str = "https://api.piapi.ai/api/v1";
const TIMEOUT: Duration = Duration::from_secs(120);
const POLL_INTERVAL: Duration = Duration::from_secs(3);

/// PiAPI task driver for image and video face swap.
///
/// Creates a task, then either returns immediately with the task id when
/// the request carries a webhook URL, or polls the status endpoint until
/// the task reaches a terminal state.
#[derive(Debug, Clone)]
pub struct PiApiProvider {
    client: Client,
    api_key: String,
}

/// Webhook secret: hash of the API key and a timestamp, truncated. The
/// remote service echoes it back so the webhook receiver can check origin.
fn webhook_secret(api_key: &str, timestamp: u64) -> String {
    let digest = Sha256::digest(format!("{api_key}{timestamp}").as_bytes());
    let mut hex = format!("{digest:x}");
    hex.truncate(32);
    hex
}

/// Task-creation payload. Image and video targets route to different
/// toolkit models with differently named target fields.
fn build_task_payload(
    target_kind: MediaKind,
    target: &str,
    swap: &str,
    webhook: Option<(&str, &str)>,
) -> Value {
    let (model, target_field) = match target_kind {
        MediaKind::Image => ("Qubico/image-toolkit", "target_image"),
        MediaKind::Video => ("Qubico/video-toolkit", "target_video"),
    };
    let mut payload = json!({
        "model": model,
        "task_type": "face-swap",
        "input": {
            target_field: target,
            "swap_image": swap,
        },
    });
    if let Some((endpoint, secret)) = webhook {
        payload["config"] = json!({
            "webhook_config": {
                "endpoint": endpoint,
                "secret": secret,
            },
        });
    }
    payload
}

fn parse_status(raw: &str) -> JobStatus {
    raw.to_ascii_lowercase()
        .parse()
        .unwrap_or(JobStatus::Processing)
}

#[derive(Debug, Deserialize)]
struct TaskEnvelope {
    code: i64,
    #[serde(default)]
    message: String,
    data: Option<TaskData>,
}

#[derive(Debug, Deserialize)]
struct TaskData {
    task_id: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    output: Option<TaskOutput>,
    #[serde(default)]
    error: Option<TaskError>,
}

#[derive(Debug, Deserialize)]
struct TaskOutput {
    image_url: Option<String>,
    video_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TaskError {
    message: Option<String>,
}

impl TaskEnvelope {
    fn into_data(self) -> AtelierResult<TaskData> {
        if self.code != 200 {
            return Err(ProviderError::new(ProviderErrorKind::Remote {
                status: None,
                message: format!("PiAPI code {}: {}", self.code, self.message),
            }))?;
        }
        self.data.ok_or_else(|| {
            ProviderError::new(ProviderErrorKind::Parse(
                "PiAPI envelope carried no data".to_string(),
            ))
            .into()
        })
    }
}

impl PiApiProvider {
    /// Create a driver bound to an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
        }
    }

    async fn fetch(&self, request: reqwest::RequestBuilder) -> AtelierResult<TaskData> {
        let response = request
            .header("x-api-key", &self.api_key)
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

        let envelope: TaskEnvelope = response.json().await.map_err(|e| {
            ProviderError::new(ProviderErrorKind::Parse(format!(
                "Failed to parse PiAPI response: {e}"
            )))
        })?;
        envelope.into_data()
    }

    async fn create_task(&self, payload: &Value) -> AtelierResult<TaskData> {
        debug!("Creating PiAPI task");
        self.fetch(self.client.post(format!("{API_BASE}/task")).json(payload))
            .await
    }

    async fn poll_once(&self, task_id: &str, target_kind: MediaKind) -> AtelierResult<PollStatus<String>> {
        let data = self
            .fetch(self.client.get(format!("{API_BASE}/task/{task_id}")))
            .await?;
        let status = parse_status(&data.status);
        match status {
            JobStatus::Completed => {
                let url = data.output.and_then(|out| match target_kind {
                    MediaKind::Image => out.image_url,
                    MediaKind::Video => out.video_url,
                });
                match url {
                    Some(url) => Ok(PollStatus::Completed(url)),
                    None => Err(ProviderError::new(ProviderErrorKind::EmptyOutput))?,
                }
            }
            JobStatus::Failed => {
                let message = data
                    .error
                    .and_then(|e| e.message)
                    .unwrap_or_else(|| "PiAPI task failed".to_string());
                Ok(PollStatus::Failed(message))
            }
            other => Ok(PollStatus::Pending(other)),
        }
    }
}

#[async_trait]
impl TransformDriver for PiApiProvider {
    #[instrument(skip(self, request))]
    async fn invoke(&self, request: &TransformRequest) -> AtelierResult<ProviderOutcome> {
        let target_kind = match request.params_or_default() {
            TransformParams::FaceSwap { target } => target,
            other => {
                return Err(ProviderError::new(ProviderErrorKind::Unsupported(format!(
                    "PiAPI serves face swap only, not {}",
                    other.kind()
                ))))?;
            }
        };
        let swap = request.secondary.as_ref().ok_or_else(|| {
            ProviderError::new(ProviderErrorKind::Unsupported(
                "face swap requires a secondary source image".to_string(),
            ))
        })?;

        let webhook_secret_holder;
        let webhook = match request.webhook_url.as_deref() {
            Some(endpoint) => {
                let timestamp = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_secs();
                webhook_secret_holder = webhook_secret(&self.api_key, timestamp);
                Some((endpoint, webhook_secret_holder.as_str()))
            }
            None => None,
        };

        let payload = build_task_payload(
            target_kind,
            &render(&request.primary),
            &render(swap),
            webhook,
        );
        let created = self.create_task(&payload).await?;
        debug!(task_id = %created.task_id, "PiAPI task created");

        if webhook.is_some() {
            return Ok(ProviderOutcome::Accepted(AcceptedJob {
                job_id: created.task_id,
                provider: self.name().to_string(),
            }));
        }

        let mut job = AsyncJob::new(created.task_id.clone(), TIMEOUT);
        let poller = JobPoller::new(POLL_INTERVAL);
        let task_id = created.task_id;
        let url = poller
            .run(&mut job, || self.poll_once(&task_id, target_kind))
            .await?;

        Ok(ProviderOutcome::Resolved(ProviderSuccess {
            media: MediaReference::Url(url),
            provider: self.name().to_string(),
            attribution: Some("Qubico face-swap".to_string()),
        }))
    }

    fn name(&self) -> &str {
        "PiAPI"
    }

    fn timeout(&self) -> Duration {
        TIMEOUT
    }

    fn mode(&self) -> InvocationMode {
        InvocationMode::SubmitAndPoll
    }

    fn supports(&self, kind: TransformKind) -> bool {
        kind == TransformKind::FaceSwap
    }

    fn supports_webhook(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_is_deterministic_and_truncated() {
        let a = webhook_secret("key", 1_700_000_000);
        let b = webhook_secret("key", 1_700_000_000);
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));

        // Different timestamp, different secret
        assert_ne!(a, webhook_secret("key", 1_700_000_001));
    }

    #[test]
    fn image_target_routes_to_image_toolkit() {
        let payload = build_task_payload(
            MediaKind::Image,
            "https://cdn.example.com/t.png",
            "https://cdn.example.com/s.png",
            None,
        );
        assert_eq!(payload["model"], "Qubico/image-toolkit");
        assert_eq!(payload["task_type"], "face-swap");
        assert_eq!(payload["input"]["target_image"], "https://cdn.example.com/t.png");
        assert_eq!(payload["input"]["swap_image"], "https://cdn.example.com/s.png");
        assert!(payload.get("config").is_none());
    }

    #[test]
    fn video_target_routes_to_video_toolkit_with_webhook() {
        let payload = build_task_payload(
            MediaKind::Video,
            "https://cdn.example.com/t.mp4",
            "https://cdn.example.com/s.png",
            Some(("https://hooks.example.com/done", "deadbeef")),
        );
        assert_eq!(payload["model"], "Qubico/video-toolkit");
        assert_eq!(payload["input"]["target_video"], "https://cdn.example.com/t.mp4");
        assert_eq!(
            payload["config"]["webhook_config"]["endpoint"],
            "https://hooks.example.com/done"
        );
        assert_eq!(payload["config"]["webhook_config"]["secret"], "deadbeef");
    }

    #[test]
    fn unknown_status_counts_as_processing() {
        assert_eq!(parse_status("Completed"), JobStatus::Completed);
        assert_eq!(parse_status("failed"), JobStatus::Failed);
        assert_eq!(parse_status("pending"), JobStatus::Pending);
        assert_eq!(parse_status("staged"), JobStatus::Processing);
    }

    #[test]
    fn non_200_envelope_code_is_a_remote_error() {
        let envelope = TaskEnvelope {
            code: 500,
            message: "insufficient credits".to_string(),
            data: None,
        };
        let error = envelope.into_data().unwrap_err();
        assert!(format!("{error}").contains("insufficient credits"));
    }
}
