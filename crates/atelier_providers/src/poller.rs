//! Shared status-polling loop for submit-and-poll providers.

use atelier_core::{AsyncJob, JobStatus};
use atelier_error::{AtelierResult, ProviderError, ProviderErrorKind};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// One observed poll of a remote job.
#[derive(Debug, Clone, PartialEq)]
pub enum PollStatus<T> {
    /// Job not yet terminal; carries the observed status
    Pending(JobStatus),
    /// Job finished; carries the extracted output
    Completed(T),
    /// Remote service reported failure
    Failed(String),
}

/// Fixed-interval poller with a hard deadline.
///
/// Sleeps the interval, queries status, and repeats until `completed`,
/// `failed`, or the job's deadline elapses, whichever comes first. On
/// deadline the returned `Timeout` carries the remote job id for
/// observability, and no further polls are issued; the remote job is simply
/// abandoned (most such APIs have no cancel endpoint).
///
/// # Examples
///
/// ```no_run
/// use atelier_core::AsyncJob;
/// use atelier_providers::{JobPoller, PollStatus};
/// use std::time::Duration;
///
/// # async fn example() -> atelier_error::AtelierResult<()> {
/// let poller = JobPoller::new(Duration::from_secs(3));
/// let mut job = AsyncJob::new("task-123", Duration::from_secs(120));
/// let url: String = poller
///     .run(&mut job, || async {
///         // query the remote status endpoint here
///         Ok(PollStatus::Completed("https://cdn.example.com/out.png".to_string()))
///     })
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct JobPoller {
    interval: Duration,
}

impl JobPoller {
    /// Create a poller with a fixed inter-poll interval.
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Drive `check` until a terminal state or the job's deadline.
    pub async fn run<T, F, Fut>(&self, job: &mut AsyncJob, mut check: F) -> AtelierResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = AtelierResult<PollStatus<T>>>,
    {
        let started = Instant::now();
        loop {
            let remaining = job.deadline.saturating_sub(started.elapsed());
            if remaining < self.interval {
                warn!(job_id = %job.id, "Job did not reach a terminal state before its deadline");
                return Err(ProviderError::new(ProviderErrorKind::Timeout {
                    elapsed_secs: started.elapsed().as_secs(),
                    job_id: Some(job.id.clone()),
                }))?;
            }
            tokio::time::sleep(self.interval).await;

            match check().await? {
                PollStatus::Pending(status) => {
                    debug!(job_id = %job.id, %status, "Job still in flight");
                    job.observe(status);
                }
                PollStatus::Completed(output) => {
                    debug!(job_id = %job.id, "Job completed");
                    job.observe(JobStatus::Completed);
                    return Ok(output);
                }
                PollStatus::Failed(message) => {
                    warn!(job_id = %job.id, message, "Job failed remotely");
                    job.observe(JobStatus::Failed);
                    return Err(ProviderError::new(ProviderErrorKind::Remote {
                        status: None,
                        message,
                    }))?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atelier_error::AtelierErrorKind;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test(start_paused = true)]
    async fn completes_after_pending_polls() {
        let poller = JobPoller::new(Duration::from_secs(2));
        let mut job = AsyncJob::new("t1", Duration::from_secs(60));
        let polls = Arc::new(AtomicUsize::new(0));
        let counter = polls.clone();

        let result = poller
            .run(&mut job, move || {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 3 {
                        Ok(PollStatus::Pending(JobStatus::Processing))
                    } else {
                        Ok(PollStatus::Completed("out".to_string()))
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(result, "out");
        assert_eq!(polls.load(Ordering::SeqCst), 4);
        assert_eq!(job.status, JobStatus::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_yields_timeout_with_job_id_and_stops_polling() {
        let poller = JobPoller::new(Duration::from_secs(3));
        let mut job = AsyncJob::new("t2", Duration::from_secs(10));
        let polls = Arc::new(AtomicUsize::new(0));
        let counter = polls.clone();

        let error = poller
            .run::<String, _, _>(&mut job, move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok(PollStatus::Pending(JobStatus::Processing)) }
            })
            .await
            .unwrap_err();

        match error.kind() {
            AtelierErrorKind::Provider(e) => match &e.kind {
                ProviderErrorKind::Timeout { job_id, .. } => {
                    assert_eq!(job_id.as_deref(), Some("t2"));
                }
                other => panic!("expected timeout, got {other:?}"),
            },
            other => panic!("expected provider error, got {other:?}"),
        }
        // 10s deadline at 3s interval: polls at 3s, 6s, 9s: none after
        assert_eq!(polls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn remote_failure_surfaces_message() {
        let poller = JobPoller::new(Duration::from_secs(1));
        let mut job = AsyncJob::new("t3", Duration::from_secs(30));

        let error = poller
            .run::<String, _, _>(&mut job, || async {
                Ok(PollStatus::Failed("face not detected".to_string()))
            })
            .await
            .unwrap_err();

        assert!(format!("{error}").contains("face not detected"));
        assert_eq!(job.status, JobStatus::Failed);
    }
}
