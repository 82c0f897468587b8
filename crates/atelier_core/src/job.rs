//! Async job bookkeeping for submit-and-poll providers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Remote job lifecycle states.
///
/// `Completed` and `Failed` are terminal; a job is discarded once a terminal
/// state is observed or its deadline passes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JobStatus {
    /// Created, not yet picked up
    Pending,
    /// Remote service is working on it
    Processing,
    /// Finished successfully
    Completed,
    /// Remote service reported failure
    Failed,
}

impl JobStatus {
    /// True for `Completed` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// A remote submit-and-poll job tracked for a single request.
///
/// Created when the task is submitted; status transitions are observed by
/// polling at a fixed interval. Never persisted: if the request is abandoned
/// the job simply stops being polled.
///
/// # Examples
///
/// ```
/// use atelier_core::{AsyncJob, JobStatus};
/// use std::time::Duration;
///
/// let mut job = AsyncJob::new("task-123", Duration::from_secs(120));
/// assert_eq!(job.status, JobStatus::Pending);
/// job.observe(JobStatus::Completed);
/// assert!(job.status.is_terminal());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsyncJob {
    /// Opaque job id issued by the remote service
    pub id: String,
    /// Last observed status
    pub status: JobStatus,
    /// When the job was created locally
    pub created_at: DateTime<Utc>,
    /// Wall-clock budget for reaching a terminal state
    pub deadline: Duration,
}

impl AsyncJob {
    /// Track a newly-submitted job.
    pub fn new(id: impl Into<String>, deadline: Duration) -> Self {
        Self {
            id: id.into(),
            status: JobStatus::Pending,
            created_at: Utc::now(),
            deadline,
        }
    }

    /// Record a polled status.
    pub fn observe(&mut self, status: JobStatus) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_parses_remote_vocabulary() {
        assert_eq!(JobStatus::from_str("pending").unwrap(), JobStatus::Pending);
        assert_eq!(
            JobStatus::from_str("completed").unwrap(),
            JobStatus::Completed
        );
        assert!(JobStatus::from_str("exploded").is_err());
    }

    #[test]
    fn terminal_states() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }
}
