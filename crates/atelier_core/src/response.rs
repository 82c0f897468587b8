//! Serializable response shapes for the HTTP layer.
//!
//! The gateway itself returns [`GatewayResult`](crate::GatewayResult) /
//! errors; this module is the flat JSON contract the thin HTTP layer
//! serializes, kept here so handlers never invent their own shape.

use serde::{Deserialize, Serialize};

/// Outbound response record.
///
/// Success carries the resolved media (pass-through URL or data URI, already
/// rendered to a string by the caller) plus the provider that satisfied the
/// request; failure carries the error and the ordered list of providers
/// tried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransformResponse {
    /// Transformation complete
    Success {
        /// Always true
        success: bool,
        /// Provider that satisfied the request
        provider: String,
        /// Result URL or data URI
        result: String,
        /// Model or service attribution
        #[serde(skip_serializing_if = "Option::is_none")]
        attribution: Option<String>,
    },
    /// Job accepted for webhook completion
    Pending {
        /// Always true
        success: bool,
        /// Reported status, always "pending"
        status: String,
        /// Remote job id
        job_id: String,
        /// Provider holding the job
        provider: String,
    },
    /// Request failed
    Failure {
        /// Always false
        success: bool,
        /// Human-readable error
        error: String,
        /// Providers attempted, in order, with per-attempt reasons
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        providers_tried: Vec<String>,
    },
}

impl TransformResponse {
    /// Successful completion.
    pub fn resolved(
        provider: impl Into<String>,
        result: impl Into<String>,
        attribution: Option<String>,
    ) -> Self {
        TransformResponse::Success {
            success: true,
            provider: provider.into(),
            result: result.into(),
            attribution,
        }
    }

    /// Accepted for async completion.
    pub fn pending(job_id: impl Into<String>, provider: impl Into<String>) -> Self {
        TransformResponse::Pending {
            success: true,
            status: "pending".to_string(),
            job_id: job_id.into(),
            provider: provider.into(),
        }
    }

    /// Failure with the ordered provider attempt list.
    pub fn failure(error: impl Into<String>, providers_tried: Vec<String>) -> Self {
        TransformResponse::Failure {
            success: false,
            error: error.into(),
            providers_tried,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_serializes_providers_in_order() {
        let response = TransformResponse::failure(
            "all providers failed",
            vec!["PiAPI: remote error".into(), "Replicate: timeout".into()],
        );
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["providers_tried"][0], "PiAPI: remote error");
        assert_eq!(json["providers_tried"][1], "Replicate: timeout");
    }

    #[test]
    fn pending_shape() {
        let response = TransformResponse::pending("task-9", "PiAPI");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["job_id"], "task-9");
    }
}
