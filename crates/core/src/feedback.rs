//! Feedback acknowledgment types.
//!
//! Feedback is acknowledged but never stored.

use serde::{Deserialize, Serialize};

/// Body of `POST /submit_feedback`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRequest {
    /// Trace the feedback refers to.
    #[serde(alias = "traceId")]
    pub trace_id: String,

    /// Score, comment, and whatever else the client sends.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Reply to a feedback submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackAck {
    pub request_id: String,
    pub status: String,
}

impl FeedbackAck {
    pub fn success(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            status: "success".into(),
        }
    }
}
