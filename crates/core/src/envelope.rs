//! The per-request response envelope.

use serde::{Deserialize, Serialize};

use crate::template::UsedContextItem;

/// What a caller receives for one `/rag` request.
///
/// Built once by the composer and never mutated afterwards, so the fields
/// are only readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(alias = "requestId")]
    request_id: String,

    answer: String,

    #[serde(alias = "usedContext")]
    used_context: Vec<UsedContextItem>,
}

impl ResponseEnvelope {
    pub fn new(
        request_id: impl Into<String>,
        answer: impl Into<String>,
        used_context: Vec<UsedContextItem>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            answer: answer.into(),
            used_context,
        }
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn used_context(&self) -> &[UsedContextItem] {
        &self.used_context
    }
}
