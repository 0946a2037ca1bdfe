//! Error types for the mockrag domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all mockrag operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Template errors ---
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    // --- Feedback errors ---
    #[error("Feedback error: {0}")]
    Feedback(#[from] FeedbackError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Stable machine-readable kind, used in HTTP error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Template(e) => e.kind(),
            Self::Feedback(e) => e.kind(),
            Self::Config { .. } => "config",
            Self::Serialization(_) => "serialization",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("Template not found: '{requested}' (default '{fallback}' is also missing)")]
    NotFound { requested: String, fallback: String },

    #[error("Malformed template '{key}': {reason}")]
    Malformed { key: String, reason: String },
}

impl TemplateError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "template_not_found",
            Self::Malformed { .. } => "malformed_template",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedbackError {
    #[error("trace_id must not be empty")]
    EmptyTraceId,
}

impl FeedbackError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyTraceId => "empty_trace_id",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_not_found_displays_both_keys() {
        let err = Error::Template(TemplateError::NotFound {
            requested: "cart_operation".into(),
            fallback: "product_query".into(),
        });
        assert!(err.to_string().contains("cart_operation"));
        assert!(err.to_string().contains("product_query"));
        assert_eq!(err.kind(), "template_not_found");
    }

    #[test]
    fn malformed_template_kind() {
        let err: Error = TemplateError::Malformed {
            key: "product_query".into(),
            reason: "used_context[0] is missing doc_id".into(),
        }
        .into();
        assert_eq!(err.kind(), "malformed_template");
        assert!(err.to_string().contains("doc_id"));
    }

    #[test]
    fn feedback_error_kind() {
        let err: Error = FeedbackError::EmptyTraceId.into();
        assert_eq!(err.kind(), "empty_trace_id");
    }
}
