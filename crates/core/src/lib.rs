//! # mockrag Core
//!
//! Domain types and error definitions for the mockrag retrieval mock.
//! This crate has **no framework dependencies**: it defines the values that
//! flow through the pipeline (templates, envelopes, feedback, request ids)
//! and the errors the pipeline can raise. The engine and gateway crates
//! build on it.

pub mod envelope;
pub mod error;
pub mod feedback;
pub mod request_id;
pub mod template;

// Re-export key types at crate root for ergonomics
pub use envelope::ResponseEnvelope;
pub use error::{Error, FeedbackError, Result, TemplateError};
pub use feedback::{FeedbackAck, FeedbackRequest};
pub use request_id::{IdKind, IdStrategy, RequestIdGenerator, SequentialGenerator, UuidGenerator};
pub use template::{ResponseTemplate, UsedContextItem};
