//! Deterministic response selection and delivery for mockrag.
//!
//! The pipeline for one `/rag` request:
//!
//! ```text
//! query ──▶ QueryClassifier ──▶ key ──▶ Composer ──▶ envelope ──▶ StreamEncoder ──▶ event
//!                                          │
//!                                    TemplateStore
//! ```
//!
//! The store is loaded once at startup and only read afterwards. Everything
//! after it is synchronous and pure apart from minting request ids.

pub mod classifier;
pub mod composer;
pub mod service;
pub mod store;
pub mod stream;

pub use classifier::{Classification, KeywordSet, QueryClassifier, Rule};
pub use composer::Composer;
pub use service::{MockService, Reply};
pub use store::{SkippedFile, TemplateStore};
pub use stream::{SingleEventEncoder, StreamEncoder, StreamEvent};
