//! Request identifier generation.
//!
//! Every `/rag` reply and feedback acknowledgment carries a fresh id.
//! Ids are unique per process: either random (UUID v4) or a monotonic
//! counter for reproducible runs.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// What the id is being minted for. Determines the prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    Rag,
    Feedback,
}

impl IdKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Rag => "req-mock",
            Self::Feedback => "req-feedback",
        }
    }
}

/// Source of request identifiers.
pub trait RequestIdGenerator: Send + Sync {
    fn next_id(&self, kind: IdKind) -> String;
}

/// Random ids: `req-mock-<uuid>`.
#[derive(Debug, Default)]
pub struct UuidGenerator;

impl RequestIdGenerator for UuidGenerator {
    fn next_id(&self, kind: IdKind) -> String {
        format!("{}-{}", kind.prefix(), Uuid::new_v4())
    }
}

/// Counter ids: `req-mock-1`, `req-mock-2`, ...
///
/// One counter is shared by all kinds, so an id never repeats across them.
#[derive(Debug, Default)]
pub struct SequentialGenerator {
    next: AtomicU64,
}

impl SequentialGenerator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RequestIdGenerator for SequentialGenerator {
    fn next_id(&self, kind: IdKind) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{n}", kind.prefix())
    }
}

/// Which generator to build, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    #[default]
    Uuid,
    Sequential,
}

impl IdStrategy {
    pub fn build(self) -> Arc<dyn RequestIdGenerator> {
        match self {
            Self::Uuid => Arc::new(UuidGenerator),
            Self::Sequential => Arc::new(SequentialGenerator::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn uuid_ids_carry_prefix_and_differ() {
        let ids = UuidGenerator;
        let a = ids.next_id(IdKind::Rag);
        let b = ids.next_id(IdKind::Rag);
        assert!(a.starts_with("req-mock-"));
        assert_ne!(a, b);
        assert!(ids.next_id(IdKind::Feedback).starts_with("req-feedback-"));
    }

    #[test]
    fn sequential_ids_count_up() {
        let ids = SequentialGenerator::new();
        assert_eq!(ids.next_id(IdKind::Rag), "req-mock-1");
        assert_eq!(ids.next_id(IdKind::Feedback), "req-feedback-2");
        assert_eq!(ids.next_id(IdKind::Rag), "req-mock-3");
    }

    #[test]
    fn sequential_ids_unique_across_threads() {
        let ids = Arc::new(SequentialGenerator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ids = ids.clone();
                std::thread::spawn(move || {
                    (0..250)
                        .map(|_| ids.next_id(IdKind::Rag))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id");
            }
        }
        assert_eq!(seen.len(), 2_000);
    }

    #[test]
    fn strategy_parses_from_snake_case() {
        let s: IdStrategy = serde_json::from_str(r#""sequential""#).unwrap();
        assert_eq!(s, IdStrategy::Sequential);
        assert_eq!(IdStrategy::default(), IdStrategy::Uuid);
        assert_eq!(s.build().next_id(IdKind::Rag), "req-mock-1");
    }
}
