//! Stream encoding for `/rag` replies.
//!
//! An encoder turns an envelope into a sequence of events for a
//! Server-Sent Events transport. The mock always produces exactly one event
//! carrying the whole envelope; the transport closes right after it. Framing
//! the events on the wire is left to the HTTP layer.

use mockrag_core::{Error, ResponseEnvelope};

/// One SSE data payload, unframed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEvent {
    pub data: String,
}

impl StreamEvent {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}

pub trait StreamEncoder: Send + Sync {
    fn encode(&self, envelope: &ResponseEnvelope) -> Result<Vec<StreamEvent>, Error>;
}

/// Serializes the whole envelope as a single compact JSON event.
#[derive(Debug, Default, Clone, Copy)]
pub struct SingleEventEncoder;

impl StreamEncoder for SingleEventEncoder {
    fn encode(&self, envelope: &ResponseEnvelope) -> Result<Vec<StreamEvent>, Error> {
        let data = serde_json::to_string(envelope)?;
        Ok(vec![StreamEvent::new(data)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockrag_core::UsedContextItem;

    fn envelope() -> ResponseEnvelope {
        ResponseEnvelope::new(
            "req-mock-7",
            "Reserved 2 items at\nWarehouse B.",
            vec![UsedContextItem::new("wh-b", "Warehouse B inventory").with_score(0.77)],
        )
    }

    #[test]
    fn single_event_carries_whole_envelope() {
        let events = SingleEventEncoder.encode(&envelope()).unwrap();
        assert_eq!(events.len(), 1);

        let parsed: ResponseEnvelope = serde_json::from_str(&events[0].data).unwrap();
        assert_eq!(parsed, envelope());
    }

    #[test]
    fn payload_is_one_line() {
        let events = SingleEventEncoder.encode(&envelope()).unwrap();
        assert!(!events[0].data.contains('\n'));
    }
}
