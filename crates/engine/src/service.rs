//! The mock service: classifier, composer, encoder and id source wired
//! together behind one object that the gateway holds.

use mockrag_config::AppConfig;
use mockrag_core::{
    FeedbackAck, FeedbackError, IdKind, RequestIdGenerator, ResponseEnvelope, Result,
};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::classifier::{Classification, QueryClassifier};
use crate::composer::Composer;
use crate::store::TemplateStore;
use crate::stream::{SingleEventEncoder, StreamEncoder, StreamEvent};

/// Result of answering one query.
#[derive(Debug, Clone)]
pub struct Reply {
    pub classification: Classification,
    pub envelope: ResponseEnvelope,
}

pub struct MockService {
    classifier: QueryClassifier,
    composer: Composer,
    encoder: Box<dyn StreamEncoder>,
    ids: Arc<dyn RequestIdGenerator>,
}

impl MockService {
    pub fn new(
        classifier: QueryClassifier,
        composer: Composer,
        encoder: Box<dyn StreamEncoder>,
        ids: Arc<dyn RequestIdGenerator>,
    ) -> Self {
        Self {
            classifier,
            composer,
            encoder,
            ids,
        }
    }

    /// Build the service from configuration, loading the template store.
    pub fn from_config(config: &AppConfig) -> Self {
        let store = Arc::new(TemplateStore::load(&config.templates.dir));
        Self::with_store(store, config)
    }

    /// Build the service around an existing store.
    pub fn with_store(store: Arc<TemplateStore>, config: &AppConfig) -> Self {
        let default_key = &config.templates.default_key;
        if !store.is_empty() && !store.contains(default_key) {
            warn!(default_key = %default_key, "Default template is missing from the store");
        }

        Self::new(
            QueryClassifier::from_config(&config.classifier.rules, default_key),
            Composer::new(store).with_default_key(default_key.clone()),
            Box::new(SingleEventEncoder),
            config.request_ids.strategy.build(),
        )
    }

    /// Classify `query` and compose its envelope under a fresh request id.
    pub fn respond(&self, query: &str) -> Result<Reply> {
        let classification = self.classifier.classify(query);
        let request_id = self.ids.next_id(IdKind::Rag);
        debug!(
            request_id = %request_id,
            key = %classification.key,
            rule = classification.rule.as_deref().unwrap_or("default"),
            "Query classified"
        );

        let envelope = self
            .composer
            .compose(&classification.key, &request_id)
            .inspect_err(|e| error!(request_id = %request_id, error = %e, "Compose failed"))?;

        Ok(Reply {
            classification,
            envelope,
        })
    }

    /// Answer `query` as stream events.
    pub fn stream(&self, query: &str) -> Result<Vec<StreamEvent>> {
        let reply = self.respond(query)?;
        self.encoder.encode(&reply.envelope)
    }

    /// Acknowledge feedback for `trace_id`. Nothing is stored.
    pub fn acknowledge(&self, trace_id: &str) -> Result<FeedbackAck> {
        if trace_id.is_empty() {
            return Err(FeedbackError::EmptyTraceId.into());
        }

        let request_id = self.ids.next_id(IdKind::Feedback);
        info!(request_id = %request_id, trace_id = %trace_id, "Feedback acknowledged");
        Ok(FeedbackAck::success(request_id))
    }

    pub fn classifier(&self) -> &QueryClassifier {
        &self.classifier
    }

    pub fn store(&self) -> &TemplateStore {
        self.composer.store()
    }

    pub fn template_count(&self) -> usize {
        self.store().len()
    }
}
