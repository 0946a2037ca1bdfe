//! Response composer: turns a stored template into a per-request envelope.

use mockrag_core::template::DEFAULT_KEY;
use mockrag_core::{ResponseEnvelope, ResponseTemplate, TemplateError, UsedContextItem};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use crate::store::TemplateStore;

pub struct Composer {
    store: Arc<TemplateStore>,
    default_key: String,
}

impl Composer {
    pub fn new(store: Arc<TemplateStore>) -> Self {
        Self {
            store,
            default_key: DEFAULT_KEY.to_string(),
        }
    }

    pub fn with_default_key(mut self, key: impl Into<String>) -> Self {
        self.default_key = key.into();
        self
    }

    /// Build the envelope for `key`, stamped with `request_id`.
    ///
    /// Falls back to the default key when `key` has no template. Fails with
    /// `NotFound` when neither resolves and with `Malformed` when the
    /// template's shape is invalid; never returns a partial envelope.
    pub fn compose(&self, key: &str, request_id: &str) -> Result<ResponseEnvelope, TemplateError> {
        let template = self.resolve(key)?;
        let used_context = validate_used_context(template)?;

        if template.answer().trim().is_empty() {
            return Err(TemplateError::Malformed {
                key: template.key().to_string(),
                reason: "answer is empty".into(),
            });
        }

        Ok(ResponseEnvelope::new(
            request_id,
            template.answer(),
            used_context,
        ))
    }

    fn resolve(&self, key: &str) -> Result<&ResponseTemplate, TemplateError> {
        if let Ok(template) = self.store.lookup(key) {
            return Ok(template);
        }

        warn!(requested = key, fallback = %self.default_key, "Template missing, using default");
        self.store
            .lookup(&self.default_key)
            .map_err(|_| TemplateError::NotFound {
                requested: key.to_string(),
                fallback: self.default_key.clone(),
            })
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    pub fn default_key(&self) -> &str {
        &self.default_key
    }
}

/// Check and copy a template's `used_context` into typed items.
pub fn validate_used_context(
    template: &ResponseTemplate,
) -> Result<Vec<UsedContextItem>, TemplateError> {
    let malformed = |reason: String| TemplateError::Malformed {
        key: template.key().to_string(),
        reason,
    };

    let Value::Array(items) = template.used_context() else {
        return Err(malformed("used_context is not a list".into()));
    };

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let Some(fields) = item.as_object() else {
                return Err(malformed(format!("used_context[{i}] is not an object")));
            };
            let bad_score = fields
                .get("score")
                .is_some_and(|score| !(score.is_number() || score.is_null()));
            if bad_score {
                return Err(malformed(format!("used_context[{i}].score is not a number")));
            }
            serde_json::from_value::<UsedContextItem>(item.clone())
                .map_err(|e| malformed(format!("used_context[{i}]: {e}")))
        })
        .collect()
}
