//! Response templates: the pre-authored answers the mock serves.
//!
//! A template is parsed from one on-disk JSON document. Only `answer` is
//! required at load time; `used_context` is kept as raw JSON and checked
//! when an envelope is composed from it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default template, used when a requested key is missing.
pub const PRODUCT_QUERY: &str = "product_query";
/// Single cart operation ("add milk to cart").
pub const CART_OPERATION: &str = "cart_operation";
/// Cart operation combined with a warehouse reservation.
pub const MULTI_STEP_QUERY: &str = "multi_step_query";

/// The key the composer falls back to when none is configured.
pub const DEFAULT_KEY: &str = PRODUCT_QUERY;

/// One canned response, owned by the template store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseTemplate {
    key: String,
    answer: String,
    used_context: Value,
}

impl ResponseTemplate {
    pub fn new(key: impl Into<String>, answer: impl Into<String>, used_context: Value) -> Self {
        Self {
            key: key.into(),
            answer: answer.into(),
            used_context,
        }
    }

    /// Build a template from a parsed document.
    ///
    /// The document must be a JSON object with a string `answer`. A missing
    /// `used_context` becomes an empty list. Any `request_id` in the document
    /// is a placeholder and is dropped.
    pub fn from_document(key: &str, document: Value) -> Result<Self, String> {
        let Value::Object(mut fields) = document else {
            return Err("document is not a JSON object".into());
        };

        let answer = match fields.remove("answer") {
            Some(Value::String(answer)) => answer,
            Some(_) => return Err("field 'answer' is not a string".into()),
            None => return Err("missing required field 'answer'".into()),
        };

        let used_context = fields
            .remove("used_context")
            .or_else(|| fields.remove("usedContext"))
            .unwrap_or_else(|| Value::Array(Vec::new()));

        Ok(Self::new(key, answer, used_context))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Raw supporting evidence, not yet validated.
    pub fn used_context(&self) -> &Value {
        &self.used_context
    }
}

/// A supporting-evidence record attached to an answer.
///
/// `doc_id` and `content` are required; every other field, `score`
/// included, stays in `extra` exactly as authored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsedContextItem {
    pub doc_id: String,

    pub content: String,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl UsedContextItem {
    pub fn new(doc_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            content: content.into(),
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.extra.insert("score".into(), Value::from(score));
        self
    }

    /// Relevance score, when the item carries a numeric one.
    pub fn score(&self) -> Option<f64> {
        self.extra.get("score").and_then(Value::as_f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_with_all_fields() {
        let doc = json!({
            "request_id": "placeholder",
            "answer": "Bananas cost $0.59/lb.",
            "used_context": [{"doc_id": "p-1", "content": "Bananas", "score": 0.9}]
        });
        let template = ResponseTemplate::from_document("product_query", doc).unwrap();
        assert_eq!(template.key(), "product_query");
        assert_eq!(template.answer(), "Bananas cost $0.59/lb.");
        assert_eq!(template.used_context().as_array().unwrap().len(), 1);
    }

    #[test]
    fn document_without_used_context_gets_empty_list() {
        let template =
            ResponseTemplate::from_document("cart_operation", json!({"answer": "Added."})).unwrap();
        assert_eq!(template.used_context(), &json!([]));
    }

    #[test]
    fn document_missing_answer_rejected() {
        let err = ResponseTemplate::from_document("x", json!({"used_context": []})).unwrap_err();
        assert!(err.contains("answer"));
    }

    #[test]
    fn document_with_non_string_answer_rejected() {
        assert!(ResponseTemplate::from_document("x", json!({"answer": 42})).is_err());
    }

    #[test]
    fn non_object_document_rejected() {
        assert!(ResponseTemplate::from_document("x", json!(["answer"])).is_err());
    }

    #[test]
    fn used_context_item_keeps_extra_fields() {
        let item: UsedContextItem = serde_json::from_value(json!({
            "doc_id": "w-7",
            "content": "Warehouse 7 stock",
            "score": 0.81,
            "source": "inventory"
        }))
        .unwrap();
        assert_eq!(item.extra.get("source"), Some(&json!("inventory")));

        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["source"], "inventory");
        assert_eq!(back["doc_id"], "w-7");
    }

    #[test]
    fn used_context_item_keeps_score_as_authored() {
        let raw = json!([
            {"doc_id": "a", "content": "b", "score": null},
            {"doc_id": "c", "content": "d", "score": 1},
            {"doc_id": "e", "content": "f"}
        ]);
        let items: Vec<UsedContextItem> = serde_json::from_value(raw.clone()).unwrap();
        assert!(items[0].score().is_none());
        assert_eq!(items[1].score(), Some(1.0));
        assert_eq!(serde_json::to_value(&items).unwrap(), raw);
        assert_eq!(
            serde_json::to_string(&items[1]).unwrap(),
            r#"{"doc_id":"c","content":"d","score":1}"#
        );
    }
}
