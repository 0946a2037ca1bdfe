//! Template store: canned responses loaded from a directory.
//!
//! Each `<key>.json` file in the directory becomes one template. Loading is
//! fail-soft: a file that cannot be read or parsed, or that lacks an
//! `answer`, is skipped with a warning and the rest still load. A missing
//! directory yields an empty store.
//!
//! The store is immutable after construction and is shared behind an `Arc`,
//! so lookups need no locking.

use mockrag_core::{ResponseTemplate, TemplateError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A file that was not loaded, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct TemplateStore {
    templates: HashMap<String, ResponseTemplate>,
    skipped: Vec<SkippedFile>,
}

impl TemplateStore {
    /// Load every `*.json` document in `dir`.
    pub fn load(dir: &Path) -> Self {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(
                    dir = %dir.display(),
                    error = %e,
                    "Template directory not readable, store is empty"
                );
                return Self::default();
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut store = Self::default();
        for path in paths {
            match Self::load_file(&path) {
                Ok(template) => {
                    debug!(key = template.key(), path = %path.display(), "Template loaded");
                    store.templates.insert(template.key().to_string(), template);
                }
                Err(reason) => {
                    warn!(path = %path.display(), reason = %reason, "Skipping template");
                    store.skipped.push(SkippedFile { path, reason });
                }
            }
        }

        if store.is_empty() {
            warn!(dir = %dir.display(), "No valid templates found");
        } else {
            info!(dir = %dir.display(), count = store.len(), "Template store loaded");
        }

        store
    }

    fn load_file(path: &Path) -> Result<ResponseTemplate, String> {
        let key = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| "file name is not a usable key".to_string())?;

        let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
        let document: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| format!("invalid JSON: {e}"))?;

        ResponseTemplate::from_document(key, document)
    }

    /// Build a store from already-parsed templates.
    ///
    /// Later templates replace earlier ones with the same key.
    pub fn from_templates(templates: impl IntoIterator<Item = ResponseTemplate>) -> Self {
        Self {
            templates: templates
                .into_iter()
                .map(|t| (t.key().to_string(), t))
                .collect(),
            skipped: Vec::new(),
        }
    }

    /// Find the template for `key`.
    ///
    /// `NotFound` reports `key` as both the requested and fallback key; the
    /// composer fills in its own default when it gives up.
    pub fn lookup(&self, key: &str) -> Result<&ResponseTemplate, TemplateError> {
        self.templates.get(key).ok_or_else(|| TemplateError::NotFound {
            requested: key.to_string(),
            fallback: key.to_string(),
        })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.templates.contains_key(key)
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Files rejected during `load`.
    pub fn skipped(&self) -> &[SkippedFile] {
        &self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn loads_documents_keyed_by_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "product_query.json", r#"{"answer":"Bananas are $0.59/lb."}"#);
        write(
            dir.path(),
            "cart_operation.json",
            r#"{"request_id":"x","answer":"Added.","used_context":[]}"#,
        );

        let store = TemplateStore::load(dir.path());
        assert_eq!(store.len(), 2);
        assert_eq!(store.keys(), vec!["cart_operation", "product_query"]);
        assert_eq!(
            store.lookup("product_query").unwrap().answer(),
            "Bananas are $0.59/lb."
        );
        assert!(store.skipped().is_empty());
    }

    #[test]
    fn missing_answer_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "product_query.json", r#"{"answer":"ok"}"#);
        write(dir.path(), "broken.json", r#"{"used_context":[]}"#);
        write(dir.path(), "garbage.json", "not json at all");

        let store = TemplateStore::load(dir.path());
        assert_eq!(store.keys(), vec!["product_query"]);
        assert_eq!(store.skipped().len(), 2);
        assert!(store.skipped().iter().any(|s| s.reason.contains("answer")));
        assert!(store.skipped().iter().any(|s| s.reason.contains("invalid JSON")));
    }

    #[test]
    fn non_json_files_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "README.md", "# templates");
        write(dir.path(), "product_query.json", r#"{"answer":"ok"}"#);
        std::fs::create_dir(dir.path().join("nested.json")).unwrap();

        let store = TemplateStore::load(dir.path());
        assert_eq!(store.len(), 1);
        assert!(store.skipped().is_empty());
    }

    #[test]
    fn missing_directory_gives_empty_store() {
        let store = TemplateStore::load(Path::new("/nonexistent/mockrag/templates"));
        assert!(store.is_empty());
        assert!(matches!(
            store.lookup("product_query"),
            Err(TemplateError::NotFound { .. })
        ));
    }

    #[test]
    fn from_templates_builds_in_memory_store() {
        let store = TemplateStore::from_templates([
            ResponseTemplate::new("cart_operation", "Added.", json!([])),
            ResponseTemplate::new("product_query", "Price.", json!([])),
        ]);
        assert!(store.contains("cart_operation"));
        assert!(!store.contains("multi_step_query"));
    }
}
