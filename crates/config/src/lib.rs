//! Configuration loading, validation, and management for mockrag.
//!
//! Loads configuration from `~/.mockrag/config.toml` (or an explicit path)
//! with environment variable overrides. Validates all settings at startup.
//!
//! A relative `templates.dir` read from a file is anchored at that file's
//! directory. Without a file, and for `MOCKRAG_TEMPLATES_DIR`, it stays
//! relative to the working directory.

use mockrag_core::IdStrategy;
use mockrag_core::template::DEFAULT_KEY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.mockrag/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP gateway settings
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Where canned responses are read from
    #[serde(default)]
    pub templates: TemplatesConfig,

    /// Request id generation
    #[serde(default)]
    pub request_ids: RequestIdConfig,

    /// Static payload served on `GET /`
    #[serde(default)]
    pub service: ServiceInfoConfig,

    /// Query classification rules
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins. `["*"]` allows any origin.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Maximum accepted request body in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_port() -> u16 {
    8000
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}
fn default_max_body_bytes() -> usize {
    1024 * 1024
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplatesConfig {
    /// Directory holding one `<key>.json` document per template.
    #[serde(default = "default_templates_dir")]
    pub dir: PathBuf,

    /// Template served when the classified key has no document.
    #[serde(default = "default_key")]
    pub default_key: String,
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("samples").join("sample_responses")
}
fn default_key() -> String {
    DEFAULT_KEY.into()
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        Self {
            dir: default_templates_dir(),
            default_key: default_key(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestIdConfig {
    /// "uuid" or "sequential"
    #[serde(default)]
    pub strategy: IdStrategy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfoConfig {
    #[serde(default = "default_service_message")]
    pub message: String,

    #[serde(default = "default_service_version")]
    pub version: String,

    #[serde(default = "default_service_note")]
    pub note: String,
}

fn default_service_message() -> String {
    "Multi-Agent Product Intelligence Platform API (Mock Mode)".into()
}
fn default_service_version() -> String {
    "1.0.0-mock".into()
}
fn default_service_note() -> String {
    "This is a mock implementation. Full production code is in private repository.".into()
}

impl Default for ServiceInfoConfig {
    fn default() -> Self {
        Self {
            message: default_service_message(),
            version: default_service_version(),
            note: default_service_note(),
        }
    }
}

/// Classifier configuration. An empty rule list means the built-in chain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleConfig>,
}

/// One classification rule, evaluated in file order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Rule name, reported by `classify --explain` and in debug logs
    pub name: String,

    /// Template key selected when the rule matches
    pub key: String,

    /// Every inner list must have at least one term present in the query
    pub all: Vec<Vec<String>>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.mockrag/config.toml).
    ///
    /// Environment overrides:
    /// - `MOCKRAG_HOST`
    /// - `MOCKRAG_PORT`
    /// - `MOCKRAG_TEMPLATES_DIR`
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_env(&Self::config_dir().join("config.toml"))
    }

    /// Load from `path`, then apply environment overrides and re-validate.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            config.resolve_relative_to(base);
        }

        config.validate()?;
        Ok(config)
    }

    /// Anchor a relative `templates.dir` at `base`, the directory of the
    /// file it was read from. Absolute paths are left alone.
    pub fn resolve_relative_to(&mut self, base: &Path) {
        if self.templates.dir.is_relative() {
            self.templates.dir = base.join(&self.templates.dir);
        }
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production, a closure in tests).
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = lookup("MOCKRAG_HOST") {
            self.gateway.host = host;
        }

        if let Some(port) = lookup("MOCKRAG_PORT") {
            self.gateway.port = port.parse().map_err(|_| {
                ConfigError::ValidationError(format!("MOCKRAG_PORT is not a valid port: {port}"))
            })?;
        }

        if let Some(dir) = lookup("MOCKRAG_TEMPLATES_DIR") {
            self.templates.dir = PathBuf::from(dir);
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".mockrag")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gateway.host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "gateway.host must not be empty".into(),
            ));
        }

        if self.gateway.max_body_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "gateway.max_body_bytes must be > 0".into(),
            ));
        }

        if self.templates.dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "templates.dir must not be empty".into(),
            ));
        }

        if self.templates.default_key.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "templates.default_key must not be empty".into(),
            ));
        }

        for (i, rule) in self.classifier.rules.iter().enumerate() {
            if rule.name.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "classifier.rules[{i}] has no name"
                )));
            }
            if rule.key.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "classifier rule '{}' has no key",
                    rule.name
                )));
            }
            if rule.all.is_empty() || rule.all.iter().any(|terms| terms.is_empty()) {
                return Err(ConfigError::ValidationError(format!(
                    "classifier rule '{}' needs at least one non-empty term list",
                    rule.name
                )));
            }
            if rule.all.iter().flatten().any(|term| term.trim().is_empty()) {
                return Err(ConfigError::ValidationError(format!(
                    "classifier rule '{}' contains a blank term",
                    rule.name
                )));
            }
        }

        Ok(())
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gateway.port, 8000);
        assert_eq!(config.templates.default_key, "product_query");
        assert_eq!(config.request_ids.strategy, IdStrategy::Uuid);
        assert_eq!(config.gateway.cors_origins, vec!["*".to_string()]);
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.gateway.port, config.gateway.port);
        assert_eq!(parsed.templates.dir, config.templates.dir);
        assert_eq!(parsed.service.version, "1.0.0-mock");
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().gateway.port, 8000);
    }

    #[test]
    fn loads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[gateway]
port = 9100

[templates]
dir = "/srv/templates"

[request_ids]
strategy = "sequential"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.gateway.port, 9100);
        assert_eq!(config.gateway.host, "127.0.0.1");
        assert_eq!(config.templates.dir, PathBuf::from("/srv/templates"));
        assert_eq!(config.request_ids.strategy, IdStrategy::Sequential);
    }

    #[test]
    fn relative_templates_dir_resolves_against_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[templates]\ndir = \"responses\"\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.templates.dir, dir.path().join("responses"));
    }

    #[test]
    fn default_templates_dir_resolves_against_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[gateway]\nport = 9001\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(
            config.templates.dir,
            dir.path().join("samples").join("sample_responses")
        );
    }

    #[test]
    fn missing_file_keeps_templates_dir_relative() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(
            config.templates.dir,
            PathBuf::from("samples").join("sample_responses")
        );
    }

    #[test]
    fn unparseable_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[gateway\nport = ").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn unknown_id_strategy_rejected() {
        let parsed: Result<AppConfig, _> = toml::from_str("[request_ids]\nstrategy = \"hash\"\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn classifier_rules_parsing() {
        let toml_str = r#"
[[classifier.rules]]
name = "returns"
key = "return_request"
all = [["return", "refund"]]

[[classifier.rules]]
name = "cart"
key = "cart_operation"
all = [["cart", "add"]]
"#;
        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.classifier.rules.len(), 2);
        assert_eq!(config.classifier.rules[0].name, "returns");
        assert_eq!(config.classifier.rules[1].all, vec![vec!["cart", "add"]]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rule_without_terms_rejected() {
        let config: AppConfig = toml::from_str(
            r#"
[[classifier.rules]]
name = "catch_all"
key = "cart_operation"
all = [[]]
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn blank_default_key_rejected() {
        let mut config = AppConfig::default();
        config.templates.default_key = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn overrides_replace_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("MOCKRAG_HOST", "0.0.0.0"),
            ("MOCKRAG_PORT", "9000"),
            ("MOCKRAG_TEMPLATES_DIR", "/tmp/responses"),
        ]);
        let mut config = AppConfig::default();
        config
            .apply_overrides(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.gateway.host, "0.0.0.0");
        assert_eq!(config.gateway.port, 9000);
        assert_eq!(config.templates.dir, PathBuf::from("/tmp/responses"));
    }

    #[test]
    fn invalid_port_override_rejected() {
        let mut config = AppConfig::default();
        let result = config.apply_overrides(|name| {
            (name == "MOCKRAG_PORT").then(|| "eighty".to_string())
        });
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("8000"));
        assert!(toml_str.contains("product_query"));
        assert!(toml_str.contains("uuid"));
    }
}
