pub mod classify;
pub mod doctor;
pub mod init;
pub mod serve;
pub mod templates;

use mockrag_config::AppConfig;
use std::path::Path;

/// Load config from `path` with environment overrides applied.
pub fn load_config(path: &Path) -> Result<AppConfig, Box<dyn std::error::Error>> {
    AppConfig::load_with_env(path).map_err(|e| format!("Failed to load config: {e}").into())
}
