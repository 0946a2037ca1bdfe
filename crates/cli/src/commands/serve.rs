//! `mockrag serve`: start the HTTP API server.

use std::path::{Path, PathBuf};

pub async fn run(
    config_path: &Path,
    port_override: Option<u16>,
    templates_override: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::load_config(config_path)?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }
    if let Some(dir) = templates_override {
        config.templates.dir = dir;
    }

    println!("mockrag gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Templates: {}", config.templates.dir.display());

    mockrag_gateway::start(config).await?;

    Ok(())
}
