//! `mockrag init`: write the default config file.

use mockrag_config::AppConfig;
use std::path::Path;

pub fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if config_path.exists() {
        println!("  Config file exists: {}", config_path.display());
    } else {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(config_path, AppConfig::default_toml())?;
        println!("✅ Wrote default config: {}", config_path.display());
    }

    let config = AppConfig::load_from(config_path)?;
    println!("   Templates: {}", config.templates.dir.display());
    println!("              (a relative templates.dir is read from the config file's directory)");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    if config.gateway.host == "127.0.0.1" {
        println!("              (loopback only; set gateway.host or MOCKRAG_HOST to 0.0.0.0)");
    }

    Ok(())
}
