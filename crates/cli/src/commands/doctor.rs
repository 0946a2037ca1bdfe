//! `mockrag doctor`: diagnose configuration and templates.

use mockrag_config::AppConfig;
use mockrag_core::template::{CART_OPERATION, MULTI_STEP_QUERY};
use mockrag_engine::{Composer, TemplateStore};
use std::path::Path;
use std::sync::Arc;

pub fn run(config_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("mockrag doctor");
    println!("==============\n");

    let mut issues = 0;

    let config = if config_path.exists() {
        match AppConfig::load_with_env(config_path) {
            Ok(config) => {
                println!("  ✅ Config file valid: {}", config_path.display());
                config
            }
            Err(e) => {
                println!("  ❌ Config file invalid: {e}");
                return Err(e.into());
            }
        }
    } else {
        println!("  ⚠️  No config file at {}, using defaults", config_path.display());
        AppConfig::default()
    };

    let dir = &config.templates.dir;
    if dir.is_dir() {
        println!("  ✅ Template directory exists: {}", dir.display());
    } else {
        println!("  ❌ Template directory missing: {}", dir.display());
        issues += 1;
    }

    let store = Arc::new(TemplateStore::load(dir));
    println!("  {} template(s) loaded", store.len());
    for skipped in store.skipped() {
        println!("  ⚠️  Skipped {}: {}", skipped.path.display(), skipped.reason);
        issues += 1;
    }

    let default_key = config.templates.default_key.clone();
    let composer = Composer::new(store.clone()).with_default_key(default_key.clone());
    let mut keys = vec![default_key, CART_OPERATION.to_string(), MULTI_STEP_QUERY.to_string()];
    keys.extend(config.classifier.rules.iter().map(|r| r.key.clone()));
    keys.sort();
    keys.dedup();

    for key in keys {
        if !store.contains(&key) {
            if key == config.templates.default_key {
                println!("  ❌ Default template '{key}' missing, unmatched requests will fail");
            } else {
                println!("  ⚠️  No template for '{key}', requests fall back to the default");
            }
            issues += 1;
            continue;
        }
        match composer.compose(&key, "req-doctor") {
            Ok(_) => println!("  ✅ '{key}' composes"),
            Err(e) => {
                println!("  ❌ {e}");
                issues += 1;
            }
        }
    }

    println!();
    if issues == 0 {
        println!("  All checks passed!");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
