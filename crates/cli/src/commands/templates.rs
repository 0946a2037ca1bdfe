//! `mockrag templates`: list the templates a directory provides.

use mockrag_engine::TemplateStore;
use mockrag_engine::composer::validate_used_context;
use std::path::{Path, PathBuf};

pub fn run(
    config_path: &Path,
    dir_override: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let dir = dir_override.unwrap_or(config.templates.dir);

    let store = TemplateStore::load(&dir);

    println!("Templates in {}", dir.display());
    if store.is_empty() {
        println!("  (none)");
    }
    for key in store.keys() {
        let template = store.lookup(key)?;
        match validate_used_context(template) {
            Ok(items) => println!("  ✅ {key} ({} context items)", items.len()),
            Err(e) => println!("  ❌ {key}: {e}"),
        }
    }

    for skipped in store.skipped() {
        println!("  ⚠️  skipped {}: {}", skipped.path.display(), skipped.reason);
    }

    Ok(())
}
