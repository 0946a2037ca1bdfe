//! `mockrag classify`: show which template a query selects.

use mockrag_engine::QueryClassifier;
use std::path::Path;

pub fn run(
    config_path: &Path,
    query: &str,
    explain: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    let classifier =
        QueryClassifier::from_config(&config.classifier.rules, &config.templates.default_key);

    let result = classifier.classify(query);
    println!("{}", result.key);

    if explain {
        println!();
        println!("  Fired: {}", result.rule.as_deref().unwrap_or("(default)"));
        println!("  Chain:");
        for (i, rule) in classifier.rules().iter().enumerate() {
            let conditions: Vec<String> = rule
                .conditions
                .iter()
                .map(|c| format!("any of [{}]", c.terms().join(", ")))
                .collect();
            println!(
                "    {}. {} -> {}  when {}",
                i + 1,
                rule.name,
                rule.key,
                conditions.join(" AND ")
            );
        }
        println!(
            "    {}. default -> {}",
            classifier.rules().len() + 1,
            classifier.default_key()
        );
    }

    Ok(())
}
