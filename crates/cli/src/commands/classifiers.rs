use anyhow::Result;
use serde::Serialize;

use scout_core::services::classify::{default_classifier_registry, DEFAULT_CLASSIFIER};

#[derive(Debug, Serialize)]
pub struct ClassifierInfo {
    pub name: String,
    pub description: String,
    pub default: bool,
}

/// List the classifiers known to this binary.
pub fn list_classifiers_command(json: bool) -> Result<()> {
    let registry = default_classifier_registry();
    let entries: Vec<ClassifierInfo> = registry
        .names()
        .into_iter()
        .map(|name| {
            let description = match name.as_str() {
                "patterns" => {
                    "Flags CPI and PDA-derivation call sites by well-known markers".to_string()
                }
                "skip" => "Skips every function; useful to dry-run extraction".to_string(),
                other => format!("Classifier '{}'", other),
            };
            let default = name == DEFAULT_CLASSIFIER;
            ClassifierInfo { name, description, default }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("Classifiers:");
    for entry in entries {
        let marker = if entry.default { " (default)" } else { "" };
        println!("- {}{}: {}", entry.name, marker, entry.description);
    }

    Ok(())
}
