use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use scout_core::extract::FunctionExtractor;

/// Extract and print the functions of a single source file.
pub fn extract_command(file: &Path, json: bool) -> Result<()> {
    let source = fs::read_to_string(file)
        .with_context(|| format!("Failed to read source file {}", file.display()))?;
    let functions = FunctionExtractor::rust()
        .extract(&source)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&functions)?);
        return Ok(());
    }

    println!("Functions in {} ({}):", file.display(), functions.len());
    if functions.is_empty() {
        println!("  (none)");
        return Ok(());
    }
    for func in functions {
        println!("  - {} [lines {}-{}]", func.name, func.start_line, func.end_line);
        for attr in &func.attributes {
            println!("      attr: {attr}");
        }
        if let Some(doc) = &func.docstring {
            for line in doc.lines() {
                println!("      doc:  {line}");
            }
        }
    }

    Ok(())
}
