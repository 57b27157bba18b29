//! The `prepwise init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("prepwise.toml"), SAMPLE_CONFIG)?;
    write_if_missing(Path::new("question-banks/sample.toml"), SAMPLE_BANK)?;
    write_if_missing(Path::new("submissions/sample.json"), SAMPLE_SUBMISSION)?;

    println!("\nNext steps:");
    println!("  1. Run: prepwise validate --bank question-banks/sample.toml");
    println!("  2. Run: prepwise evaluate --submission submissions/sample.json --save");
    println!("  3. Run: prepwise history");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Created {}", path.display());
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# prepwise configuration

# Where sessions and evaluations are saved by `prepwise evaluate --save`.
store_dir = "./prepwise-data"

# Question bank file or directory.
question_bank = "./question-banks"

# Max submissions evaluated concurrently.
parallelism = 4

# Entries per page for `prepwise history`.
history_page_size = 5
"#;

const SAMPLE_BANK: &str = include_str!("../../samples/question-banks/sample.toml");

const SAMPLE_SUBMISSION: &str = include_str!("../../samples/submissions/sample.json");
