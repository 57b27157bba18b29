//! The `prepwise validate` command.

use std::path::PathBuf;

use anyhow::Result;

use prepwise_core::parser;

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let banks = if bank_path.is_dir() {
        parser::load_bank_directory(&bank_path)?
    } else {
        vec![parser::parse_question_bank(&bank_path)?]
    };
    anyhow::ensure!(
        !banks.is_empty(),
        "no question banks found in {}",
        bank_path.display()
    );

    for bank in &banks {
        println!(
            "Question bank: {} ({} questions)",
            bank.name,
            bank.questions.len()
        );
    }

    // Validated as one bank so that ids duplicated across files are caught.
    let merged = parser::merge_banks("validate", banks);
    let warnings = parser::validate_question_bank(&merged);
    for w in &warnings {
        let prefix = w
            .question_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("All question banks valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
