//! TOML question bank parser.
//!
//! Loads question banks from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Category, Difficulty, Question, QuestionBank, Role};

/// Intermediate TOML structure for parsing question bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    #[serde(alias = "text")]
    question: String,
    options: Vec<String>,
    #[serde(alias = "correct_option")]
    answer: u8,
    #[serde(default)]
    difficulty: Option<String>,
    role: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    explanation: Option<String>,
}

/// Parse a single TOML file into a `QuestionBank`.
pub fn parse_question_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank file: {}", path.display()))?;

    parse_question_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank` (useful for testing).
pub fn parse_question_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let role: Role = q
                .role
                .parse()
                .with_context(|| format!("question '{}' in {}", q.id, source_path.display()))?;

            Ok(Question {
                id: q.id,
                text: q.question,
                options: q.options,
                correct_option: q.answer,
                difficulty: q.difficulty.map(Difficulty::from),
                role,
                category: q.category.map(Category::from),
                explanation: q.explanation,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(QuestionBank {
        id: parsed.bank.id,
        name: parsed.bank.name,
        description: parsed.bank.description,
        questions,
    })
}

/// Recursively load all `.toml` question bank files from a directory, sorted by path.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<QuestionBank>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        paths.push(entry?.path());
    }
    paths.sort();

    let mut banks = Vec::new();
    for path in paths {
        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_question_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {e:#}", path.display());
                }
            }
        }
    }

    Ok(banks)
}

/// Load a bank from a file, or merge every bank found in a directory.
pub fn load_bank(path: &Path) -> Result<QuestionBank> {
    if !path.is_dir() {
        return parse_question_bank(path);
    }

    let banks = load_bank_directory(path)?;
    anyhow::ensure!(
        !banks.is_empty(),
        "no question banks found in {}",
        path.display()
    );

    let id = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "questions".to_string());
    Ok(merge_banks(id, banks))
}

/// Concatenate banks into one, keeping question order.
pub fn merge_banks(id: impl Into<String>, banks: Vec<QuestionBank>) -> QuestionBank {
    let mut merged = QuestionBank {
        id: id.into(),
        name: banks
            .iter()
            .map(|b| b.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        description: String::new(),
        questions: Vec::new(),
    };
    for bank in banks {
        merged.questions.extend(bank.questions);
    }
    merged
}

/// A warning from question bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn question(id: &str, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(id.to_string()),
            message: message.into(),
        }
    }
}

/// Number of options every question is expected to offer.
pub const EXPECTED_OPTIONS: usize = 4;

/// Validate a question bank for common issues.
pub fn validate_question_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_ids = HashSet::new();
    for q in &bank.questions {
        if !seen_ids.insert(&q.id) {
            warnings.push(ValidationWarning::question(
                &q.id,
                format!("duplicate question ID: {}", q.id),
            ));
        }
    }

    for q in &bank.questions {
        if q.text.trim().is_empty() {
            warnings.push(ValidationWarning::question(&q.id, "question text is empty"));
        }
        if q.options.len() != EXPECTED_OPTIONS {
            warnings.push(ValidationWarning::question(
                &q.id,
                format!(
                    "expected {EXPECTED_OPTIONS} options, found {}",
                    q.options.len()
                ),
            ));
        }
        if q.correct_option as usize >= q.options.len() {
            warnings.push(ValidationWarning::question(
                &q.id,
                format!(
                    "correct option index {} is out of range",
                    q.correct_option
                ),
            ));
        }
        if q.category.is_none() {
            warnings.push(ValidationWarning::question(
                &q.id,
                "no category; it will be evaluated as \"general\"",
            ));
        }
        if q.difficulty.is_none() {
            warnings.push(ValidationWarning::question(
                &q.id,
                "no difficulty; it will be evaluated as \"medium\"",
            ));
        }
    }

    for role in Role::ALL {
        if bank.for_role(role).next().is_none() {
            warnings.push(ValidationWarning {
                question_id: None,
                message: format!("no questions for role '{role}'"),
            });
        }
    }

    warnings
}
