//! The `prepwise evaluate` command.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use prepwise_core::batch::{evaluate_batch, BatchConfig, NamedSubmission, ProgressReporter};
use prepwise_core::config::load_config_from;
use prepwise_core::model::{EvaluationRecord, Findings};
use prepwise_core::parser;
use prepwise_core::scoring::{Submission, SubmissionOutcome};
use prepwise_core::store::{EvaluationStore, JsonDirStore, MemoryStore};
use prepwise_core::Evaluator;
use prepwise_report::html::write_html_report;
use prepwise_report::markdown::to_markdown;

const FORMATS: [&str; 4] = ["text", "json", "markdown", "html"];

/// Console progress reporter.
struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_submission_start(&self, name: &str) {
        eprintln!("  Evaluating: {name}");
    }

    fn on_submission_complete(&self, name: &str, outcome: &SubmissionOutcome) {
        eprintln!(
            "  Done: {name} {}/{} ({}%)",
            outcome.score, outcome.total_questions, outcome.percentage
        );
    }

    fn on_submission_error(&self, name: &str, error: &str) {
        eprintln!("  ERROR: {name}: {error}");
    }

    fn on_batch_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration) {
        eprintln!(
            "\nComplete: {completed}/{total} succeeded, {failed} failed ({:.1}s)\n",
            elapsed.as_secs_f64()
        );
    }
}

#[derive(Serialize)]
struct JsonEntry<'a> {
    file: &'a str,
    #[serde(flatten)]
    outcome: &'a SubmissionOutcome,
}

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    submission_path: PathBuf,
    bank_path: Option<PathBuf>,
    format: String,
    output: Option<PathBuf>,
    save: bool,
    parallelism: Option<usize>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        FORMATS.contains(&format.as_str()),
        "unknown format '{format}' (expected one of: {})",
        FORMATS.join(", ")
    );

    let config = load_config_from(config_path.as_deref())?;
    let parallelism = parallelism.unwrap_or(config.parallelism);
    anyhow::ensure!(parallelism >= 1, "parallelism must be at least 1");

    let bank_path = bank_path.unwrap_or_else(|| config.question_bank.clone());
    let bank = parser::load_bank(&bank_path)?;
    let submissions = load_submissions(&submission_path)?;

    eprintln!(
        "prepwise v{}: evaluating {} submission(s) against {} ({} questions)\n",
        env!("CARGO_PKG_VERSION"),
        submissions.len(),
        bank.name,
        bank.questions.len()
    );

    let store: Box<dyn EvaluationStore> = if save {
        Box::new(JsonDirStore::new(config.store_dir.clone()))
    } else {
        Box::new(MemoryStore::new())
    };

    let mut result = evaluate_batch(
        submissions,
        &bank,
        store.as_ref(),
        &Evaluator::default(),
        &BatchConfig { parallelism },
        &ConsoleReporter,
    )
    .await?;
    result.outcomes.sort_by(|a, b| a.0.cmp(&b.0));

    match format.as_str() {
        "json" => {
            let entries: Vec<JsonEntry<'_>> = result
                .outcomes
                .iter()
                .map(|(file, outcome)| JsonEntry { file, outcome })
                .collect();
            let json = serde_json::to_string_pretty(&entries)?;
            match &output {
                Some(dir) => {
                    std::fs::create_dir_all(dir)?;
                    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
                    let path = dir.join(format!("results-{timestamp}.json"));
                    std::fs::write(&path, json)?;
                    eprintln!("Results saved to: {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        "text" => {
            for (name, outcome) in &result.outcomes {
                print_outcome(name, outcome);
            }
        }
        _ => {
            for (name, outcome) in &result.outcomes {
                let Some(record) = store.load_evaluation(outcome.session_id).await? else {
                    eprintln!("No evaluation available for {name}, skipping report.");
                    continue;
                };
                write_report(&format, name, &record, output.as_deref())?;
            }
        }
    }

    if save {
        eprintln!("Saved to store: {}", config.store_dir.display());
    }

    if !result.failures.is_empty() {
        anyhow::bail!("{} submission(s) failed", result.failures.len());
    }

    Ok(())
}

fn write_report(
    format: &str,
    name: &str,
    record: &EvaluationRecord,
    output: Option<&Path>,
) -> Result<()> {
    let stem = Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| record.session_id.to_string());

    if format == "html" {
        let dir = output.unwrap_or_else(|| Path::new("prepwise-reports"));
        let path = dir.join(format!("{stem}.html"));
        write_html_report(record, &path)?;
        eprintln!("HTML report: {}", path.display());
        return Ok(());
    }

    let markdown = to_markdown(record);
    match output {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let path = dir.join(format!("{stem}.md"));
            std::fs::write(&path, markdown)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Markdown report: {}", path.display());
        }
        None => println!("{markdown}"),
    }
    Ok(())
}

/// Read one submission file, or every `.json` file in a directory (sorted by name).
fn load_submissions(path: &Path) -> Result<Vec<NamedSubmission>> {
    let files = if path.is_dir() {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(path)
            .with_context(|| format!("failed to read directory: {}", path.display()))?
        {
            let file = entry?.path();
            if file.extension().is_some_and(|ext| ext == "json") {
                files.push(file);
            }
        }
        files.sort();
        anyhow::ensure!(
            !files.is_empty(),
            "no submission files found in {}",
            path.display()
        );
        files
    } else {
        vec![path.to_path_buf()]
    };

    files
        .iter()
        .map(|file| {
            let content = std::fs::read_to_string(file)
                .with_context(|| format!("failed to read submission: {}", file.display()))?;
            let submission: Submission = serde_json::from_str(&content)
                .with_context(|| format!("failed to parse submission: {}", file.display()))?;
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.display().to_string());
            Ok(NamedSubmission { name, submission })
        })
        .collect()
}

fn print_outcome(name: &str, outcome: &SubmissionOutcome) {
    println!(
        "{name}: {} interview, {}/{} correct ({}%)",
        outcome.role.title(),
        outcome.score,
        outcome.total_questions,
        outcome.percentage
    );
    if outcome.unanswered > 0 {
        println!("  Unanswered: {} question(s)", outcome.unanswered);
    }

    let Some(report) = &outcome.evaluation else {
        println!("  Evaluation unavailable, see the log for details.\n");
        return;
    };

    println!("  Skill level: {}", report.skill_level);

    if let Findings::Found { items } = &report.strengths {
        println!("  Strengths:");
        for item in items {
            println!("    - {item}");
        }
    }

    println!("  Weaknesses:");
    for line in report.weaknesses.lines() {
        println!("    - {line}");
    }

    println!("  Suggestions:");
    for (i, improvement) in report.improvements.iter().enumerate() {
        println!("    {}. {improvement}", i + 1);
    }

    println!("  Summary: {}\n", report.summary);
}
