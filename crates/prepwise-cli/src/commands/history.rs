//! The `prepwise history` command.

use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::{Cell, Table};

use prepwise_core::config::load_config_from;
use prepwise_core::history::{history, recent, HistoryEntry, HistoryQuery};
use prepwise_core::store::{EvaluationStore, JsonDirStore};

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    page: usize,
    limit: Option<usize>,
    min_score: Option<u32>,
    since: Option<NaiveDate>,
    until: Option<NaiveDate>,
    show_recent: bool,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        format == "text" || format == "json",
        "unknown format '{format}' (expected text or json)"
    );

    let config = load_config_from(config_path.as_deref())?;
    let limit = limit.unwrap_or(config.history_page_size);

    let store = JsonDirStore::new(config.store_dir.clone());
    let sessions = store.list_sessions().await?;
    let evaluations = store.list_evaluations().await?;
    tracing::debug!(
        sessions = sessions.len(),
        evaluations = evaluations.len(),
        "loaded store"
    );

    if show_recent {
        let entries = recent(&sessions, &evaluations, limit);
        if format == "json" {
            println!("{}", serde_json::to_string_pretty(&entries)?);
        } else if entries.is_empty() {
            println!("No completed interviews found.");
        } else {
            println!("{}", entries_table(&entries));
        }
        return Ok(());
    }

    let query = HistoryQuery {
        page,
        limit,
        min_score,
        start_date: since,
        end_date: until,
    };
    let result = history(&sessions, &evaluations, &query);

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if result.interviews.is_empty() {
        println!("No completed interviews found.");
        return Ok(());
    }

    println!("{}", entries_table(&result.interviews));
    println!(
        "Page {} of {} ({} interviews)",
        result.page, result.total_pages, result.total_items
    );

    Ok(())
}

fn entries_table(entries: &[HistoryEntry]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "Date",
        "Role",
        "Score",
        "Percentage",
        "Skill Level",
        "Session",
    ]);

    for entry in entries {
        table.add_row(vec![
            Cell::new(entry.created_at.format("%Y-%m-%d %H:%M")),
            Cell::new(entry.role.title()),
            Cell::new(format!("{}/{}", entry.score, entry.total_questions)),
            Cell::new(format!("{}%", entry.percentage)),
            Cell::new(&entry.skill_level),
            Cell::new(entry.session_id),
        ]);
    }

    table
}
