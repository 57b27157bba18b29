//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use anyhow::{Context, Result};
use std::path::Path;

use prepwise_core::model::{EvaluationRecord, Findings, SkillLevel};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn skill_class(level: SkillLevel) -> &'static str {
    match level {
        SkillLevel::JobReady => "ready",
        SkillLevel::Intermediate => "intermediate",
        SkillLevel::Beginner => "beginner",
    }
}

/// Generate an HTML report from an evaluation record.
pub fn generate_html(record: &EvaluationRecord) -> String {
    let report = &record.report;
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>prepwise evaluation: {} interview</title>\n",
        html_escape(&record.role.title())
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!(
        "<h1>{} Interview Evaluation</h1>\n",
        html_escape(&record.role.title())
    ));
    html.push_str(&format!(
        "<p class=\"meta\">Session <code>{}</code> | {}</p>\n",
        record.session_id,
        record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Score card
    html.push_str("<section class=\"score\">\n");
    html.push_str(&format!(
        "<div class=\"gauge\"><span class=\"percentage\">{}%</span><span class=\"raw\">{}/{} correct</span></div>\n",
        record.percentage, record.score, record.total_questions
    ));
    html.push_str(&format!(
        "<span class=\"badge {}\">{}</span>\n",
        skill_class(report.skill_level),
        report.skill_level
    ));
    html.push_str(&format!(
        "<p class=\"summary\">{}</p>\n",
        html_escape(&report.summary)
    ));
    html.push_str("</section>\n");

    if let Findings::Found { items } = &report.strengths {
        html.push_str(&card("Strengths", "strengths", items));
    }

    match &report.weaknesses {
        Findings::Found { items } => {
            html.push_str(&card("Areas to Improve", "weaknesses", items));
        }
        Findings::NoneFound { message } => {
            html.push_str("<section class=\"card weaknesses\">\n<h2>Areas to Improve</h2>\n");
            html.push_str(&format!(
                "<p class=\"none\">{}</p>\n</section>\n",
                html_escape(message)
            ));
        }
    }

    html.push_str("<section class=\"card improvements\">\n<h2>Suggestions</h2>\n<ol>\n");
    for improvement in &report.improvements {
        html.push_str(&format!("<li>{}</li>\n", html_escape(improvement)));
    }
    html.push_str("</ol>\n</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(record).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

fn card(title: &str, class: &str, items: &[String]) -> String {
    let mut section = format!("<section class=\"card {class}\">\n<h2>{title}</h2>\n<ul>\n");
    for item in items {
        section.push_str(&format!("<li>{}</li>\n", html_escape(item)));
    }
    section.push_str("</ul>\n</section>\n");
    section
}

/// Write an HTML report to a file.
pub fn write_html_report(record: &EvaluationRecord, path: &Path) -> Result<()> {
    let html = generate_html(record);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write report: {}", path.display()))?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --good: #dcfce7; --bad: #fde2e2; --muted: #6b7280; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --good: #064e3b; --bad: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0 auto; max-width: 52rem; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta, .none { color: var(--muted); }
.score { display: flex; flex-wrap: wrap; align-items: center; gap: 1.5rem; }
.gauge { display: flex; flex-direction: column; align-items: center; border: 4px solid var(--border); border-radius: 50%; width: 7rem; height: 7rem; justify-content: center; }
.percentage { font-size: 2rem; font-weight: bold; }
.raw { color: var(--muted); font-size: 0.85rem; }
.badge { padding: 0.3rem 0.9rem; border-radius: 999px; font-weight: bold; }
.ready { background: #22c55e; color: #fff; }
.intermediate { background: #eab308; color: #1a1a1a; }
.beginner { background: #ef4444; color: #fff; }
.summary { flex-basis: 100%; }
.card { border: 1px solid var(--border); border-radius: 8px; padding: 0 1.5rem 1rem; margin: 1.5rem 0; }
.strengths { background: var(--good); }
.weaknesses { background: var(--bad); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
"#;
