//! Markdown report renderer.

use std::fmt::Write;

use prepwise_core::model::{EvaluationRecord, Findings};

/// Render an evaluation record as a Markdown document.
pub fn to_markdown(record: &EvaluationRecord) -> String {
    let report = &record.report;
    let mut md = String::new();

    let _ = writeln!(md, "# {} Interview Evaluation\n", record.role.title());
    let _ = writeln!(md, "| | |");
    let _ = writeln!(md, "|---|---|");
    let _ = writeln!(md, "| Session | `{}` |", record.session_id);
    let _ = writeln!(
        md,
        "| Score | {}/{} ({}%) |",
        record.score, record.total_questions, record.percentage
    );
    let _ = writeln!(md, "| Skill level | **{}** |", report.skill_level);
    let _ = writeln!(
        md,
        "| Evaluated | {} |\n",
        record.created_at.format("%Y-%m-%d %H:%M UTC")
    );

    let _ = writeln!(md, "## Summary\n\n{}\n", report.summary);

    if let Findings::Found { items } = &report.strengths {
        let _ = writeln!(md, "## Strengths\n");
        for item in items {
            let _ = writeln!(md, "- {item}");
        }
        md.push('\n');
    }

    let _ = writeln!(md, "## Areas to Improve\n");
    match &report.weaknesses {
        Findings::Found { items } => {
            for item in items {
                let _ = writeln!(md, "- {item}");
            }
        }
        Findings::NoneFound { message } => {
            let _ = writeln!(md, "_{message}_");
        }
    }
    md.push('\n');

    let _ = writeln!(md, "## Suggestions\n");
    for (i, improvement) in report.improvements.iter().enumerate() {
        let _ = writeln!(md, "{}. {improvement}", i + 1);
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::record;

    #[test]
    fn markdown_lists_all_sections() {
        let md = to_markdown(&record(vec![
            "Strong performance in Technical (Easy) - 2/2 correct".into(),
        ]));

        assert!(md.starts_with("# Frontend Interview Evaluation"));
        assert!(md.contains("| Score | 4/5 (80%) |"));
        assert!(md.contains("| Skill level | **Job Ready** |"));
        assert!(md.contains("## Strengths\n\n- Strong performance in Technical (Easy) - 2/2 correct"));
        assert!(md.contains("- Needs improvement in Technical (Hard) - only 0/2 correct"));
        assert!(md.contains("1. Study advanced JS"));
    }

    #[test]
    fn markdown_omits_strengths_when_none_found() {
        let md = to_markdown(&record(vec![]));
        assert!(!md.contains("## Strengths"));
        assert!(!md.contains("You are making progress!"));
        assert!(md.contains("## Areas to Improve"));
    }
}
