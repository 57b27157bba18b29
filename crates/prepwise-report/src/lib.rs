//! prepwise-report: Markdown and HTML rendering of evaluation records.

pub mod html;
pub mod markdown;

#[cfg(test)]
pub(crate) mod fixtures {
    use prepwise_core::model::{EvaluationRecord, EvaluationReport, Findings, Role, SkillLevel};

    pub fn record(strengths: Vec<String>) -> EvaluationRecord {
        EvaluationRecord {
            session_id: uuid::Uuid::nil(),
            role: Role::Frontend,
            score: 4,
            total_questions: 5,
            percentage: 80,
            report: EvaluationReport {
                strengths: Findings::from_items(
                    strengths,
                    "You are making progress! Keep practicing to build stronger competencies.",
                ),
                weaknesses: Findings::from_items(
                    vec!["Needs improvement in Technical (Hard) - only 0/2 correct".into()],
                    "No significant weak areas identified. Great job!",
                ),
                skill_level: SkillLevel::JobReady,
                improvements: vec![
                    "Study advanced JS: closures, prototypes, event loop <& async>".into(),
                ],
                summary: "You completed the Frontend interview with a score of 4/5 (80%).".into(),
            },
            created_at: chrono::Utc::now(),
        }
    }
}
