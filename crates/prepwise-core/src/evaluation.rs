//! Rule-based interview evaluation engine.
//!
//! Turns a completed session's answers into an [`EvaluationReport`]:
//!
//! 1. answers are grouped into topic buckets by `(category, difficulty)`,
//! 2. buckets at or above 70% accuracy become strengths,
//! 3. buckets below 50% with at least two questions become weaknesses,
//! 4. the skill level follows from the overall percentage alone,
//! 5. each weak bucket contributes one suggestion (at most five in total),
//! 6. a summary paragraph ties it together.
//!
//! Evaluation is pure and deterministic. Each call builds its own buckets.

use std::collections::HashMap;

use crate::error::EvalError;
use crate::model::{
    AnsweredQuestion, Category, Difficulty, EvaluationReport, Findings, Question, Role, SkillLevel,
};
use crate::suggestions::{self, SuggestionTable};

/// Accuracy (percent) at or above which a topic counts as a strength.
pub const STRENGTH_THRESHOLD: u32 = 70;
/// Accuracy (percent) below which a topic can count as a weakness.
pub const WEAKNESS_THRESHOLD: u32 = 50;
/// A topic needs at least this many questions to count as a weakness.
pub const MIN_WEAKNESS_SAMPLE: u32 = 2;
/// Upper bound on the number of improvement suggestions.
pub const MAX_IMPROVEMENTS: usize = 5;

/// Shown in place of strengths when no topic qualifies.
pub const NO_STRENGTHS_MESSAGE: &str =
    "You are making progress! Keep practicing to build stronger competencies.";
/// Shown in place of weaknesses when no topic qualifies.
pub const NO_WEAKNESSES_MESSAGE: &str = "No significant weak areas identified. Great job!";

const GENERAL_IMPROVEMENTS: [&str; 2] = [
    "Continue practicing with more interview questions to maintain your skills.",
    "Review advanced concepts to reach the next level of expertise.",
];

const CLOSING_SENTENCE: &str = "Keep practicing and learning to achieve your career goals!";

/// One question paired with whether it was answered correctly.
#[derive(Debug, Clone, Copy)]
pub struct Attempt<'a> {
    pub question: &'a Question,
    pub is_correct: bool,
}

/// Per-topic tally for a single evaluation call.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicBucket {
    pub category: Category,
    pub difficulty: Difficulty,
    /// Display label, e.g. "Technical (Hard)".
    pub label: String,
    pub correct: u32,
    pub total: u32,
    /// Texts of the questions that fell into this bucket.
    pub questions: Vec<String>,
}

impl TopicBucket {
    fn new(category: Category, difficulty: Difficulty) -> Self {
        let label = topic_label(&category, &difficulty);
        Self {
            category,
            difficulty,
            label,
            correct: 0,
            total: 0,
            questions: Vec::new(),
        }
    }

    /// Percentage of correct answers. Buckets always hold at least one question.
    pub fn accuracy(&self) -> f64 {
        self.correct as f64 / self.total as f64 * 100.0
    }

    pub fn is_strength(&self) -> bool {
        self.correct * 100 >= STRENGTH_THRESHOLD * self.total
    }

    pub fn is_weakness(&self) -> bool {
        self.total >= MIN_WEAKNESS_SAMPLE && self.correct * 100 < WEAKNESS_THRESHOLD * self.total
    }
}

/// `"{CategoryLabel} ({DifficultyLabel})"`.
pub fn topic_label(category: &Category, difficulty: &Difficulty) -> String {
    format!("{} ({})", category.label(), difficulty.label())
}

/// Group attempts into buckets, in the order topics are first seen.
pub fn aggregate_topics(attempts: &[Attempt<'_>]) -> Vec<TopicBucket> {
    let mut buckets: Vec<TopicBucket> = Vec::new();
    let mut index: HashMap<(Category, Difficulty), usize> = HashMap::new();

    for attempt in attempts {
        let key = (
            attempt.question.category_or_default(),
            attempt.question.difficulty_or_default(),
        );
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            buckets.push(TopicBucket::new(key.0, key.1));
            buckets.len() - 1
        });

        let bucket = &mut buckets[slot];
        bucket.total += 1;
        bucket.questions.push(attempt.question.text.clone());
        if attempt.is_correct {
            bucket.correct += 1;
        }
    }

    buckets
}

/// Strength lines for every bucket at or above the strength threshold.
pub fn identify_strengths(buckets: &[TopicBucket]) -> Findings {
    let items = buckets
        .iter()
        .filter(|b| b.is_strength())
        .map(|b| {
            format!(
                "Strong performance in {} - {}/{} correct",
                b.label, b.correct, b.total
            )
        })
        .collect();
    Findings::from_items(items, NO_STRENGTHS_MESSAGE)
}

/// Weakness lines for every bucket below the weakness threshold with enough questions.
pub fn identify_weaknesses(buckets: &[TopicBucket]) -> Findings {
    let items = buckets
        .iter()
        .filter(|b| b.is_weakness())
        .map(|b| {
            format!(
                "Needs improvement in {} - only {}/{} correct",
                b.label, b.correct, b.total
            )
        })
        .collect();
    Findings::from_items(items, NO_WEAKNESSES_MESSAGE)
}

/// One suggestion per weak bucket, capped at [`MAX_IMPROVEMENTS`]. Duplicates are kept.
pub fn generate_improvements(
    buckets: &[TopicBucket],
    role: Role,
    table: &SuggestionTable,
) -> Vec<String> {
    let improvements: Vec<String> = buckets
        .iter()
        .filter(|b| b.is_weakness())
        .map(|b| table.suggestion_for(role, &b.category, &b.difficulty))
        .take(MAX_IMPROVEMENTS)
        .collect();

    if improvements.is_empty() {
        GENERAL_IMPROVEMENTS.iter().map(|s| s.to_string()).collect()
    } else {
        improvements
    }
}

/// Inputs to [`generate_summary`].
#[derive(Debug, Clone, Copy)]
pub struct SummaryInput<'a> {
    pub role: Role,
    pub score: u32,
    pub total_questions: u32,
    pub percentage: i32,
    pub skill_level: SkillLevel,
    pub strengths: &'a Findings,
    pub weaknesses: &'a Findings,
}

/// Build the closing summary paragraph.
pub fn generate_summary(input: SummaryInput<'_>) -> String {
    let mut summary = format!(
        "You completed the {} interview with a score of {}/{} ({}%). ",
        input.role.title(),
        input.score,
        input.total_questions,
        input.percentage
    );

    summary.push_str(match input.skill_level {
        SkillLevel::JobReady => {
            "Excellent work! You demonstrate strong competency in this area and appear ready for professional opportunities. "
        }
        SkillLevel::Intermediate => {
            "Good performance! You have a solid foundation with room for growth. "
        }
        SkillLevel::Beginner => {
            "You're on the right path! Focus on building fundamental knowledge to improve your performance. "
        }
    });

    if input.strengths.is_found() {
        let n = input.strengths.count();
        summary.push_str(&format!(
            "Your strengths include {n} key area{}. ",
            plural(n)
        ));
    }

    if input.weaknesses.is_found() {
        let n = input.weaknesses.count();
        summary.push_str(&format!(
            "Focus on improving {n} identified weak area{} to enhance your overall competency. ",
            plural(n)
        ));
    }

    summary.push_str(CLOSING_SENTENCE);
    summary
}

fn plural(n: usize) -> &'static str {
    if n > 1 {
        "s"
    } else {
        ""
    }
}

/// Evaluation engine bound to a suggestion table.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'t> {
    suggestions: &'t SuggestionTable,
}

impl Default for Evaluator<'static> {
    fn default() -> Self {
        Self {
            suggestions: suggestions::builtin(),
        }
    }
}

impl<'t> Evaluator<'t> {
    pub fn new(suggestions: &'t SuggestionTable) -> Self {
        Self { suggestions }
    }

    /// Evaluate parallel question/answer lists.
    ///
    /// `answers[i]` must be the answer to `questions[i]`; a length or id
    /// mismatch is rejected instead of silently re-pairing.
    pub fn evaluate(
        &self,
        questions: &[Question],
        answers: &[AnsweredQuestion],
        role: Role,
        score: u32,
        total_questions: u32,
        percentage: i32,
    ) -> Result<EvaluationReport, EvalError> {
        let attempts = pair_attempts(questions, answers)?;
        Ok(self.evaluate_attempts(&attempts, role, score, total_questions, percentage))
    }

    /// Evaluate already-paired attempts. `score` and `percentage` are taken as given.
    pub fn evaluate_attempts(
        &self,
        attempts: &[Attempt<'_>],
        role: Role,
        score: u32,
        total_questions: u32,
        percentage: i32,
    ) -> EvaluationReport {
        let buckets = aggregate_topics(attempts);
        let strengths = identify_strengths(&buckets);
        let weaknesses = identify_weaknesses(&buckets);
        let skill_level = SkillLevel::from_percentage(percentage);
        let improvements = generate_improvements(&buckets, role, self.suggestions);
        let summary = generate_summary(SummaryInput {
            role,
            score,
            total_questions,
            percentage,
            skill_level,
            strengths: &strengths,
            weaknesses: &weaknesses,
        });

        tracing::debug!(
            %role,
            buckets = buckets.len(),
            strengths = strengths.count(),
            weaknesses = weaknesses.count(),
            %skill_level,
            "evaluation complete"
        );

        EvaluationReport {
            strengths,
            weaknesses,
            skill_level,
            improvements,
            summary,
        }
    }
}

/// Pair `answers[i]` with `questions[i]`, checking both length and ids.
pub fn pair_attempts<'a>(
    questions: &'a [Question],
    answers: &[AnsweredQuestion],
) -> Result<Vec<Attempt<'a>>, EvalError> {
    if questions.len() != answers.len() {
        return Err(EvalError::LengthMismatch {
            questions: questions.len(),
            answers: answers.len(),
        });
    }

    questions
        .iter()
        .zip(answers)
        .enumerate()
        .map(|(index, (question, answer))| {
            if question.id != answer.question_id {
                return Err(EvalError::MisalignedAnswer {
                    index,
                    question_id: question.id.clone(),
                    answer_id: answer.question_id.clone(),
                });
            }
            Ok(Attempt {
                question,
                is_correct: answer.is_correct,
            })
        })
        .collect()
}

/// Evaluate with the built-in suggestion table.
pub fn evaluate(
    questions: &[Question],
    answers: &[AnsweredQuestion],
    role: Role,
    score: u32,
    total_questions: u32,
    percentage: i32,
) -> Result<EvaluationReport, EvalError> {
    Evaluator::default().evaluate(questions, answers, role, score, total_questions, percentage)
}

/// Evaluate paired attempts with the built-in suggestion table.
pub fn evaluate_attempts(
    attempts: &[Attempt<'_>],
    role: Role,
    score: u32,
    total_questions: u32,
    percentage: i32,
) -> EvaluationReport {
    Evaluator::default().evaluate_attempts(attempts, role, score, total_questions, percentage)
}
