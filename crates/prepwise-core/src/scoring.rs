//! Session scoring and submission.
//!
//! Correctness is decided exactly once here, and the same flag feeds both
//! the score and the evaluation engine.

use std::collections::HashMap;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EvalError;
use crate::evaluation::{Attempt, Evaluator};
use crate::model::{
    round_percentage, AnsweredQuestion, EvaluationRecord, EvaluationReport, InterviewSession,
    Question, QuestionBank, Role, SessionQuestion, SessionStatus,
};
use crate::store::EvaluationStore;

/// An answer as submitted by the candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedAnswer {
    pub question_id: String,
    #[serde(default)]
    pub selected_option: Option<u8>,
}

/// A full submission: the role, optional identifiers, and the answers.
///
/// The session's questions are the answers' question ids, in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default)]
    pub session_id: Option<Uuid>,
    #[serde(default)]
    pub user_id: Option<String>,
    pub role: Role,
    pub answers: Vec<SubmittedAnswer>,
}

impl Submission {
    /// Start a session for this submission, checking every question exists in `bank`.
    pub fn start_session(&self, bank: &QuestionBank) -> Result<InterviewSession, EvalError> {
        let ids = self
            .answers
            .iter()
            .map(|a| {
                bank.get(&a.question_id)
                    .map(|q| q.id.clone())
                    .ok_or_else(|| EvalError::QuestionNotFound(a.question_id.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut session = InterviewSession::start(self.role, ids, self.user_id.clone());
        if let Some(id) = self.session_id {
            session.id = id;
        }
        Ok(session)
    }
}

/// One session question with its resolved answer.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredAnswer {
    pub question: Question,
    pub selected_option: Option<u8>,
    pub is_correct: bool,
}

/// Result of scoring a submission against its session questions.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSession {
    /// One entry per session question, in session order.
    pub answers: Vec<ScoredAnswer>,
    pub score: u32,
    pub total_questions: u32,
    /// Submitted answers that matched the correct option.
    pub correct_answers: u32,
    /// Submitted answers that did not (including explicit skips).
    pub wrong_answers: u32,
    /// Session questions with no submitted answer at all.
    pub unanswered: u32,
    pub percentage: i32,
}

impl ScoredSession {
    /// Questions in session order.
    pub fn questions(&self) -> Vec<Question> {
        self.answers.iter().map(|a| a.question.clone()).collect()
    }

    /// Answers with their correctness flag, aligned with [`Self::questions`].
    pub fn answered(&self) -> Vec<AnsweredQuestion> {
        self.answers
            .iter()
            .map(|a| AnsweredQuestion {
                question_id: a.question.id.clone(),
                selected_option: a.selected_option,
                is_correct: a.is_correct,
            })
            .collect()
    }

    /// Paired attempts for the evaluation engine.
    pub fn attempts(&self) -> Vec<Attempt<'_>> {
        self.answers
            .iter()
            .map(|a| Attempt {
                question: &a.question,
                is_correct: a.is_correct,
            })
            .collect()
    }
}

/// Score submitted answers against the session's questions.
///
/// Answers are matched by question id. Answers for questions outside the
/// session are ignored.
pub fn score_submission(questions: &[Question], answers: &[SubmittedAnswer]) -> ScoredSession {
    let submitted: HashMap<&str, Option<u8>> = answers
        .iter()
        .map(|a| (a.question_id.as_str(), a.selected_option))
        .collect();

    for a in answers {
        if !questions.iter().any(|q| q.id == a.question_id) {
            tracing::debug!(question = %a.question_id, "ignoring answer for question outside session");
        }
    }

    let mut correct_answers = 0u32;
    let mut wrong_answers = 0u32;
    let mut unanswered = 0u32;

    let scored: Vec<ScoredAnswer> = questions
        .iter()
        .map(|q| {
            let (selected_option, is_correct) = match submitted.get(q.id.as_str()) {
                Some(&selected) => {
                    let is_correct = q.is_correct(selected);
                    if is_correct {
                        correct_answers += 1;
                    } else {
                        wrong_answers += 1;
                    }
                    (selected, is_correct)
                }
                None => {
                    unanswered += 1;
                    (None, false)
                }
            };
            ScoredAnswer {
                question: q.clone(),
                selected_option,
                is_correct,
            }
        })
        .collect();

    let total_questions = questions.len() as u32;
    ScoredSession {
        answers: scored,
        score: correct_answers,
        total_questions,
        correct_answers,
        wrong_answers,
        unanswered,
        percentage: round_percentage(correct_answers, total_questions),
    }
}

/// What a submission returns to the candidate.
///
/// `evaluation` is `None` when the report could not be produced or stored;
/// the score is reported regardless.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub session_id: Uuid,
    pub role: Role,
    pub score: u32,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub wrong_answers: u32,
    /// Session questions the submission had no answer for.
    #[serde(default)]
    pub unanswered: u32,
    pub percentage: i32,
    pub status: SessionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<EvaluationReport>,
}

/// Resolve a session's questions from the bank, in session order.
pub fn session_questions(
    session: &InterviewSession,
    bank: &QuestionBank,
) -> Result<Vec<Question>, EvalError> {
    session
        .questions
        .iter()
        .map(|sq| {
            bank.get(&sq.question_id)
                .cloned()
                .ok_or_else(|| EvalError::QuestionNotFound(sq.question_id.clone()))
        })
        .collect()
}

/// Score a session, mark it completed, evaluate it, and persist both.
///
/// Fails only if the session was already submitted, references unknown
/// questions, or cannot be saved. Evaluation problems are logged and leave
/// `evaluation` empty.
pub async fn submit(
    store: &dyn EvaluationStore,
    evaluator: &Evaluator<'_>,
    session: &mut InterviewSession,
    bank: &QuestionBank,
    answers: &[SubmittedAnswer],
) -> Result<SubmissionOutcome> {
    if session.is_completed() {
        return Err(EvalError::AlreadyCompleted(session.id).into());
    }

    let questions = session_questions(session, bank)?;
    let scored = score_submission(&questions, answers);

    // The caller's session only changes once the completed copy is stored.
    let mut completed = session.clone();
    completed.questions = scored
        .answers
        .iter()
        .map(|a| SessionQuestion {
            question_id: a.question.id.clone(),
            selected_option: a.selected_option,
        })
        .collect();
    completed.score = scored.score;
    completed.status = SessionStatus::Completed;
    store.save_session(&completed).await?;
    *session = completed;

    tracing::info!(
        session = %session.id,
        role = %session.role,
        score = scored.score,
        total = scored.total_questions,
        percentage = scored.percentage,
        "interview submitted"
    );

    let evaluation = match evaluate_and_store(store, evaluator, session, &scored).await {
        Ok(report) => {
            tracing::info!(session = %session.id, skill_level = %report.skill_level, "evaluation generated and saved");
            Some(report)
        }
        Err(e) => {
            tracing::error!(session = %session.id, "error generating evaluation: {e:#}");
            None
        }
    };

    Ok(SubmissionOutcome {
        session_id: session.id,
        role: session.role,
        score: scored.score,
        total_questions: scored.total_questions,
        correct_answers: scored.correct_answers,
        wrong_answers: scored.wrong_answers,
        unanswered: scored.unanswered,
        percentage: scored.percentage,
        status: session.status,
        evaluation,
    })
}

/// Load a started session from the store and [`submit`] it.
pub async fn submit_by_id(
    store: &dyn EvaluationStore,
    evaluator: &Evaluator<'_>,
    session_id: Uuid,
    bank: &QuestionBank,
    answers: &[SubmittedAnswer],
) -> Result<SubmissionOutcome> {
    let mut session = store
        .load_session(session_id)
        .await?
        .ok_or(EvalError::SessionNotFound(session_id))?;
    submit(store, evaluator, &mut session, bank, answers).await
}

async fn evaluate_and_store(
    store: &dyn EvaluationStore,
    evaluator: &Evaluator<'_>,
    session: &InterviewSession,
    scored: &ScoredSession,
) -> Result<EvaluationReport> {
    let report = evaluator.evaluate(
        &scored.questions(),
        &scored.answered(),
        session.role,
        scored.score,
        scored.total_questions,
        scored.percentage,
    )?;

    store
        .save_evaluation(&EvaluationRecord {
            session_id: session.id,
            role: session.role,
            score: scored.score,
            total_questions: scored.total_questions,
            percentage: scored.percentage,
            report: report.clone(),
            created_at: Utc::now(),
        })
        .await?;

    Ok(report)
}
