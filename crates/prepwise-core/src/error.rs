//! Domain error types.
//!
//! These cover precondition violations on evaluation input and the
//! session/store rules the scoring layer enforces. I/O failures travel as
//! `anyhow::Error` with context instead.

use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the evaluation engine and the session layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EvalError {
    /// The question and answer lists handed to the engine differ in length.
    #[error("question/answer count mismatch: {questions} questions, {answers} answers")]
    LengthMismatch { questions: usize, answers: usize },

    /// An answer was paired with a question it does not belong to.
    #[error("answer at position {index} is for question '{answer_id}', expected '{question_id}'")]
    MisalignedAnswer {
        index: usize,
        question_id: String,
        answer_id: String,
    },

    /// A submission referenced a question the bank does not contain.
    #[error("question not found: {0}")]
    QuestionNotFound(String),

    /// The session was already submitted once.
    #[error("interview session {0} has already been submitted")]
    AlreadyCompleted(Uuid),

    /// An evaluation already exists for the session.
    #[error("an evaluation for session {0} already exists")]
    DuplicateEvaluation(Uuid),

    /// The same session id appears more than once in one batch.
    #[error("interview session {0} appears more than once in the batch")]
    DuplicateSession(Uuid),

    /// The session id is not known to the store.
    #[error("interview session not found: {0}")]
    SessionNotFound(Uuid),

    /// A role string outside the supported interview tracks.
    #[error("unknown role: {0} (expected one of frontend, backend, mern, hr, aptitude)")]
    UnknownRole(String),
}
