//! prepwise-core: Data model, evaluation engine, and scoring.
//!
//! This crate defines the interview data model, the rule-based evaluation
//! engine, session scoring, persistence, and history queries that the rest
//! of prepwise builds on.

pub mod batch;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod history;
pub mod model;
pub mod parser;
pub mod scoring;
pub mod store;
pub mod suggestions;

pub use error::EvalError;
pub use evaluation::{evaluate, evaluate_attempts, Evaluator};
