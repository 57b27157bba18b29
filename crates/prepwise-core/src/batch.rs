//! Batch submission orchestrator.
//!
//! Scores and evaluates many submissions concurrently, bounded by a
//! semaphore. A failing submission is reported and skipped; it never stops
//! the rest of the batch. Submissions naming a session already claimed by an
//! earlier entry in the batch are rejected before any work starts.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;

use crate::error::EvalError;
use crate::evaluation::Evaluator;
use crate::model::QuestionBank;
use crate::scoring::{submit, Submission, SubmissionOutcome};
use crate::store::EvaluationStore;

/// Configuration for a batch run.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Maximum submissions processed at once.
    pub parallelism: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { parallelism: 4 }
    }
}

/// A submission plus a display name (usually its file name).
#[derive(Debug, Clone)]
pub struct NamedSubmission {
    pub name: String,
    pub submission: Submission,
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_submission_start(&self, name: &str);
    fn on_submission_complete(&self, name: &str, outcome: &SubmissionOutcome);
    fn on_submission_error(&self, name: &str, error: &str);
    fn on_batch_complete(&self, total: usize, completed: usize, failed: usize, elapsed: Duration);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_submission_start(&self, _: &str) {}
    fn on_submission_complete(&self, _: &str, _: &SubmissionOutcome) {}
    fn on_submission_error(&self, _: &str, _: &str) {}
    fn on_batch_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
}

/// A submission that could not be processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFailure {
    pub name: String,
    pub error: String,
}

/// Everything a batch run produced, in completion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    pub outcomes: Vec<(String, SubmissionOutcome)>,
    pub failures: Vec<BatchFailure>,
    pub duration_ms: u64,
}

/// Process every submission against `bank`, saving results to `store`.
pub async fn evaluate_batch(
    submissions: Vec<NamedSubmission>,
    bank: &QuestionBank,
    store: &dyn EvaluationStore,
    evaluator: &Evaluator<'_>,
    config: &BatchConfig,
    progress: &dyn ProgressReporter,
) -> Result<BatchResult> {
    anyhow::ensure!(config.parallelism >= 1, "parallelism must be at least 1");

    let start = Instant::now();
    let semaphore = Arc::new(Semaphore::new(config.parallelism));
    let mut futures = FuturesUnordered::new();
    let mut failures = Vec::new();
    let mut claimed = HashSet::new();

    for named in submissions {
        if let Some(id) = named.submission.session_id {
            if !claimed.insert(id) {
                let error = EvalError::DuplicateSession(id).to_string();
                tracing::error!("submission {} failed: {error}", named.name);
                progress.on_submission_error(&named.name, &error);
                failures.push(BatchFailure {
                    name: named.name,
                    error,
                });
                continue;
            }
        }

        let semaphore = Arc::clone(&semaphore);
        futures.push(async move {
            let NamedSubmission { name, submission } = named;
            let inner = async {
                let _permit = semaphore
                    .clone()
                    .acquire_owned()
                    .await
                    .map_err(|_| anyhow::anyhow!("semaphore closed"))?;
                progress.on_submission_start(&name);

                if let Some(id) = submission.session_id {
                    if store.load_session(id).await?.is_some_and(|s| s.is_completed()) {
                        return Err(anyhow::Error::from(EvalError::AlreadyCompleted(id)));
                    }
                }

                let mut session = submission.start_session(bank)?;
                let outcome =
                    submit(store, evaluator, &mut session, bank, &submission.answers).await?;
                Ok::<_, anyhow::Error>(outcome)
            };
            let result = inner.await;
            (name, result)
        });
    }

    let total = futures.len() + failures.len();
    let mut outcomes = Vec::new();

    while let Some((name, result)) = futures.next().await {
        match result {
            Ok(outcome) => {
                progress.on_submission_complete(&name, &outcome);
                outcomes.push((name, outcome));
            }
            Err(e) => {
                tracing::error!("submission {name} failed: {e:#}");
                progress.on_submission_error(&name, &format!("{e:#}"));
                failures.push(BatchFailure {
                    name,
                    error: format!("{e:#}"),
                });
            }
        }
    }

    let elapsed = start.elapsed();
    progress.on_batch_complete(total, outcomes.len(), failures.len(), elapsed);

    Ok(BatchResult {
        outcomes,
        failures,
        duration_ms: elapsed.as_millis() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::model::{Category, Difficulty, Question, Role};
    use crate::scoring::SubmittedAnswer;
    use crate::store::MemoryStore;

    fn bank() -> QuestionBank {
        let questions = (0..4)
            .map(|i| Question {
                id: format!("apt-{i}"),
                text: format!("Sequence puzzle {i}"),
                options: vec!["1".into(), "2".into(), "3".into(), "4".into()],
                correct_option: 2,
                difficulty: Some(Difficulty::Medium),
                role: Role::Aptitude,
                category: Some(Category::Aptitude),
                explanation: None,
            })
            .collect();
        QuestionBank {
            id: "apt".into(),
            name: "Aptitude".into(),
            description: String::new(),
            questions,
        }
    }

    fn submission(name: &str, picks: &[(&str, Option<u8>)]) -> NamedSubmission {
        NamedSubmission {
            name: name.into(),
            submission: Submission {
                session_id: None,
                user_id: None,
                role: Role::Aptitude,
                answers: picks
                    .iter()
                    .map(|(id, selected)| SubmittedAnswer {
                        question_id: id.to_string(),
                        selected_option: *selected,
                    })
                    .collect(),
            },
        }
    }

    #[derive(Default)]
    struct CountingReporter {
        completed: AtomicUsize,
        errors: AtomicUsize,
    }

    impl ProgressReporter for CountingReporter {
        fn on_submission_start(&self, _: &str) {}
        fn on_submission_complete(&self, _: &str, _: &SubmissionOutcome) {
            self.completed.fetch_add(1, Ordering::Relaxed);
        }
        fn on_submission_error(&self, _: &str, _: &str) {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
        fn on_batch_complete(&self, _: usize, _: usize, _: usize, _: Duration) {}
    }

    #[tokio::test]
    async fn batch_processes_all_and_isolates_failures() {
        let bank = bank();
        let store = MemoryStore::new();
        let reporter = CountingReporter::default();

        let submissions = vec![
            submission(
                "strong.json",
                &[
                    ("apt-0", Some(2)),
                    ("apt-1", Some(2)),
                    ("apt-2", Some(2)),
                    ("apt-3", Some(0)),
                ],
            ),
            submission("weak.json", &[("apt-0", Some(0)), ("apt-1", None)]),
            submission("broken.json", &[("missing", Some(0))]),
        ];

        let result = evaluate_batch(
            submissions,
            &bank,
            &store,
            &Evaluator::default(),
            &BatchConfig { parallelism: 2 },
            &reporter,
        )
        .await
        .unwrap();

        assert_eq!(result.outcomes.len(), 2);
        assert_eq!(result.failures.len(), 1);
        assert_eq!(result.failures[0].name, "broken.json");
        assert!(result.failures[0].error.contains("question not found: missing"));
        assert_eq!(reporter.completed.load(Ordering::Relaxed), 2);
        assert_eq!(reporter.errors.load(Ordering::Relaxed), 1);

        let (_, strong) = result
            .outcomes
            .iter()
            .find(|(name, _)| name == "strong.json")
            .unwrap();
        assert_eq!(strong.percentage, 75);
        let report = strong.evaluation.as_ref().unwrap();
        assert_eq!(
            report.strengths.lines(),
            vec!["Strong performance in Aptitude & Reasoning (Medium) - 3/4 correct"]
        );

        assert_eq!(store.list_evaluations().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn completed_session_is_not_resubmitted() {
        let bank = bank();
        let store = MemoryStore::new();
        let mut named = submission("again.json", &[("apt-0", Some(2))]);
        let id = uuid::Uuid::new_v4();
        named.submission.session_id = Some(id);

        let run = |named: NamedSubmission| {
            let store = &store;
            let bank = &bank;
            async move {
                evaluate_batch(
                    vec![named],
                    bank,
                    store,
                    &Evaluator::default(),
                    &BatchConfig::default(),
                    &NoopReporter,
                )
                .await
                .unwrap()
            }
        };

        let first = run(named.clone()).await;
        assert_eq!(first.outcomes[0].1.session_id, id);

        let second = run(named).await;
        assert!(second.outcomes.is_empty());
        assert!(second.failures[0].error.contains("already been submitted"));
    }

    #[tokio::test]
    async fn one_session_id_is_scored_once_per_batch() {
        let bank = bank();
        for _ in 0..20 {
            let dir = tempfile::tempdir().unwrap();
            let store = crate::store::JsonDirStore::new(dir.path());
            let id = uuid::Uuid::new_v4();

            let mut all_wrong = submission(
                "first.json",
                &[("apt-0", Some(0)), ("apt-1", Some(0)), ("apt-2", Some(0))],
            );
            all_wrong.submission.session_id = Some(id);
            let mut all_right = submission(
                "second.json",
                &[("apt-0", Some(2)), ("apt-1", Some(2)), ("apt-2", Some(2))],
            );
            all_right.submission.session_id = Some(id);

            let result = evaluate_batch(
                vec![all_wrong, all_right],
                &bank,
                &store,
                &Evaluator::default(),
                &BatchConfig { parallelism: 2 },
                &NoopReporter,
            )
            .await
            .unwrap();

            assert_eq!(result.outcomes.len(), 1);
            assert_eq!(result.outcomes[0].0, "first.json");
            assert_eq!(result.failures.len(), 1);
            assert_eq!(result.failures[0].name, "second.json");
            assert!(result.failures[0].error.contains("more than once"));

            let session = store.load_session(id).await.unwrap().unwrap();
            let record = store.load_evaluation(id).await.unwrap().unwrap();
            assert_eq!(session.score, 0);
            assert_eq!(record.score, session.score);
        }
    }

    #[tokio::test]
    async fn zero_parallelism_is_rejected() {
        let result = evaluate_batch(
            vec![],
            &bank(),
            &MemoryStore::new(),
            &Evaluator::default(),
            &BatchConfig { parallelism: 0 },
            &NoopReporter,
        )
        .await;
        assert!(result.is_err());
    }
}
