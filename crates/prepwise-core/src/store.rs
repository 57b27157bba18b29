//! Persistence for interview sessions and their evaluations.
//!
//! [`EvaluationStore`] is the seam between the scoring layer and whatever
//! holds the records. Two implementations ship here: a directory of JSON
//! files and an in-memory map.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::EvalError;
use crate::model::{EvaluationRecord, InterviewSession};

/// Storage backend for sessions and evaluation records.
///
/// At most one evaluation may exist per session; a second
/// `save_evaluation` for the same session fails with
/// [`EvalError::DuplicateEvaluation`].
#[async_trait]
pub trait EvaluationStore: Send + Sync {
    /// Insert or replace a session.
    async fn save_session(&self, session: &InterviewSession) -> Result<()>;

    async fn load_session(&self, id: Uuid) -> Result<Option<InterviewSession>>;

    /// All sessions, oldest first.
    async fn list_sessions(&self) -> Result<Vec<InterviewSession>>;

    /// Insert an evaluation record; never overwrites.
    async fn save_evaluation(&self, record: &EvaluationRecord) -> Result<()>;

    async fn load_evaluation(&self, session_id: Uuid) -> Result<Option<EvaluationRecord>>;

    /// All evaluation records, oldest first.
    async fn list_evaluations(&self) -> Result<Vec<EvaluationRecord>>;
}

// ---------------------------------------------------------------------------
// JSON directory store
// ---------------------------------------------------------------------------

/// Stores each record as a pretty-printed JSON file.
///
/// Layout: `<root>/sessions/<id>.json` and `<root>/evaluations/<session_id>.json`.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn sessions_dir(&self) -> PathBuf {
        self.root.join("sessions")
    }

    fn evaluations_dir(&self) -> PathBuf {
        self.root.join("evaluations")
    }

    fn record_path(dir: &Path, id: Uuid) -> PathBuf {
        dir.join(format!("{id}.json"))
    }
}

async fn read_record<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => {
            let record = serde_json::from_str(&content)
                .with_context(|| format!("failed to parse {}", path.display()))?;
            Ok(Some(record))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}

async fn read_all<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e).with_context(|| format!("failed to list {}", dir.display())),
    };

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut records = Vec::with_capacity(paths.len());
    for path in paths {
        match read_record::<T>(&path).await {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(e) => tracing::warn!("skipping unreadable record: {e:#}"),
        }
    }
    Ok(records)
}

/// Write `contents` to `path`, failing with `AlreadyExists` if it is taken.
///
/// The bytes land in a temporary sibling first and are hard-linked into
/// place, so `path` either holds a complete record or does not exist.
async fn write_new(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension(format!("{}.tmp", Uuid::new_v4()));
    let result = async {
        tokio::fs::write(&tmp, contents).await?;
        tokio::fs::hard_link(&tmp, path).await
    }
    .await;
    if let Err(e) = tokio::fs::remove_file(&tmp).await {
        if e.kind() != ErrorKind::NotFound {
            tracing::warn!("failed to remove {}: {e}", tmp.display());
        }
    }
    result
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize record")
}

#[async_trait]
impl EvaluationStore for JsonDirStore {
    async fn save_session(&self, session: &InterviewSession) -> Result<()> {
        let dir = self.sessions_dir();
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("failed to create {}", dir.display()))?;
        let path = Self::record_path(&dir, session.id);
        tokio::fs::write(&path, to_json(session)?)
            .await
            .with_context(|| format!("failed to write session to {}", path.display()))?;
        tracing::debug!(session = %session.id, "session saved");
        Ok(())
    }

    async fn load_session(&self, id: Uuid) -> Result<Option<InterviewSession>> {
        read_record(&Self::record_path(&self.sessions_dir(), id)).await
    }

    async fn list_sessions(&self) -> Result<Vec<InterviewSession>> {
        let mut sessions: Vec<InterviewSession> = read_all(&self.sessions_dir()).await?;
        sessions.sort_by_key(|s| s.created_at);
        Ok(sessions)
    }

    async fn save_evaluation(&self, record: &EvaluationRecord) -> Result<()> {
        let dir = self.evaluations_dir();
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("failed to create {}", dir.display()))?;
        let path = Self::record_path(&dir, record.session_id);
        let json = to_json(record)?;

        match write_new(&path, json.as_bytes()).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(EvalError::DuplicateEvaluation(record.session_id).into());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to write evaluation to {}", path.display()))
            }
        }
        tracing::debug!(session = %record.session_id, "evaluation saved");
        Ok(())
    }

    async fn load_evaluation(&self, session_id: Uuid) -> Result<Option<EvaluationRecord>> {
        read_record(&Self::record_path(&self.evaluations_dir(), session_id)).await
    }

    async fn list_evaluations(&self) -> Result<Vec<EvaluationRecord>> {
        let mut records: Vec<EvaluationRecord> = read_all(&self.evaluations_dir()).await?;
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Keeps everything in process memory. Used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: Mutex<HashMap<Uuid, InterviewSession>>,
    evaluations: Mutex<HashMap<Uuid, EvaluationRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EvaluationStore for MemoryStore {
    async fn save_session(&self, session: &InterviewSession) -> Result<()> {
        self.sessions
            .lock()
            .await
            .insert(session.id, session.clone());
        Ok(())
    }

    async fn load_session(&self, id: Uuid) -> Result<Option<InterviewSession>> {
        Ok(self.sessions.lock().await.get(&id).cloned())
    }

    async fn list_sessions(&self) -> Result<Vec<InterviewSession>> {
        let mut sessions: Vec<_> = self.sessions.lock().await.values().cloned().collect();
        sessions.sort_by_key(|s| s.created_at);
        Ok(sessions)
    }

    async fn save_evaluation(&self, record: &EvaluationRecord) -> Result<()> {
        let mut evaluations = self.evaluations.lock().await;
        if evaluations.contains_key(&record.session_id) {
            return Err(EvalError::DuplicateEvaluation(record.session_id).into());
        }
        evaluations.insert(record.session_id, record.clone());
        Ok(())
    }

    async fn load_evaluation(&self, session_id: Uuid) -> Result<Option<EvaluationRecord>> {
        Ok(self.evaluations.lock().await.get(&session_id).cloned())
    }

    async fn list_evaluations(&self) -> Result<Vec<EvaluationRecord>> {
        let mut records: Vec<_> = self.evaluations.lock().await.values().cloned().collect();
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EvaluationReport, Findings, Role, SkillLevel};
    use chrono::Utc;

    fn make_record(session_id: Uuid) -> EvaluationRecord {
        EvaluationRecord {
            session_id,
            role: Role::Backend,
            score: 6,
            total_questions: 10,
            percentage: 60,
            report: EvaluationReport {
                strengths: Findings::from_items(vec![], "none"),
                weaknesses: Findings::from_items(vec!["weak".into()], "none"),
                skill_level: SkillLevel::Intermediate,
                improvements: vec!["practice".into()],
                summary: "summary".into(),
            },
            created_at: Utc::now(),
        }
    }

    async fn exercise_store(store: &dyn EvaluationStore) {
        let session = InterviewSession::start(Role::Backend, vec!["q1".into()], None);
        store.save_session(&session).await.unwrap();
        let loaded = store.load_session(session.id).await.unwrap().unwrap();
        assert_eq!(loaded.role, Role::Backend);
        assert_eq!(store.list_sessions().await.unwrap().len(), 1);

        let record = make_record(session.id);
        store.save_evaluation(&record).await.unwrap();
        assert_eq!(
            store.load_evaluation(session.id).await.unwrap(),
            Some(record.clone())
        );

        let err = store.save_evaluation(&record).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<EvalError>(),
            Some(&EvalError::DuplicateEvaluation(session.id))
        );
        assert_eq!(store.list_evaluations().await.unwrap().len(), 1);

        assert!(store.load_session(Uuid::new_v4()).await.unwrap().is_none());
        assert!(store.load_evaluation(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn memory_store_roundtrip() {
        exercise_store(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn json_dir_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        exercise_store(&store).await;
        assert!(dir.path().join("sessions").is_dir());
        assert!(dir.path().join("evaluations").is_dir());
    }

    #[tokio::test]
    async fn json_dir_store_empty_root_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path().join("missing"));
        assert!(store.list_sessions().await.unwrap().is_empty());
        assert!(store.list_evaluations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_evaluation_saves_keep_exactly_one() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        let session_id = Uuid::new_v4();
        let first = make_record(session_id);
        let mut second = make_record(session_id);
        second.score = 2;

        let (a, b) = tokio::join!(store.save_evaluation(&first), store.save_evaluation(&second));
        assert!(a.is_ok() != b.is_ok());
        let err = a.err().or(b.err()).unwrap();
        assert_eq!(
            err.downcast_ref::<EvalError>(),
            Some(&EvalError::DuplicateEvaluation(session_id))
        );

        let stored = store.load_evaluation(session_id).await.unwrap().unwrap();
        assert!(stored.score == 6 || stored.score == 2);

        // Only the record itself remains; no temporary files are left behind.
        let files: Vec<_> = std::fs::read_dir(dir.path().join("evaluations"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(files, vec![format!("{session_id}.json")]);
    }

    #[tokio::test]
    async fn leftover_temp_file_does_not_block_evaluation() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        let session_id = Uuid::new_v4();
        let evaluations = dir.path().join("evaluations");
        std::fs::create_dir_all(&evaluations).unwrap();
        std::fs::write(evaluations.join(format!("{session_id}.abc.tmp")), "{\"trunc").unwrap();

        store.save_evaluation(&make_record(session_id)).await.unwrap();
        assert!(store.load_evaluation(session_id).await.unwrap().is_some());
        assert_eq!(store.list_evaluations().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn json_dir_store_skips_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDirStore::new(dir.path());
        let session = InterviewSession::start(Role::Hr, vec![], None);
        store.save_session(&session).await.unwrap();
        std::fs::write(dir.path().join("sessions/garbage.json"), "{not json").unwrap();

        let sessions = store.list_sessions().await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].id, session.id);
    }
}
