//! Dashboard and history views over completed sessions.

use std::collections::HashMap;

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{EvaluationRecord, InterviewSession, Role};

/// Number of sessions on the dashboard and default page size.
pub const DEFAULT_LIMIT: usize = 5;

/// Skill level reported for sessions that were never evaluated.
pub const UNKNOWN_SKILL_LEVEL: &str = "Unknown";

/// One completed session as listed in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub session_id: Uuid,
    pub role: Role,
    pub score: u32,
    pub total_questions: u32,
    pub percentage: i32,
    pub skill_level: String,
    pub created_at: DateTime<Utc>,
}

/// Filters and paging for [`history`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    /// 1-based page number.
    pub page: usize,
    pub limit: usize,
    #[serde(default)]
    pub min_score: Option<u32>,
    /// Only sessions created on or after this day.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Only sessions created on or before the end of this day.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
            min_score: None,
            start_date: None,
            end_date: None,
        }
    }
}

impl HistoryQuery {
    fn matches(&self, session: &InterviewSession) -> bool {
        if let Some(min) = self.min_score {
            if session.score < min {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if session.created_at < start_of_day(start) {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            // Inclusive of the whole end day.
            if session.created_at >= start_of_day(end + Days::new(1)) {
                return false;
            }
        }
        true
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

/// A page of history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPage {
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub interviews: Vec<HistoryEntry>,
}

fn to_entry(session: &InterviewSession, evaluation: Option<&EvaluationRecord>) -> HistoryEntry {
    HistoryEntry {
        session_id: session.id,
        role: session.role,
        score: session.score,
        total_questions: session.total_questions,
        percentage: evaluation
            .map(|e| e.percentage)
            .unwrap_or_else(|| session.percentage()),
        skill_level: evaluation
            .map(|e| e.report.skill_level.to_string())
            .unwrap_or_else(|| UNKNOWN_SKILL_LEVEL.to_string()),
        created_at: session.created_at,
    }
}

/// Completed sessions, newest first.
fn completed_newest_first(sessions: &[InterviewSession]) -> Vec<&InterviewSession> {
    let mut completed: Vec<&InterviewSession> =
        sessions.iter().filter(|s| s.is_completed()).collect();
    completed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    completed
}

fn index_evaluations(evaluations: &[EvaluationRecord]) -> HashMap<Uuid, &EvaluationRecord> {
    evaluations.iter().map(|e| (e.session_id, e)).collect()
}

/// The `limit` most recent completed sessions.
pub fn recent(
    sessions: &[InterviewSession],
    evaluations: &[EvaluationRecord],
    limit: usize,
) -> Vec<HistoryEntry> {
    let by_session = index_evaluations(evaluations);
    completed_newest_first(sessions)
        .into_iter()
        .take(limit)
        .map(|s| to_entry(s, by_session.get(&s.id).copied()))
        .collect()
}

/// A filtered, paginated view of completed sessions, newest first.
///
/// A page with no entries reports zero totals.
pub fn history(
    sessions: &[InterviewSession],
    evaluations: &[EvaluationRecord],
    query: &HistoryQuery,
) -> HistoryPage {
    let page = query.page.max(1);
    let limit = query.limit.max(1);
    let by_session = index_evaluations(evaluations);

    let matching: Vec<&InterviewSession> = completed_newest_first(sessions)
        .into_iter()
        .filter(|s| query.matches(s))
        .collect();

    let total_items = matching.len();
    let interviews: Vec<HistoryEntry> = matching
        .into_iter()
        .skip((page - 1).saturating_mul(limit))
        .take(limit)
        .map(|s| to_entry(s, by_session.get(&s.id).copied()))
        .collect();

    if interviews.is_empty() {
        return HistoryPage {
            page,
            total_pages: 0,
            total_items: 0,
            interviews,
        };
    }

    HistoryPage {
        page,
        total_pages: total_items.div_ceil(limit),
        total_items,
        interviews,
    }
}
