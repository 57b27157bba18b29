//! Core data model types for prepwise.
//!
//! Questions, answers, interview sessions, and the evaluation report the
//! engine produces. Everything here is plain data with serde derives so it
//! can travel through the store and the CLI unchanged.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EvalError;

/// The interview track a session targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Frontend,
    Backend,
    Mern,
    Hr,
    Aptitude,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Frontend,
        Role::Backend,
        Role::Mern,
        Role::Hr,
        Role::Aptitude,
    ];

    /// Lowercase identifier, as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Frontend => "frontend",
            Role::Backend => "backend",
            Role::Mern => "mern",
            Role::Hr => "hr",
            Role::Aptitude => "aptitude",
        }
    }

    /// Identifier with its first letter uppercased ("Frontend", "Mern", "Hr").
    pub fn title(&self) -> String {
        let s = self.as_str();
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = EvalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "frontend" => Ok(Role::Frontend),
            "backend" => Ok(Role::Backend),
            "mern" => Ok(Role::Mern),
            "hr" => Ok(Role::Hr),
            "aptitude" => Ok(Role::Aptitude),
            _ => Err(EvalError::UnknownRole(s.to_string())),
        }
    }
}

/// What kind of question this is, orthogonal to the role.
///
/// Unrecognized values are kept verbatim rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Technical,
    Hr,
    Aptitude,
    Other(String),
}

impl Category {
    /// Category assumed for questions that carry none.
    pub fn general() -> Self {
        Category::Other("general".to_string())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Category::Technical => "technical",
            Category::Hr => "hr",
            Category::Aptitude => "aptitude",
            Category::Other(raw) => raw,
        }
    }

    /// Display name used in topic labels.
    pub fn label(&self) -> &str {
        match self {
            Category::Technical => "Technical",
            Category::Hr => "HR & Behavioral",
            Category::Aptitude => "Aptitude & Reasoning",
            Category::Other(raw) => raw,
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        match s.as_str() {
            "technical" => Category::Technical,
            "hr" => Category::Hr,
            "aptitude" => Category::Aptitude,
            _ => Category::Other(s),
        }
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Category::from(s.to_string())
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        match c {
            Category::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Difficulty tag on a question. Unrecognized values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Other(String),
}

impl Difficulty {
    pub fn as_str(&self) -> &str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Other(raw) => raw,
        }
    }

    /// Display name used in topic labels.
    pub fn label(&self) -> &str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Other(raw) => raw,
        }
    }
}

impl From<String> for Difficulty {
    fn from(s: String) -> Self {
        match s.as_str() {
            "easy" => Difficulty::Easy,
            "medium" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Other(s),
        }
    }
}

impl From<&str> for Difficulty {
    fn from(s: &str) -> Self {
        Difficulty::from(s.to_string())
    }
}

impl From<Difficulty> for String {
    fn from(d: Difficulty) -> Self {
        match d {
            Difficulty::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A multiple-choice question from the question bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier within the bank.
    pub id: String,
    /// The question text shown to the candidate.
    #[serde(alias = "question")]
    pub text: String,
    /// Answer options, in display order.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    #[serde(alias = "answer")]
    pub correct_option: u8,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    /// Interview track the question belongs to.
    pub role: Role,
    #[serde(default)]
    pub category: Option<Category>,
    /// Why the correct option is correct.
    #[serde(default)]
    pub explanation: Option<String>,
}

impl Question {
    /// Category for bucketing; questions without one (or with an empty one)
    /// fall under "general".
    pub fn category_or_default(&self) -> Category {
        match &self.category {
            Some(category) if !category.as_str().trim().is_empty() => category.clone(),
            _ => Category::general(),
        }
    }

    /// Difficulty for bucketing; a missing or empty difficulty counts as medium.
    pub fn difficulty_or_default(&self) -> Difficulty {
        match &self.difficulty {
            Some(difficulty) if !difficulty.as_str().trim().is_empty() => difficulty.clone(),
            _ => Difficulty::Medium,
        }
    }

    /// Whether `selected` is this question's correct option.
    pub fn is_correct(&self, selected: Option<u8>) -> bool {
        selected == Some(self.correct_option)
    }
}

/// A candidate's answer to one question, with correctness already decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsweredQuestion {
    pub question_id: String,
    /// Chosen option, or `None` when the question was skipped.
    #[serde(default)]
    pub selected_option: Option<u8>,
    pub is_correct: bool,
}

/// A named collection of questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl QuestionBank {
    /// Look a question up by id.
    pub fn get(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// All questions for a role, in bank order.
    pub fn for_role(&self, role: Role) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(move |q| q.role == role)
    }
}

/// Coarse skill classification derived from the overall percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    #[serde(rename = "Job Ready")]
    JobReady,
}

impl SkillLevel {
    /// Classify an overall percentage. Lower bounds are inclusive.
    pub fn from_percentage(percentage: i32) -> Self {
        if percentage >= 70 {
            SkillLevel::JobReady
        } else if percentage >= 50 {
            SkillLevel::Intermediate
        } else {
            SkillLevel::Beginner
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::JobReady => "Job Ready",
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a strengths or weaknesses scan.
///
/// `NoneFound` carries the fallback message shown in place of an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Findings {
    Found { items: Vec<String> },
    #[serde(rename = "none")]
    NoneFound { message: String },
}

impl Findings {
    /// `Found` when `items` is non-empty, otherwise `NoneFound(fallback)`.
    pub fn from_items(items: Vec<String>, fallback: &str) -> Self {
        if items.is_empty() {
            Findings::NoneFound {
                message: fallback.to_string(),
            }
        } else {
            Findings::Found { items }
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Findings::Found { .. })
    }

    /// Number of genuine findings (0 for `NoneFound`).
    pub fn count(&self) -> usize {
        match self {
            Findings::Found { items } => items.len(),
            Findings::NoneFound { .. } => 0,
        }
    }

    /// Display lines; never empty.
    pub fn lines(&self) -> Vec<&str> {
        match self {
            Findings::Found { items } => items.iter().map(String::as_str).collect(),
            Findings::NoneFound { message } => vec![message.as_str()],
        }
    }
}

/// Structured performance report for one completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub strengths: Findings,
    pub weaknesses: Findings,
    pub skill_level: SkillLevel,
    /// At most five suggestions, in weak-topic order.
    pub improvements: Vec<String>,
    pub summary: String,
}

/// Lifecycle state of an interview session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Started,
    Completed,
}

/// One question slot in a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionQuestion {
    pub question_id: String,
    #[serde(default)]
    pub selected_option: Option<u8>,
}

/// A single mock-interview attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewSession {
    pub id: Uuid,
    #[serde(default)]
    pub user_id: Option<String>,
    pub role: Role,
    pub questions: Vec<SessionQuestion>,
    #[serde(default)]
    pub score: u32,
    pub total_questions: u32,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
}

impl InterviewSession {
    /// Start a new session over the given questions.
    pub fn start(role: Role, question_ids: Vec<String>, user_id: Option<String>) -> Self {
        let questions: Vec<SessionQuestion> = question_ids
            .into_iter()
            .map(|question_id| SessionQuestion {
                question_id,
                selected_option: None,
            })
            .collect();
        Self {
            id: Uuid::new_v4(),
            user_id,
            role,
            total_questions: questions.len() as u32,
            questions,
            score: 0,
            status: SessionStatus::Started,
            created_at: Utc::now(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    /// Score as a rounded percentage of the session's question count.
    pub fn percentage(&self) -> i32 {
        round_percentage(self.score, self.total_questions)
    }
}

/// The persisted evaluation for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub session_id: Uuid,
    pub role: Role,
    pub score: u32,
    #[serde(default)]
    pub total_questions: u32,
    pub percentage: i32,
    #[serde(flatten)]
    pub report: EvaluationReport,
    pub created_at: DateTime<Utc>,
}

/// `round(score / total * 100)`, or 0 for an empty session.
pub fn round_percentage(score: u32, total: u32) -> i32 {
    if total == 0 {
        return 0;
    }
    (score as f64 / total as f64 * 100.0).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_display_and_parse() {
        assert_eq!(Role::Frontend.to_string(), "frontend");
        assert_eq!("Backend".parse::<Role>().unwrap(), Role::Backend);
        assert_eq!(" mern ".parse::<Role>().unwrap(), Role::Mern);
        assert_eq!(
            "devops".parse::<Role>(),
            Err(EvalError::UnknownRole("devops".into()))
        );
    }

    #[test]
    fn role_title_uppercases_first_letter_only() {
        assert_eq!(Role::Frontend.title(), "Frontend");
        assert_eq!(Role::Mern.title(), "Mern");
        assert_eq!(Role::Hr.title(), "Hr");
    }

    #[test]
    fn unknown_category_and_difficulty_pass_through() {
        let c = Category::from("design");
        assert_eq!(c, Category::Other("design".into()));
        assert_eq!(c.label(), "design");
        assert_eq!(Category::Hr.label(), "HR & Behavioral");

        let d = Difficulty::from("expert");
        assert_eq!(d.label(), "expert");
        assert_eq!(Difficulty::from("hard"), Difficulty::Hard);
    }

    #[test]
    fn question_defaults_for_bucketing() {
        let json = r#"{
            "id": "q1",
            "question": "What is 2 + 2?",
            "options": ["4", "3", "5", "22"],
            "answer": 0,
            "role": "aptitude"
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.text, "What is 2 + 2?");
        assert_eq!(q.category_or_default(), Category::general());
        assert_eq!(q.difficulty_or_default(), Difficulty::Medium);
        assert!(q.is_correct(Some(0)));
        assert!(!q.is_correct(None));
    }

    #[test]
    fn empty_category_and_difficulty_use_defaults() {
        let json = r#"{
            "id": "q2",
            "question": "Pick the odd one out",
            "options": ["a", "b", "c", "d"],
            "answer": 1,
            "role": "aptitude",
            "category": "",
            "difficulty": ""
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.category_or_default(), Category::general());
        assert_eq!(q.difficulty_or_default(), Difficulty::Medium);
    }

    #[test]
    fn skill_level_boundaries() {
        assert_eq!(SkillLevel::from_percentage(70), SkillLevel::JobReady);
        assert_eq!(SkillLevel::from_percentage(69), SkillLevel::Intermediate);
        assert_eq!(SkillLevel::from_percentage(50), SkillLevel::Intermediate);
        assert_eq!(SkillLevel::from_percentage(49), SkillLevel::Beginner);
        assert_eq!(SkillLevel::from_percentage(-5), SkillLevel::Beginner);
        assert_eq!(SkillLevel::from_percentage(140), SkillLevel::JobReady);
    }

    #[test]
    fn skill_level_serializes_with_space() {
        let json = serde_json::to_string(&SkillLevel::JobReady).unwrap();
        assert_eq!(json, "\"Job Ready\"");
    }

    #[test]
    fn findings_lines_are_never_empty() {
        let none = Findings::from_items(vec![], "nothing here");
        assert!(!none.is_found());
        assert_eq!(none.count(), 0);
        assert_eq!(none.lines(), vec!["nothing here"]);

        let found = Findings::from_items(vec!["a".into(), "b".into()], "unused");
        assert_eq!(found.count(), 2);
        assert_eq!(found.lines(), vec!["a", "b"]);
    }

    #[test]
    fn findings_serialize_as_tagged_object() {
        let none = Findings::from_items(vec![], "fallback");
        let json = serde_json::to_value(&none).unwrap();
        assert_eq!(json["kind"], "none");
        assert_eq!(json["message"], "fallback");

        let found = Findings::from_items(vec!["x".into()], "fallback");
        let json = serde_json::to_value(&found).unwrap();
        assert_eq!(json["kind"], "found");
        assert_eq!(json["items"][0], "x");
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(round_percentage(2, 3), 67);
        assert_eq!(round_percentage(1, 8), 13);
        assert_eq!(round_percentage(0, 0), 0);
        assert_eq!(round_percentage(10, 10), 100);
    }

    #[test]
    fn new_session_starts_empty() {
        let session = InterviewSession::start(Role::Hr, vec!["a".into(), "b".into()], None);
        assert_eq!(session.total_questions, 2);
        assert_eq!(session.status, SessionStatus::Started);
        assert!(session.questions.iter().all(|q| q.selected_option.is_none()));
        assert_eq!(session.percentage(), 0);
    }
}
