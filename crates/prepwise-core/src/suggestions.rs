//! Improvement suggestions keyed by role, category, and difficulty.
//!
//! The table only holds the combinations the product defines. Anything
//! else resolves to [`default_suggestion`] for the topic's category.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::model::{Category, Difficulty, Role};

/// Explicit `(role, category, difficulty)` → suggestion mapping.
#[derive(Debug, Clone, Default)]
pub struct SuggestionTable {
    entries: HashMap<(Role, Category, Difficulty), String>,
}

impl SuggestionTable {
    /// An empty table; every lookup falls back.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in table shipped with prepwise.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        let rows: [(Role, Category, [&str; 3]); 5] = [
            (
                Role::Frontend,
                Category::Technical,
                [
                    "Review fundamental HTML, CSS, and JavaScript concepts",
                    "Practice React components, hooks, and state management",
                    "Study advanced React patterns, performance optimization, and testing",
                ],
            ),
            (
                Role::Backend,
                Category::Technical,
                [
                    "Strengthen basics of Node.js, Express, and REST APIs",
                    "Practice middleware, authentication, and database integration",
                    "Master advanced topics like microservices, caching, and scalability",
                ],
            ),
            (
                Role::Mern,
                Category::Technical,
                [
                    "Review MERN stack fundamentals and full-stack architecture",
                    "Practice building complete CRUD applications with MERN",
                    "Study deployment, security, and production-ready MERN applications",
                ],
            ),
            (
                Role::Hr,
                Category::Hr,
                [
                    "Prepare better answers for common behavioral questions",
                    "Practice STAR method for situational questions",
                    "Develop strong leadership and conflict resolution examples",
                ],
            ),
            (
                Role::Aptitude,
                Category::Aptitude,
                [
                    "Practice basic logical reasoning and numerical problems",
                    "Work on pattern recognition and analytical thinking",
                    "Master complex problem-solving and advanced reasoning",
                ],
            ),
        ];

        for (role, category, [easy, medium, hard]) in rows {
            table.insert(role, category.clone(), Difficulty::Easy, easy);
            table.insert(role, category.clone(), Difficulty::Medium, medium);
            table.insert(role, category, Difficulty::Hard, hard);
        }
        table
    }

    /// Add or replace an entry.
    pub fn insert(
        &mut self,
        role: Role,
        category: Category,
        difficulty: Difficulty,
        text: impl Into<String>,
    ) {
        self.entries.insert((role, category, difficulty), text.into());
    }

    /// Drop an entry, returning its text.
    pub fn remove(
        &mut self,
        role: Role,
        category: &Category,
        difficulty: &Difficulty,
    ) -> Option<String> {
        self.entries
            .remove(&(role, category.clone(), difficulty.clone()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for the exact combination, if defined.
    pub fn lookup(&self, role: Role, category: &Category, difficulty: &Difficulty) -> Option<&str> {
        self.entries
            .get(&(role, category.clone(), difficulty.clone()))
            .map(String::as_str)
    }

    /// Entry for the combination, or the generic suggestion for its category.
    pub fn suggestion_for(&self, role: Role, category: &Category, difficulty: &Difficulty) -> String {
        match self.lookup(role, category, difficulty) {
            Some(text) => text.to_string(),
            None => default_suggestion(category),
        }
    }
}

/// Shared instance of [`SuggestionTable::builtin`].
pub fn builtin() -> &'static SuggestionTable {
    static TABLE: OnceLock<SuggestionTable> = OnceLock::new();
    TABLE.get_or_init(SuggestionTable::builtin)
}

/// Generic suggestion used when the table has no entry.
pub fn default_suggestion(category: &Category) -> String {
    format!("Improve your {category} skills with focused practice and study")
}
