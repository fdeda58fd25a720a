//! Daily puzzle questions.
use serde::{Deserialize, Serialize};

/// One multiple-choice question: an ordered set of option labels with exactly
/// one designated correct option. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Option labels in display order. Legacy feeds call this `songs`.
    #[serde(alias = "songs")]
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl Question {
    /// Whether the given choice is the designated correct option.
    #[must_use]
    pub fn is_correct(&self, choice: &str) -> bool {
        choice == self.correct_answer
    }
}

/// The numbered question set for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyQuiz {
    /// Identifier for this day's puzzle.
    pub number: u32,
    pub questions: Vec<Question>,
}

impl DailyQuiz {
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// An empty question list signals "no puzzle available today".
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}
