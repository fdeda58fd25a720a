//! Persisted per-puzzle and per-day records.
//!
//! Field names serialize camelCase so records stay byte-compatible with the
//! JSON the original web client left in localStorage.
use serde::{Deserialize, Serialize};

/// In-flight progress for one puzzle. Created the first time a puzzle loads
/// with no prior record, mutated by each answer, never deleted.
///
/// `results` holds one slot per question: `None` = unanswered,
/// `Some(true)` = correct, `Some(false)` = incorrect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub current_question: usize,
    pub results: Vec<Option<bool>>,
    pub game_complete: bool,
}

impl GameRecord {
    /// Fresh record for a puzzle with `total_questions` questions.
    #[must_use]
    pub fn new(total_questions: usize) -> Self {
        Self {
            current_question: 0,
            results: vec![None; total_questions],
            game_complete: false,
        }
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.results.len()
    }

    /// Count of correct answers so far.
    #[must_use]
    pub fn score(&self) -> u32 {
        u32::try_from(
            self.results
                .iter()
                .filter(|slot| matches!(slot, Some(true)))
                .count(),
        )
        .unwrap_or(u32::MAX)
    }

    /// Outcome recorded for the current question, if any.
    #[must_use]
    pub fn current_outcome(&self) -> Option<bool> {
        self.results.get(self.current_question).copied().flatten()
    }

    #[must_use]
    pub fn all_answered(&self) -> bool {
        self.results.iter().all(Option::is_some)
    }

    /// Whether a restored record can drive a puzzle of the given size.
    ///
    /// A record whose shape does not match today's question set is treated
    /// like a parse failure: the puzzle restarts fresh.
    #[must_use]
    pub fn matches_quiz(&self, total_questions: usize) -> bool {
        self.results.len() == total_questions
            && (total_questions == 0 || self.current_question < total_questions)
    }
}

/// Finalized, dated outcome of one completed puzzle. At most one exists per
/// calendar date; a re-trigger on the same date overwrites it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyResult {
    pub score: u32,
    pub total_questions: u32,
    pub results: Vec<bool>,
}

impl DailyResult {
    /// Finalize a record into a daily result. Unanswered slots count as
    /// incorrect; a completed record has none.
    #[must_use]
    pub fn from_record(record: &GameRecord) -> Self {
        let results: Vec<bool> = record
            .results
            .iter()
            .map(|slot| slot.unwrap_or(false))
            .collect();
        Self {
            score: record.score(),
            total_questions: u32::try_from(results.len()).unwrap_or(u32::MAX),
            results,
        }
    }

    /// Score as a percentage of the questions asked, 0 when the day had none.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        f64::from(self.score) / f64::from(self.total_questions) * 100.0
    }
}
