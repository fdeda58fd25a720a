//! Daily puzzle session state machine.
//!
//! One session governs one puzzle's lifecycle: loading, answering, revealing,
//! advancing, completing. All durable writes go through the injected
//! `ProgressStore`; completion dating goes through the injected `Clock`.
//! Timed transitions live in [`crate::driver`], keeping this machine
//! synchronous and independently testable.
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::QuestionSource;
use crate::config::SiteConfig;
use crate::keys::StorageKeys;
use crate::progress::ProgressStore;
use crate::question::{DailyQuiz, Question};
use crate::record::{DailyResult, GameRecord};
use crate::stats::{Stats, stats_from_store};
use crate::time::Clock;

/// Lifecycle phase of a session.
///
/// `Loading` is terminal when no puzzle is available; `Completed` is terminal
/// for the puzzle (no further answers accepted).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    InProgress,
    Revealing,
    Completed,
}

/// Immediate feedback for a submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub correct: bool,
    /// Phrase to show on the selected button; only set on a correct pick.
    pub phrase: Option<String>,
}

/// Everything the result screen needs after a puzzle finishes.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSummary {
    pub puzzle_number: u32,
    pub score: u32,
    pub total_questions: u32,
    pub results: Vec<bool>,
    pub stats: Stats,
    /// True only for the first completion of this puzzle on this device;
    /// gates the one-shot analytics emission.
    pub first_completion: bool,
}

struct ActivePuzzle {
    quiz: DailyQuiz,
    record: GameRecord,
}

/// State machine for one day's puzzle.
pub struct GameSession<S: ProgressStore, C: Clock> {
    config: SiteConfig,
    keys: StorageKeys,
    store: S,
    clock: C,
    puzzle: Option<ActivePuzzle>,
    phase: SessionPhase,
    previously_completed: bool,
    rng: SmallRng,
}

impl<S: ProgressStore, C: Clock> GameSession<S, C> {
    /// Fetch today's puzzle and restore any saved progress for it.
    ///
    /// When the source has no puzzle (empty question list) the session stays
    /// in `Loading` permanently: nothing renders, nothing is persisted. A
    /// restored record that is already complete puts the session straight
    /// into `Completed` and suppresses the one-shot completion event.
    ///
    /// # Errors
    ///
    /// Returns an error only when the question source itself fails; missing
    /// or unreadable stored progress is treated as a fresh start.
    pub fn load<Q>(
        config: SiteConfig,
        store: S,
        clock: C,
        source: &Q,
        seed: u64,
    ) -> Result<Self, anyhow::Error>
    where
        Q: QuestionSource,
        Q::Error: Into<anyhow::Error>,
    {
        config.validate()?;
        let keys = StorageKeys::new(&config.storage_prefix);
        let quiz = source.fetch_daily().map_err(Into::into)?;

        let mut session = Self {
            config,
            keys,
            store,
            clock,
            puzzle: None,
            phase: SessionPhase::Loading,
            previously_completed: false,
            rng: SmallRng::seed_from_u64(seed),
        };

        if quiz.is_empty() {
            log::info!("no puzzle available today; session stays in loading");
            return Ok(session);
        }

        let total = quiz.total_questions();
        let key = session.keys.puzzle(quiz.number);
        let record = match session.store.get::<GameRecord>(&key) {
            Some(record) if record.matches_quiz(total) => {
                session.previously_completed = record.game_complete;
                log::debug!(
                    "restored progress for {key}: question {} of {total}",
                    record.current_question
                );
                record
            }
            Some(record) => {
                log::warn!(
                    "stored record at {key} does not fit a {total}-question puzzle \
                     (had {}); starting fresh",
                    record.total_questions()
                );
                GameRecord::new(total)
            }
            None => GameRecord::new(total),
        };

        session.phase = if record.game_complete {
            SessionPhase::Completed
        } else {
            SessionPhase::InProgress
        };
        session.puzzle = Some(ActivePuzzle { quiz, record });
        Ok(session)
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    #[must_use]
    pub fn puzzle_number(&self) -> Option<u32> {
        self.puzzle.as_ref().map(|p| p.quiz.number)
    }

    #[must_use]
    pub fn record(&self) -> Option<&GameRecord> {
        self.puzzle.as_ref().map(|p| &p.record)
    }

    /// The question currently in front of the player.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        let puzzle = self.puzzle.as_ref()?;
        puzzle.quiz.questions.get(puzzle.record.current_question)
    }

    /// Whether the current question already has a recorded outcome.
    #[must_use]
    pub fn current_answered(&self) -> bool {
        self.puzzle
            .as_ref()
            .is_some_and(|p| p.record.current_outcome().is_some())
    }

    /// True when the restored record was already complete at load time.
    #[must_use]
    pub fn previously_completed(&self) -> bool {
        self.previously_completed
    }

    /// Record the player's choice for the current question.
    ///
    /// Valid only in `InProgress` with the current slot unanswered; any other
    /// call is silently ignored and returns `None`. The updated record is
    /// persisted before this returns, so a reload mid-reveal resumes with the
    /// answer already recorded.
    pub fn answer(&mut self, choice: &str) -> Option<AnswerFeedback> {
        if self.phase != SessionPhase::InProgress {
            return None;
        }
        let correct = {
            let puzzle = self.puzzle.as_mut()?;
            let index = puzzle.record.current_question;
            if puzzle.record.results.get(index)?.is_some() {
                return None;
            }
            let correct = puzzle.quiz.questions.get(index)?.is_correct(choice);
            puzzle.record.results[index] = Some(correct);
            correct
        };
        self.persist_record();
        self.phase = SessionPhase::Revealing;
        let phrase = correct.then(|| self.config.pick_success_phrase(&mut self.rng).to_string());
        Some(AnswerFeedback { correct, phrase })
    }

    /// Clear the reveal. The session sits between questions (still showing
    /// the answered one) until `advance` runs.
    pub fn end_reveal(&mut self) {
        if self.phase == SessionPhase::Revealing {
            self.phase = SessionPhase::InProgress;
        }
    }

    /// Move past an answered question: either step to the next one or, on
    /// the last question, finalize the puzzle.
    ///
    /// Finalizing persists the completed record, writes a `DailyResult`
    /// keyed by today's date at this moment (a post-midnight finish lands on
    /// the later date by design), and recomputes lifetime stats. Returns the
    /// completion summary when the puzzle just finished, `None` otherwise.
    pub fn advance(&mut self) -> Option<CompletionSummary> {
        if self.phase != SessionPhase::InProgress {
            return None;
        }
        let is_last = {
            let puzzle = self.puzzle.as_ref()?;
            if puzzle.record.game_complete || puzzle.record.current_outcome().is_none() {
                return None;
            }
            puzzle.record.current_question + 1 >= puzzle.quiz.total_questions()
        };

        if !is_last {
            if let Some(puzzle) = self.puzzle.as_mut() {
                puzzle.record.current_question += 1;
            }
            self.persist_record();
            return None;
        }

        if let Some(puzzle) = self.puzzle.as_mut() {
            puzzle.record.game_complete = true;
        }
        self.persist_record();
        self.phase = SessionPhase::Completed;

        let (number, daily) = {
            let puzzle = self.puzzle.as_ref()?;
            (puzzle.quiz.number, DailyResult::from_record(&puzzle.record))
        };
        let date = self.clock.today();
        let daily_key = self.keys.daily(date);
        if let Err(err) = self.store.set(&daily_key, &daily) {
            log::warn!("failed to persist daily result at {daily_key}: {err}");
        } else {
            log::debug!("recorded daily result {daily_key}: {}/{}", daily.score, daily.total_questions);
        }

        let stats = stats_from_store(&self.store, &self.keys);
        let first_completion = !self.previously_completed;
        self.previously_completed = true;
        Some(CompletionSummary {
            puzzle_number: number,
            score: daily.score,
            total_questions: daily.total_questions,
            results: daily.results,
            stats,
            first_completion,
        })
    }

    /// Summary for rendering a puzzle that was already complete at load
    /// time. `first_completion` is always false here; the one-shot event
    /// belongs to the `advance` that finished the puzzle.
    #[must_use]
    pub fn completed_summary(&self) -> Option<CompletionSummary> {
        let puzzle = self.puzzle.as_ref()?;
        if !puzzle.record.game_complete {
            return None;
        }
        let daily = DailyResult::from_record(&puzzle.record);
        Some(CompletionSummary {
            puzzle_number: puzzle.quiz.number,
            score: daily.score,
            total_questions: daily.total_questions,
            results: daily.results,
            stats: stats_from_store(&self.store, &self.keys),
            first_completion: false,
        })
    }

    fn persist_record(&self) {
        let Some(puzzle) = self.puzzle.as_ref() else {
            return;
        };
        let key = self.keys.puzzle(puzzle.quiz.number);
        if let Err(err) = self.store.set(&key, &puzzle.record) {
            log::warn!("failed to persist progress at {key}: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::MemoryStore;
    use crate::time::FixedClock;
    use chrono::NaiveDate;
    use std::convert::Infallible;

    struct FixtureSource(DailyQuiz);

    impl QuestionSource for FixtureSource {
        type Error = Infallible;

        fn fetch_daily(&self) -> Result<DailyQuiz, Self::Error> {
            Ok(self.0.clone())
        }
    }

    fn quiz(number: u32, total: usize) -> DailyQuiz {
        DailyQuiz {
            number,
            questions: (0..total)
                .map(|i| Question {
                    options: vec![format!("option-{i}"), "wrong".to_string()],
                    correct_answer: format!("option-{i}"),
                })
                .collect(),
        }
    }

    fn session(
        store: &MemoryStore,
        number: u32,
        total: usize,
    ) -> GameSession<MemoryStore, FixedClock> {
        let clock = FixedClock::new(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        GameSession::load(
            SiteConfig::default_config(),
            store.clone(),
            clock,
            &FixtureSource(quiz(number, total)),
            0,
        )
        .unwrap()
    }

    #[test]
    fn empty_source_leaves_session_loading() {
        let store = MemoryStore::new();
        let mut session = session(&store, 142, 0);
        assert_eq!(session.phase(), SessionPhase::Loading);
        assert!(session.current_question().is_none());
        assert!(session.answer("anything").is_none());
        assert!(session.advance().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn fresh_load_initializes_record() {
        let store = MemoryStore::new();
        let session = session(&store, 142, 5);
        assert_eq!(session.phase(), SessionPhase::InProgress);
        let record = session.record().unwrap();
        assert_eq!(record.current_question, 0);
        assert_eq!(record.results, vec![None; 5]);
        assert!(!session.previously_completed());
    }

    #[test]
    fn answer_records_persists_and_reveals() {
        let store = MemoryStore::new();
        let mut session = session(&store, 142, 3);

        let feedback = session.answer("option-0").unwrap();
        assert!(feedback.correct);
        assert_eq!(feedback.phrase.as_deref(), Some("Correct"));
        assert_eq!(session.phase(), SessionPhase::Revealing);

        // Persisted before control returns.
        let stored: GameRecord = store.get("dailyBeatles_142").unwrap();
        assert_eq!(stored.results[0], Some(true));
        assert!(!stored.game_complete);

        // Re-answering during the reveal is ignored.
        assert!(session.answer("wrong").is_none());
    }

    #[test]
    fn incorrect_answer_has_no_phrase() {
        let store = MemoryStore::new();
        let mut session = session(&store, 142, 3);
        let feedback = session.answer("wrong").unwrap();
        assert!(!feedback.correct);
        assert!(feedback.phrase.is_none());
    }

    #[test]
    fn advance_steps_through_questions() {
        let store = MemoryStore::new();
        let mut session = session(&store, 142, 3);

        session.answer("option-0").unwrap();
        session.end_reveal();
        assert!(session.advance().is_none());
        assert_eq!(session.record().unwrap().current_question, 1);
        assert_eq!(session.phase(), SessionPhase::InProgress);

        // Advance without an answered slot is ignored.
        assert!(session.advance().is_none());
        assert_eq!(session.record().unwrap().current_question, 1);
    }

    #[test]
    fn final_advance_completes_and_dates_by_clock() {
        let store = MemoryStore::new();
        let mut session = session(&store, 142, 2);

        session.answer("option-0").unwrap();
        session.end_reveal();
        session.advance();
        session.answer("wrong").unwrap();
        session.end_reveal();
        let summary = session.advance().unwrap();

        assert_eq!(session.phase(), SessionPhase::Completed);
        assert!(summary.first_completion);
        assert_eq!(summary.score, 1);
        assert_eq!(summary.total_questions, 2);
        assert_eq!(summary.results, vec![true, false]);
        assert_eq!(summary.stats.played, 1);
        assert!((summary.stats.avg_score - 5.0).abs() < f64::EPSILON);

        let daily: DailyResult = store.get("dailyBeatles_2024-01-05").unwrap();
        assert_eq!(daily.score, 1);

        // Completed is terminal: no more answers, no second summary.
        assert!(session.answer("option-0").is_none());
        assert!(session.advance().is_none());
    }

    #[test]
    fn resume_restores_record_verbatim() {
        let store = MemoryStore::new();
        let mut first = session(&store, 142, 3);
        first.answer("option-0").unwrap();
        first.end_reveal();
        first.advance();
        let snapshot = first.record().unwrap().clone();
        drop(first);

        let resumed = session(&store, 142, 3);
        assert_eq!(resumed.record(), Some(&snapshot));
        assert_eq!(resumed.phase(), SessionPhase::InProgress);
        assert_eq!(resumed.record().unwrap().current_question, 1);
    }

    #[test]
    fn reload_of_completed_puzzle_suppresses_first_completion() {
        let store = MemoryStore::new();
        let mut first = session(&store, 142, 1);
        first.answer("option-0").unwrap();
        first.end_reveal();
        assert!(first.advance().unwrap().first_completion);
        drop(first);

        let reloaded = session(&store, 142, 1);
        assert_eq!(reloaded.phase(), SessionPhase::Completed);
        assert!(reloaded.previously_completed());
        let summary = reloaded.completed_summary().unwrap();
        assert!(!summary.first_completion);
        assert_eq!(summary.score, 1);
    }

    #[test]
    fn corrupted_record_starts_fresh() {
        let store = MemoryStore::new();
        store.set_raw("dailyBeatles_142", "{definitely not json");
        let session = session(&store, 142, 3);
        assert_eq!(session.phase(), SessionPhase::InProgress);
        assert_eq!(session.record().unwrap().results, vec![None; 3]);
    }

    #[test]
    fn mismatched_record_shape_starts_fresh() {
        let store = MemoryStore::new();
        let stale = GameRecord::new(5);
        store.set("dailyBeatles_142", &stale).unwrap();
        let session = session(&store, 142, 3);
        assert_eq!(session.record().unwrap().results.len(), 3);
        assert!(!session.previously_completed());
    }

    #[test]
    fn duplicate_date_overwrites_daily_result() {
        let store = MemoryStore::new();
        let mut first = session(&store, 141, 1);
        first.answer("wrong").unwrap();
        first.end_reveal();
        first.advance().unwrap();
        drop(first);

        // A second puzzle finished the same day replaces the dated record.
        let mut second = session(&store, 142, 1);
        second.answer("option-0").unwrap();
        second.end_reveal();
        let summary = second.advance().unwrap();

        let keys = StorageKeys::new("dailyBeatles");
        let daily_keys: Vec<String> = store
            .keys_with_prefix("dailyBeatles")
            .into_iter()
            .filter(|k| keys.is_daily(k))
            .collect();
        assert_eq!(daily_keys.len(), 1);
        let daily: DailyResult = store.get(&daily_keys[0]).unwrap();
        assert_eq!(daily.score, 1);
        assert_eq!(summary.stats.played, 1);
    }

    #[test]
    fn record_invariants_hold_through_a_full_game() {
        let store = MemoryStore::new();
        let mut session = session(&store, 142, 4);
        for i in 0..4 {
            let record = session.record().unwrap();
            assert_eq!(record.results.len(), 4);
            assert!(record.current_question < 4);
            session.answer(&format!("option-{i}")).unwrap();
            session.end_reveal();
            session.advance();
        }
        let record = session.record().unwrap();
        assert!(record.game_complete);
        assert_eq!(record.current_question, 3);
        assert!(record.all_answered());
    }
}
