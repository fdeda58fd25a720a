//! Dayband Game Engine
//!
//! Platform-agnostic core logic for the Dayband daily trivia sites.
//! This crate provides the session state machine, persistence keying, and
//! statistics engine without UI or platform-specific dependencies.

pub mod config;
pub mod constants;
pub mod driver;
pub mod keys;
pub mod progress;
pub mod question;
pub mod record;
pub mod session;
pub mod share;
pub mod stats;
pub mod time;

// Re-export commonly used types
pub use config::{ComeBackImage, SiteConfig, SiteConfigError};
pub use constants::{ADVANCE_DELAY_MS, COMPLETED_GAME_EVENT, REVEAL_DURATION_MS};
pub use driver::SessionDriver;
pub use keys::StorageKeys;
pub use progress::{MemoryStore, ProgressStore};
pub use question::{DailyQuiz, Question};
pub use record::{DailyResult, GameRecord};
pub use session::{AnswerFeedback, CompletionSummary, GameSession, SessionPhase};
pub use share::{share_message, share_message_for};
pub use stats::{Stats, compute_stats, gather_daily_results, stats_from_store};
pub use time::{
    Clock, FixedClock, ManualScheduler, Scheduler, SystemClock, TimerHandle,
};

/// Trait for abstracting the daily question provider.
/// Platform-specific implementations should provide this.
pub trait QuestionSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch today's numbered question set.
    ///
    /// An empty question list means "no puzzle available today"; the session
    /// treats that as non-fatal and simply renders nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the question set cannot be loaded.
    fn fetch_daily(&self) -> Result<DailyQuiz, Self::Error>;
}

/// Fire-and-forget analytics sink.
///
/// Receives the completion event at most once per first completion of a
/// given puzzle per device. Implementations must not fail into the caller.
pub trait AnalyticsSink {
    fn emit(&self, event: &str, stats: &Stats);
}
