//! Centralized timing and wire constants for the trivia game core.
//!
//! These values define the fixed rhythm of the answer/reveal loop and the
//! exact identifiers shared with deployed clients. Keeping them together
//! ensures the cadence can only change via reviewed code, not through
//! external assets.

// Reveal cadence -----------------------------------------------------------
/// How long a revealed answer stays on screen before it clears.
pub const REVEAL_DURATION_MS: u64 = 2000;
/// Gap between the reveal clearing and the next question appearing.
pub const ADVANCE_DELAY_MS: u64 = 50;

// Analytics ----------------------------------------------------------------
/// Event name emitted exactly once per first completion of a puzzle.
pub const COMPLETED_GAME_EVENT: &str = "completed_game";

// Persistence --------------------------------------------------------------
/// Date component of daily-result keys, `YYYY-MM-DD`.
pub(crate) const DATE_KEY_FORMAT: &str = "%Y-%m-%d";
