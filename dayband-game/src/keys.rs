//! Persistence key scheme shared by the session and the stats engine.
//!
//! Two key shapes live under one site prefix, case-sensitive:
//! `<prefix>_<puzzleNumber>` for per-puzzle progress and
//! `<prefix>_<YYYY-MM-DD>` for finalized daily results. The store itself is
//! format-agnostic; this module is the whole contract.
use chrono::NaiveDate;
use regex::Regex;

use crate::constants::DATE_KEY_FORMAT;

/// Key builder and matcher for one site's slice of the store.
#[derive(Debug, Clone)]
pub struct StorageKeys {
    prefix: String,
    daily_pattern: Regex,
}

impl StorageKeys {
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        let pattern = format!(r"^{}_\d{{4}}-\d{{2}}-\d{{2}}$", regex::escape(prefix));
        Self {
            prefix: prefix.to_string(),
            // Escaped literal plus fixed digit groups; cannot fail to compile.
            daily_pattern: Regex::new(&pattern).expect("daily key pattern is valid"),
        }
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Key holding the in-flight progress record for a puzzle.
    #[must_use]
    pub fn puzzle(&self, number: u32) -> String {
        format!("{}_{}", self.prefix, number)
    }

    /// Key holding the finalized result for a calendar date.
    #[must_use]
    pub fn daily(&self, date: NaiveDate) -> String {
        format!("{}_{}", self.prefix, date.format(DATE_KEY_FORMAT))
    }

    /// Whether a key names a daily result under this prefix.
    #[must_use]
    pub fn is_daily(&self, key: &str) -> bool {
        self.daily_pattern.is_match(key)
    }

    /// Parse the date out of a daily-result key, if it is one.
    #[must_use]
    pub fn daily_date(&self, key: &str) -> Option<NaiveDate> {
        if !self.is_daily(key) {
            return None;
        }
        let suffix = &key[self.prefix.len() + 1..];
        NaiveDate::parse_from_str(suffix, DATE_KEY_FORMAT).ok()
    }
}
