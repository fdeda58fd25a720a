//! Site configuration for one trivia deployment.
//!
//! Each deployed site (Beatles, Friends, ...) ships a config blob that names
//! the storage prefix, share text, and the phrases shown on a correct pick.
//! Field names stay camelCase so the JSON matches the original web assets.
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for a single trivia site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    /// Title rendered in the site header.
    pub site_title: String,
    /// Prefix for every persistence key owned by this site.
    pub storage_prefix: String,
    /// Leading line of the share message (site URL).
    pub share_text: String,
    /// Phrases shown on the button when the correct answer is picked.
    #[serde(default)]
    pub success_phrases: Vec<String>,
    /// Optional "come back tomorrow" image shown on the result screen.
    #[serde(default)]
    pub come_back_image: Option<ComeBackImage>,
}

/// Image metadata for the post-game screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComeBackImage {
    pub filename: String,
    pub alt_text: String,
}

/// Errors raised when a site configuration violates its invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SiteConfigError {
    #[error("storage prefix must not be empty")]
    EmptyPrefix,
    #[error("storage prefix must not contain whitespace: {prefix:?}")]
    PrefixWhitespace { prefix: String },
    #[error("at least one success phrase is required")]
    NoSuccessPhrases,
}

impl SiteConfig {
    /// Built-in configuration for the Beatles site.
    #[must_use]
    pub fn default_config() -> Self {
        Self {
            site_title: "The Daily Beatles".to_string(),
            storage_prefix: "dailyBeatles".to_string(),
            share_text: "daily.band/beatles".to_string(),
            success_phrases: vec!["Correct".to_string()],
            come_back_image: Some(ComeBackImage {
                filename: "tomorrow.jpg".to_string(),
                alt_text: "See you tomorrow?".to_string(),
            }),
        }
    }

    /// Check the invariants the persistence layer and reveal flow rely on.
    ///
    /// # Errors
    ///
    /// Returns `SiteConfigError` when the storage prefix cannot form valid
    /// keys or no success phrase is available for the reveal flow.
    pub fn validate(&self) -> Result<(), SiteConfigError> {
        if self.storage_prefix.is_empty() {
            return Err(SiteConfigError::EmptyPrefix);
        }
        if self.storage_prefix.chars().any(char::is_whitespace) {
            return Err(SiteConfigError::PrefixWhitespace {
                prefix: self.storage_prefix.clone(),
            });
        }
        if self.success_phrases.is_empty() {
            return Err(SiteConfigError::NoSuccessPhrases);
        }
        Ok(())
    }

    /// Pick a success phrase with the provided random source.
    ///
    /// Falls back to the first phrase when the list has a single entry, so a
    /// fixed-seed RNG yields a stable selection in tests.
    #[must_use]
    pub fn pick_success_phrase(&self, rng: &mut impl Rng) -> &str {
        match self.success_phrases.len() {
            0 => "",
            1 => &self.success_phrases[0],
            n => &self.success_phrases[rng.gen_range(0..n)],
        }
    }
}
