//! Share text for a finished puzzle.
//!
//! Only the text is generated here; delivering it (clipboard, native share
//! sheet) is a platform concern, as is recovering when that delivery fails.
use crate::config::SiteConfig;
use crate::session::CompletionSummary;

const BOX_CORRECT: &str = "🟩";
const BOX_INCORRECT: &str = "⬛";

/// Build the share block:
///
/// ```text
/// daily.band/beatles #142
///
/// 4/5
/// 🟩🟩⬛🟩🟩
/// ```
#[must_use]
pub fn share_message(share_text: &str, puzzle_number: u32, results: &[bool]) -> String {
    let score = results.iter().filter(|correct| **correct).count();
    let boxes: String = results
        .iter()
        .map(|correct| if *correct { BOX_CORRECT } else { BOX_INCORRECT })
        .collect();
    format!(
        "{share_text} #{puzzle_number}\n\n{score}/{total}\n{boxes}",
        total = results.len()
    )
}

/// Share block for a completion summary under a site's configuration.
#[must_use]
pub fn share_message_for(config: &SiteConfig, summary: &CompletionSummary) -> String {
    share_message(&config.share_text, summary.puzzle_number, &summary.results)
}
