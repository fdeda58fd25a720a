//! Lifetime statistics derived from dated daily results.
//!
//! Pure computation: the engine owns no state and is recomputed on demand
//! from whatever daily results currently sit in the store.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::keys::StorageKeys;
use crate::progress::ProgressStore;
use crate::record::DailyResult;

/// Derived lifetime statistics. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Count of recorded daily results.
    pub played: u32,
    /// Mean percentage score rounded to a whole point, expressed on a 0-10
    /// scale with one fractional digit (83.4% -> 8.3).
    pub avg_score: f64,
    /// Streak value at the most recent recorded date. Deliberately not
    /// checked against "today"; a lapsed streak only resets once a newer
    /// result lands and the walk recomputes.
    pub current_streak: u32,
    pub max_streak: u32,
}

/// Collect every daily result under the key space, sorted ascending by date.
#[must_use]
pub fn gather_daily_results<S: ProgressStore>(
    store: &S,
    keys: &StorageKeys,
) -> Vec<(NaiveDate, DailyResult)> {
    let mut entries: Vec<(NaiveDate, DailyResult)> = store
        .keys_with_prefix(keys.prefix())
        .into_iter()
        .filter_map(|key| {
            let date = keys.daily_date(&key)?;
            let result: DailyResult = store.get(&key)?;
            Some((date, result))
        })
        .collect();
    entries.sort_by_key(|(date, _)| *date);
    entries
}

/// Compute lifetime statistics from date-sorted daily results.
#[must_use]
pub fn compute_stats(entries: &[(NaiveDate, DailyResult)]) -> Stats {
    if entries.is_empty() {
        return Stats::default();
    }

    let mut total_pct = 0.0;
    let mut streak = 0u32;
    let mut max_streak = 0u32;
    let mut prev_date: Option<NaiveDate> = None;

    for (date, result) in entries {
        total_pct += result.percentage();
        streak = match prev_date {
            Some(prev) if prev.succ_opt() == Some(*date) => streak + 1,
            _ => 1,
        };
        max_streak = max_streak.max(streak);
        prev_date = Some(*date);
    }

    let played = u32::try_from(entries.len()).unwrap_or(u32::MAX);
    let avg_score = (total_pct / f64::from(played)).round() / 10.0;
    Stats {
        played,
        avg_score,
        // The walk ends on the newest entry, so this is its streak value.
        current_streak: streak,
        max_streak,
    }
}

/// Gather and compute in one step, as the session does on completion.
#[must_use]
pub fn stats_from_store<S: ProgressStore>(store: &S, keys: &StorageKeys) -> Stats {
    compute_stats(&gather_daily_results(store, keys))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::MemoryStore;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn result(score: u32, total: u32) -> DailyResult {
        DailyResult {
            score,
            total_questions: total,
            results: (0..total).map(|i| i < score).collect(),
        }
    }

    #[test]
    fn empty_history_is_all_zeroes() {
        let stats = compute_stats(&[]);
        assert_eq!(stats, Stats::default());
    }

    #[test]
    fn avg_score_rounds_to_one_fractional_digit() {
        // 3/5 -> 60%, 5/5 -> 100%; mean 80 -> 8.0
        let entries = vec![
            (date("2024-01-01"), result(3, 5)),
            (date("2024-01-02"), result(5, 5)),
        ];
        let stats = compute_stats(&entries);
        assert_eq!(stats.played, 2);
        assert!((stats.avg_score - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn avg_score_rounds_percentage_before_scaling() {
        // 5/6 -> 83.33..%; round -> 83 -> 8.3
        let entries = vec![(date("2024-01-01"), result(5, 6))];
        let stats = compute_stats(&entries);
        assert!((stats.avg_score - 8.3).abs() < f64::EPSILON);
    }

    #[test]
    fn consecutive_days_extend_the_streak() {
        let entries = vec![
            (date("2024-01-01"), result(4, 5)),
            (date("2024-01-02"), result(4, 5)),
            (date("2024-01-03"), result(4, 5)),
        ];
        let stats = compute_stats(&entries);
        assert_eq!(stats.max_streak, 3);
        assert_eq!(stats.current_streak, 3);
    }

    #[test]
    fn gap_resets_the_streak() {
        let entries = vec![
            (date("2024-01-01"), result(4, 5)),
            (date("2024-01-03"), result(4, 5)),
        ];
        let stats = compute_stats(&entries);
        assert_eq!(stats.max_streak, 1);
        assert_eq!(stats.current_streak, 1);
    }

    #[test]
    fn current_streak_tracks_last_entry_not_today() {
        // A long-lapsed streak still reads as 2 until a newer result lands.
        let entries = vec![
            (date("2023-06-01"), result(5, 5)),
            (date("2023-06-02"), result(5, 5)),
        ];
        let stats = compute_stats(&entries);
        assert_eq!(stats.current_streak, 2);
    }

    #[test]
    fn month_boundary_counts_as_consecutive() {
        let entries = vec![
            (date("2024-01-31"), result(4, 5)),
            (date("2024-02-01"), result(4, 5)),
        ];
        let stats = compute_stats(&entries);
        assert_eq!(stats.current_streak, 2);
    }

    #[test]
    fn gather_ignores_puzzle_records_and_corruption() {
        let store = MemoryStore::new();
        let keys = StorageKeys::new("dailyBeatles");
        store.set("dailyBeatles_142", &result(3, 5)).unwrap();
        store.set("dailyBeatles_2024-01-02", &result(5, 5)).unwrap();
        store.set("dailyBeatles_2024-01-01", &result(3, 5)).unwrap();
        store.set_raw("dailyBeatles_2024-01-03", "{broken");

        let entries = gather_daily_results(&store, &keys);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, date("2024-01-01"));
        assert_eq!(entries[1].0, date("2024-01-02"));
    }

    #[test]
    fn stats_payload_serializes_camel_case() {
        let stats = Stats {
            played: 2,
            avg_score: 8.0,
            current_streak: 2,
            max_streak: 2,
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(
            json,
            r#"{"played":2,"avgScore":8.0,"currentStreak":2,"maxStreak":2}"#
        );
    }
}
