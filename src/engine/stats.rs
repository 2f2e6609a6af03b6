use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use serde::Serialize;

use crate::clock::DAY_MS;
use crate::engine::progress::{LearningAction, LearningEntry};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LearningStats {
    pub total_days: i64,
    pub total_visits: usize,
    pub completions_today: usize,
    pub streak: u32,
    pub best_streak: u32,
    /// `YYYY-MM-DD` -> completions that day.
    pub completions_by_date: BTreeMap<String, u32>,
}

/// UTC calendar date of a millisecond timestamp.
pub fn date_of(timestamp_ms: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(timestamp_ms).map(|dt| dt.date_naive())
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Integer percentage rounded half up. A zero denominator gives 0.
pub fn percent(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = part as u64;
    let whole = whole as u64;
    ((200 * part + whole) / (2 * whole)).min(100) as u8
}

pub fn compute(history: &[LearningEntry], start_date: Option<i64>, now_ms: i64) -> LearningStats {
    let today = date_of(now_ms).unwrap_or_default();

    let total_days = start_date.map_or(0, |start| {
        let elapsed = now_ms.saturating_sub(start);
        if elapsed <= 0 {
            0
        } else {
            elapsed / DAY_MS + i64::from(elapsed % DAY_MS != 0)
        }
    });

    let total_visits = history
        .iter()
        .filter(|e| e.action == LearningAction::Visit)
        .count();

    let mut by_date: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for entry in history
        .iter()
        .filter(|e| e.action == LearningAction::Complete)
    {
        if let Some(date) = date_of(entry.timestamp) {
            *by_date.entry(date).or_insert(0) += 1;
        }
    }

    let completions_today = by_date.get(&today).copied().unwrap_or(0) as usize;

    LearningStats {
        total_days,
        total_visits,
        completions_today,
        streak: current_streak(&by_date, today),
        best_streak: best_streak(&by_date),
        completions_by_date: by_date
            .into_iter()
            .map(|(date, count)| (date_key(date), count))
            .collect(),
    }
}

/// Consecutive days with a completion, counted backward from today. The
/// walk only starts if the latest completion is today or yesterday.
fn current_streak(by_date: &BTreeMap<NaiveDate, u32>, today: NaiveDate) -> u32 {
    let Some(&latest) = by_date.keys().next_back() else {
        return 0;
    };
    let start = if latest == today || Some(latest) == today.pred_opt() {
        latest
    } else {
        return 0;
    };

    let mut streak = 0;
    let mut cursor = Some(start);
    while let Some(day) = cursor {
        if by_date.get(&day).copied().unwrap_or(0) == 0 {
            break;
        }
        streak += 1;
        cursor = day.pred_opt();
    }
    streak
}

fn best_streak(by_date: &BTreeMap<NaiveDate, u32>) -> u32 {
    let mut best = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;
    for (&day, &count) in by_date {
        if count == 0 {
            run = 0;
            prev = None;
            continue;
        }
        run = match prev {
            Some(p) if p.succ_opt() == Some(day) => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(day);
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ts(y: i32, m: u32, d: u32, h: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0)
            .unwrap()
            .timestamp_millis()
    }

    fn complete(timestamp: i64) -> LearningEntry {
        LearningEntry {
            section_id: "chapter-01/section-01".to_string(),
            timestamp,
            action: LearningAction::Complete,
        }
    }

    fn visit(timestamp: i64) -> LearningEntry {
        LearningEntry {
            section_id: "chapter-01/section-01".to_string(),
            timestamp,
            action: LearningAction::Visit,
        }
    }

    #[test]
    fn test_percent_rounds_half_up() {
        assert_eq!(percent(1, 3), 33);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(1, 200), 1);
        assert_eq!(percent(0, 5), 0);
        assert_eq!(percent(5, 5), 100);
        assert_eq!(percent(3, 0), 0);
        assert_eq!(percent(7, 5), 100);
    }

    #[test]
    fn test_empty_history() {
        let stats = compute(&[], None, ts(2024, 3, 15, 12));
        assert_eq!(stats, LearningStats::default());
    }

    #[test]
    fn test_total_days_rounds_up() {
        let now = ts(2024, 3, 15, 12);
        assert_eq!(compute(&[], Some(now), now).total_days, 0);
        assert_eq!(compute(&[], Some(now - 1), now).total_days, 1);
        assert_eq!(compute(&[], Some(now - DAY_MS), now).total_days, 1);
        assert_eq!(compute(&[], Some(now - DAY_MS - 1), now).total_days, 2);
        assert_eq!(compute(&[], Some(now + DAY_MS), now).total_days, 0);
    }

    #[test]
    fn test_total_days_with_extreme_start_dates() {
        let now = ts(2024, 3, 15, 12);
        let max_days = i64::MAX / DAY_MS + 1;
        assert_eq!(compute(&[], Some(i64::MIN), now).total_days, max_days);
        assert_eq!(compute(&[], Some(i64::MAX), now).total_days, 0);
        assert_eq!(compute(&[], Some(i64::MIN), i64::MAX).total_days, max_days);
    }

    #[test]
    fn test_counts_and_buckets() {
        let now = ts(2024, 3, 15, 18);
        let history = vec![
            visit(ts(2024, 3, 14, 9)),
            complete(ts(2024, 3, 14, 10)),
            visit(ts(2024, 3, 15, 9)),
            complete(ts(2024, 3, 15, 10)),
            complete(ts(2024, 3, 15, 11)),
        ];
        let stats = compute(&history, Some(ts(2024, 3, 14, 9)), now);
        assert_eq!(stats.total_visits, 2);
        assert_eq!(stats.completions_today, 2);
        assert_eq!(stats.completions_by_date.get("2024-03-14"), Some(&1));
        assert_eq!(stats.completions_by_date.get("2024-03-15"), Some(&2));
        assert_eq!(stats.completions_by_date.len(), 2);
    }

    #[test]
    fn test_streak_today_and_yesterday() {
        let now = ts(2024, 3, 15, 12);
        let history = vec![complete(ts(2024, 3, 14, 8)), complete(ts(2024, 3, 15, 8))];
        assert_eq!(compute(&history, None, now).streak, 2);
    }

    #[test]
    fn test_streak_starts_yesterday() {
        let now = ts(2024, 3, 15, 12);
        let history = vec![
            complete(ts(2024, 3, 12, 8)),
            complete(ts(2024, 3, 13, 8)),
            complete(ts(2024, 3, 14, 8)),
        ];
        assert_eq!(compute(&history, None, now).streak, 3);
    }

    #[test]
    fn test_streak_broken_by_gap_before_today() {
        let now = ts(2024, 3, 15, 12);
        let history = vec![complete(ts(2024, 3, 13, 8))];
        assert_eq!(compute(&history, None, now).streak, 0);

        let history = vec![
            complete(ts(2024, 3, 11, 8)),
            complete(ts(2024, 3, 12, 8)),
            complete(ts(2024, 3, 13, 8)),
        ];
        let stats = compute(&history, None, now);
        assert_eq!(stats.streak, 0);
        assert_eq!(stats.best_streak, 3);
    }

    #[test]
    fn test_streak_stops_at_first_gap() {
        let now = ts(2024, 3, 15, 12);
        let history = vec![
            complete(ts(2024, 3, 10, 8)),
            complete(ts(2024, 3, 11, 8)),
            complete(ts(2024, 3, 14, 8)),
            complete(ts(2024, 3, 15, 8)),
        ];
        let stats = compute(&history, None, now);
        assert_eq!(stats.streak, 2);
        assert_eq!(stats.best_streak, 2);
    }

    #[test]
    fn test_streak_ignores_visits() {
        let now = ts(2024, 3, 15, 12);
        let history = vec![visit(ts(2024, 3, 14, 8)), visit(ts(2024, 3, 15, 8))];
        assert_eq!(compute(&history, None, now).streak, 0);
    }

    #[test]
    fn test_future_completion_has_no_streak() {
        let now = ts(2024, 3, 15, 12);
        let history = vec![complete(ts(2024, 3, 15, 8)), complete(ts(2024, 3, 17, 8))];
        assert_eq!(compute(&history, None, now).streak, 0);
    }

    #[test]
    fn test_dates_are_utc() {
        let near_midnight = ts(2024, 3, 15, 23) + 59 * 60 * 1000;
        assert_eq!(date_key(date_of(near_midnight).unwrap()), "2024-03-15");
        assert_eq!(date_key(date_of(near_midnight + 60 * 1000).unwrap()), "2024-03-16");
    }
}
