//! Consecutive-day streaks over the session log.
//!
//! Streaks are derived data: recomputed from the full log whenever it
//! changes and never stored.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::records::{LogEntry, SessionKind, StreakedEntry};

/// Streak count for every entry, keyed by entry id.
///
/// Entries are walked in ascending `timestamp` order. A Pomodoro entry whose
/// day is at most one day away from the previous Pomodoro day extends the
/// running streak, otherwise it starts a new one at 1. Infinite entries and
/// entries whose `date` does not parse get 0 and leave the running streak
/// untouched.
pub fn compute_streaks(logs: &[LogEntry]) -> HashMap<i64, u32> {
    let mut ordered: Vec<&LogEntry> = logs.iter().collect();
    ordered.sort_by_key(|log| log.timestamp);

    let mut streaks = HashMap::with_capacity(logs.len());
    let mut current: u32 = 0;
    let mut last_day: Option<NaiveDate> = None;

    for log in ordered {
        if log.kind != SessionKind::Pomodoro {
            streaks.insert(log.id, 0);
            continue;
        }
        let Some(day) = log.day() else {
            streaks.insert(log.id, 0);
            continue;
        };

        current = match last_day {
            Some(prev) if (day - prev).num_days().abs() <= 1 => current.saturating_add(1),
            _ => 1,
        };
        last_day = Some(day);
        streaks.insert(log.id, current);
    }

    streaks
}

/// Entries paired with their streak, newest first.
pub fn annotate_streaks(logs: &[LogEntry]) -> Vec<StreakedEntry> {
    let streaks = compute_streaks(logs);
    let mut annotated: Vec<StreakedEntry> = logs
        .iter()
        .map(|entry| StreakedEntry {
            streak: streaks.get(&entry.id).copied().unwrap_or(0),
            entry: entry.clone(),
        })
        .collect();
    annotated.sort_by(|a, b| b.entry.timestamp.cmp(&a.entry.timestamp));
    annotated
}
