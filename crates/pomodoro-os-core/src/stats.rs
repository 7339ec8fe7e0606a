//! Display aggregates over the session log.

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::records::{format_date, LogEntry, StreakedEntry};

/// Entries that share one `date` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayGroup {
    pub date: String,
    pub entries: Vec<StreakedEntry>,
}

/// Group entries by `date`, keeping the order in which dates first appear.
pub fn group_by_date(entries: &[StreakedEntry]) -> Vec<DayGroup> {
    let mut groups: Vec<DayGroup> = Vec::new();
    for entry in entries {
        match groups.iter_mut().find(|g| g.date == entry.entry.date) {
            Some(group) => group.entries.push(entry.clone()),
            None => groups.push(DayGroup {
                date: entry.entry.date.clone(),
                entries: vec![entry.clone()],
            }),
        }
    }
    groups
}

/// Whole minutes of every session logged on `date`.
///
/// Each entry contributes only the minutes part of its duration.
pub fn focus_minutes_on(logs: &[LogEntry], date: &str) -> u64 {
    logs.iter()
        .filter(|log| log.date == date)
        .map(|log| log.duration_secs / 60)
        .sum()
}

pub fn today_focus_minutes(logs: &[LogEntry], now: &DateTime<Local>) -> u64 {
    focus_minutes_on(logs, &format_date(now))
}
