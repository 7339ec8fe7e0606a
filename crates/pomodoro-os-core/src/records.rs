//! Persisted record types: projects and session log entries.
//!
//! Field names and text encodings follow the stored JSON layout:
//!
//! ```text
//! Project  {id, name, icon}
//! LogEntry {id, project, type, startTime, duration, date, timestamp, notes}
//! ```
//!
//! `duration` is stored as `"M:SS"` text and `date` as `"DD/MM/YYYY"`.

use chrono::{DateTime, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

/// Display format of [`LogEntry::date`].
pub const DATE_FORMAT: &str = "%d/%m/%Y";
/// Display format of [`LogEntry::start_time`].
pub const CLOCK_FORMAT: &str = "%H:%M";

/// A user-defined target that sessions are logged against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    /// Symbolic key into the icon registry. Unknown keys are kept as-is.
    pub icon: String,
}

impl Project {
    pub fn new(id: i64, name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            icon: icon.into(),
        }
    }
}

/// Timer mode, and the kind of a committed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionKind {
    /// Countdown from the full Pomodoro duration.
    #[serde(rename = "Pomodoro session")]
    Pomodoro,
    /// Count-up from zero without bound.
    #[serde(rename = "Infinite session")]
    Infinite,
}

impl SessionKind {
    /// Value `remaining` is reset to when this mode goes idle.
    pub fn reset_value(self, pomodoro_secs: u64) -> u64 {
        match self {
            SessionKind::Pomodoro => pomodoro_secs,
            SessionKind::Infinite => 0,
        }
    }

    /// Seconds worked so far given the current timer value.
    pub fn elapsed(self, remaining: u64, pomodoro_secs: u64) -> u64 {
        match self {
            SessionKind::Pomodoro => pomodoro_secs.saturating_sub(remaining),
            SessionKind::Infinite => remaining,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SessionKind::Pomodoro => "Pomodoro session",
            SessionKind::Infinite => "Infinite session",
        }
    }
}

/// One committed work session. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    /// Project name as it was at commit time.
    pub project: String,
    #[serde(rename = "type")]
    pub kind: SessionKind,
    /// Wall-clock `HH:MM` captured when the session started running.
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "duration", with = "duration_text")]
    pub duration_secs: u64,
    /// Commit day as `DD/MM/YYYY`.
    pub date: String,
    /// Commit instant in epoch milliseconds.
    pub timestamp: i64,
    #[serde(default)]
    pub notes: String,
}

impl LogEntry {
    /// Calendar day of the entry, or `None` if `date` does not parse.
    pub fn day(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }
}

/// A log entry annotated with its consecutive-day streak. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakedEntry {
    #[serde(flatten)]
    pub entry: LogEntry,
    pub streak: u32,
}

/// Formats seconds as `M:SS` with unbounded minutes.
pub fn format_duration(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Parses `M:SS` text. Seconds must be two digits below 60.
pub fn parse_duration(text: &str) -> Option<u64> {
    let (mins, secs) = text.trim().split_once(':')?;
    if mins.is_empty() || secs.len() != 2 {
        return None;
    }
    if !mins.bytes().all(|b| b.is_ascii_digit()) || !secs.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mins: u64 = mins.parse().ok()?;
    let secs: u64 = secs.parse().ok()?;
    if secs >= 60 {
        return None;
    }
    mins.checked_mul(60)?.checked_add(secs)
}

pub fn format_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(DATE_FORMAT).to_string()
}

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

pub fn format_clock<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format(CLOCK_FORMAT).to_string()
}

mod duration_text {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(secs: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_duration(*secs))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let text = String::deserialize(deserializer)?;
        super::parse_duration(&text)
            .ok_or_else(|| de::Error::custom(format!("invalid duration '{text}', expected M:SS")))
    }
}
