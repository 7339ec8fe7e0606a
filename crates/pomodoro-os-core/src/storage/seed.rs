//! Default data written when stored collections are missing or corrupt.

use chrono::{DateTime, Duration, Local, NaiveTime, TimeZone};
use rand::{Rng, SeedableRng};
use rand_pcg::Mcg128Xsl64;

use crate::records::{format_clock, format_date, LogEntry, Project, SessionKind};

const PLACEHOLDER_DAYS: i64 = 60;
const PLACEHOLDER_NOTES: &str = "Session notes placeholder...";

/// The fixed seed projects. Never empty.
pub fn default_projects() -> Vec<Project> {
    vec![
        Project::new(1, "Administrative", "Briefcase"),
        Project::new(2, "Doggo Walking", "Dog"),
        Project::new(3, "Graphic Design", "Palette"),
        Project::new(4, "Space Science Lab", "Rocket"),
        Project::new(5, "Exercise", "Dumbbell"),
        Project::new(6, "Writing", "PenTool"),
        Project::new(7, "Gaming", "Gamepad"),
    ]
}

/// Generate `count` plausible past sessions spread over the last 60 days.
///
/// The output depends only on `seed` and `now`, and is sorted newest first.
/// No entry starts after `now`.
pub fn placeholder_logs(seed: u64, count: usize, now: DateTime<Local>) -> Vec<LogEntry> {
    let mut rng = Mcg128Xsl64::seed_from_u64(seed);
    let projects = default_projects();
    let now_ms = now.timestamp_millis();

    let mut logs: Vec<LogEntry> = (0..count)
        .map(|i| {
            let days_ago = rng.gen_range(0..PLACEHOLDER_DAYS);
            let kind = if rng.gen_bool(0.7) {
                SessionKind::Pomodoro
            } else {
                SessionKind::Infinite
            };
            let duration_secs = match kind {
                SessionKind::Pomodoro => 25 * 60,
                SessionKind::Infinite => rng.gen_range(600..3600),
            };
            let hour = rng.gen_range(9..21);
            let minute = rng.gen_range(0..60);
            let project = projects[rng.gen_range(0..projects.len())].name.clone();
            let notes = if rng.gen_bool(0.3) {
                PLACEHOLDER_NOTES.to_string()
            } else {
                String::new()
            };

            let day = (now - Duration::days(days_ago)).date_naive();
            let started = NaiveTime::from_hms_opt(hour, minute, 0)
                .and_then(|t| Local.from_local_datetime(&day.and_time(t)).earliest())
                .map_or(now, |t| t.min(now));

            LogEntry {
                id: now_ms - i as i64 * 10_000,
                project,
                kind,
                start_time: format_clock(&started),
                duration_secs,
                date: format_date(&started),
                timestamp: started.timestamp_millis(),
                notes,
            }
        })
        .collect();

    logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    logs
}
