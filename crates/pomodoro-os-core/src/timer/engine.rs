//! Session engine implementation.
//!
//! The engine is a single-threaded state machine over a Pomodoro countdown
//! or an Infinite count-up. It does not own a thread: it registers a
//! periodic tick with its [`TickScheduler`] while running and the caller
//! forwards each tick to [`SessionEngine::on_tick`] (or calls
//! [`SessionEngine::tick`] directly).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> start() -> Running -> finish() | switch_mode() | countdown hits 0 -> Idle
//! ```
//!
//! Leaving `Running` always commits: the elapsed time becomes a log entry
//! if it reaches the configured threshold, and the timer resets either way.
//!
//! ## Usage
//!
//! ```ignore
//! let store = LogStore::new(Database::open()?, config.storage.clone());
//! let mut engine = SessionEngine::new(store, ManualTicker::new(), &config)?;
//! engine.start();
//! // once per second:
//! engine.tick()?; // Returns Some(Event) when the countdown completes
//! ```

use std::path::Path;

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::debug;

use super::clock::{Clock, SystemClock};
use super::ticker::{TickHandle, TickScheduler};
use crate::error::Result;
use crate::events::Event;
use crate::notification::{self, Notification};
use crate::records::{
    format_clock, format_date, format_duration, LogEntry, Project, SessionKind, StreakedEntry,
};
use crate::storage::{
    data_dir, Config, Database, KvStore, LogStore, NotificationsConfig, TimerConfig,
};
use crate::streak::annotate_streaks;

/// Everything the rendering layer reads from the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineSnapshot {
    pub mode: SessionKind,
    pub remaining_secs: u64,
    /// `remaining_secs` as `M:SS`.
    pub display: String,
    pub is_running: bool,
    pub selected_project: Option<String>,
    pub notes: String,
    pub notification: Option<String>,
}

/// Core session engine.
///
/// Owns the timer state, the project selection, the notes buffer and the
/// current notification, and commits finished sessions to its [`LogStore`].
pub struct SessionEngine<S, T: TickScheduler, C> {
    store: LogStore<S, C>,
    ticker: T,
    clock: C,
    timer: TimerConfig,
    notifications: NotificationsConfig,
    mode: SessionKind,
    /// Seconds left (Pomodoro) or counted so far (Infinite).
    remaining: u64,
    /// Live tick registration; `Some` exactly while running.
    tick: Option<TickHandle>,
    started_at: Option<DateTime<Local>>,
    selected_project: Option<String>,
    notes: String,
    notification: Option<Notification>,
    projects: Vec<Project>,
    logs: Vec<LogEntry>,
}

impl<S, T, C> SessionEngine<S, T, C>
where
    S: KvStore,
    T: TickScheduler,
    C: Clock + Clone,
{
    /// Load projects and logs from `store` and start idle in Pomodoro mode.
    ///
    /// The first project is selected.
    pub fn new(mut store: LogStore<S, C>, ticker: T, config: &Config) -> Result<Self> {
        let projects = store.load_projects()?;
        let logs = store.load_logs()?;
        let clock = store.clock().clone();
        let selected_project = projects.first().map(|p| p.name.clone());
        let mode = SessionKind::Pomodoro;

        Ok(Self {
            store,
            ticker,
            clock,
            remaining: mode.reset_value(config.timer.pomodoro_secs),
            timer: config.timer.clone(),
            notifications: config.notifications.clone(),
            mode,
            tick: None,
            started_at: None,
            selected_project,
            notes: String::new(),
            notification: None,
            projects,
            logs,
        })
    }

}

impl<T: TickScheduler> SessionEngine<Database, T, SystemClock> {
    /// Open the config and database under the default data directory.
    pub fn open(ticker: T) -> Result<Self> {
        Self::open_in(data_dir()?, ticker)
    }

    /// Open `config.toml` and `pomodoro-os.db` under `dir`, creating both
    /// when missing.
    pub fn open_in(dir: impl AsRef<Path>, ticker: T) -> Result<Self> {
        let dir = dir.as_ref();
        let config = Config::load_from(dir.join("config.toml"))?;
        let db = Database::open_at(dir.join("pomodoro-os.db"))?;
        let store = LogStore::new(db, config.storage.clone());
        Self::new(store, ticker, &config)
    }
}

impl<S, T, C> SessionEngine<S, T, C>
where
    S: KvStore,
    T: TickScheduler,
    C: Clock + Clone,
{
    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> SessionKind {
        self.mode
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.tick.is_some()
    }

    /// When the current session started running, if one is in progress.
    pub fn started_at(&self) -> Option<DateTime<Local>> {
        self.started_at
    }

    pub fn selected_project(&self) -> Option<&str> {
        self.selected_project.as_deref()
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// The current notification, unless it has expired.
    pub fn notification(&self) -> Option<&Notification> {
        let now_ms = self.clock.now_ms();
        self.notification.as_ref().filter(|n| n.is_visible(now_ms))
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Log entries as stored, newest commit first.
    pub fn logs(&self) -> &[LogEntry] {
        &self.logs
    }

    /// Log entries with their streaks, newest first.
    pub fn logs_with_streaks(&self) -> Vec<StreakedEntry> {
        annotate_streaks(&self.logs)
    }

    pub fn tick_handle(&self) -> Option<TickHandle> {
        self.tick
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    pub fn store(&self) -> &LogStore<S, C> {
        &self.store
    }

    /// Seconds worked in the current session so far.
    pub fn elapsed(&self) -> u64 {
        self.mode.elapsed(self.remaining, self.timer.pomodoro_secs)
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            mode: self.mode,
            remaining_secs: self.remaining,
            display: format_duration(self.remaining),
            is_running: self.is_running(),
            selected_project: self.selected_project.clone(),
            notes: self.notes.clone(),
            notification: self.notification().map(|n| n.message.clone()),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start running. Does nothing if already running.
    pub fn start(&mut self) -> Option<Event> {
        if self.is_running() {
            return None;
        }
        let now = self.clock.now();
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
        let handle = self.ticker.schedule(self.timer.tick_interval());
        self.tick = Some(handle);
        debug!(
            tick = handle.id(),
            mode = ?self.mode,
            remaining = self.remaining,
            "session started"
        );
        Some(Event::SessionStarted {
            mode: self.mode,
            remaining_secs: self.remaining,
            at: now,
        })
    }

    /// Advance the timer by one second.
    ///
    /// Returns the completion event when a Pomodoro countdown reaches zero.
    pub fn tick(&mut self) -> Result<Option<Event>> {
        if !self.is_running() {
            return Ok(None);
        }
        match self.mode {
            SessionKind::Pomodoro => {
                self.remaining = self.remaining.saturating_sub(1);
                if self.remaining == 0 {
                    return self.complete().map(Some);
                }
            }
            SessionKind::Infinite => {
                self.remaining = self.remaining.saturating_add(1);
            }
        }
        Ok(None)
    }

    /// Deliver a tick from the scheduler. Ticks from cancelled registrations
    /// are dropped.
    pub fn on_tick(&mut self, handle: TickHandle) -> Result<Option<Event>> {
        if self.tick != Some(handle) {
            debug!(tick = handle.id(), "stale tick ignored");
            return Ok(None);
        }
        self.tick()
    }

    /// End the running session, committing it if long enough.
    pub fn finish(&mut self) -> Result<Option<Event>> {
        if !self.is_running() {
            return Ok(None);
        }
        self.complete().map(Some)
    }

    /// Change mode, committing any running session first.
    pub fn switch_mode(&mut self, mode: SessionKind) -> Result<Event> {
        let from = self.mode;
        let committed = if self.is_running() {
            self.complete()?.committed_entry().cloned()
        } else {
            None
        };

        self.stop_ticking();
        self.mode = mode;
        self.remaining = mode.reset_value(self.timer.pomodoro_secs);
        self.started_at = None;
        debug!(from = ?from, to = ?mode, "mode switched");

        Ok(Event::ModeSwitched {
            from,
            to: mode,
            committed,
            at: self.clock.now(),
        })
    }

    /// Select the project new sessions are logged against.
    ///
    /// Returns `false` and keeps the current selection if no project has
    /// that name.
    pub fn select_project(&mut self, name: &str) -> bool {
        if !self.projects.iter().any(|p| p.name == name) {
            return false;
        }
        self.selected_project = Some(name.to_string());
        true
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Add a project. Blank names are ignored.
    pub fn add_project(&mut self, name: &str, icon: &str) -> Result<Option<Event>> {
        let (added, projects) = self.store.add_project(name, icon)?;
        self.projects = projects;
        let Some(project) = added else {
            return Ok(None);
        };
        if self.selected_project.is_none() {
            self.selected_project = Some(project.name.clone());
        }
        self.notify(notification::PROJECT_ADDED);
        Ok(Some(Event::ProjectAdded {
            project,
            at: self.clock.now(),
        }))
    }

    /// Delete a project by id. Unknown ids are ignored.
    ///
    /// If the deleted project was selected, the first remaining project is
    /// selected instead, or nothing if none remain.
    pub fn delete_project(&mut self, id: i64) -> Result<Option<Event>> {
        let (removed, projects) = self.store.delete_project(id)?;
        self.projects = projects;
        let Some(project) = removed else {
            return Ok(None);
        };
        let still_selected = self
            .selected_project
            .as_deref()
            .is_some_and(|name| self.projects.iter().any(|p| p.name == name));
        if !still_selected {
            self.selected_project = self.projects.first().map(|p| p.name.clone());
            debug!(selected = ?self.selected_project, "selection fell back");
        }
        Ok(Some(Event::ProjectDeleted {
            project,
            selected: self.selected_project.clone(),
            at: self.clock.now(),
        }))
    }

    /// Delete a log entry by id. Unknown ids are ignored.
    pub fn delete_log(&mut self, id: i64) -> Result<Option<Event>> {
        let (removed, logs) = self.store.delete_log(id)?;
        self.logs = logs;
        let Some(entry) = removed else {
            return Ok(None);
        };
        self.notify(notification::LOG_DELETED);
        Ok(Some(Event::LogDeleted {
            entry,
            at: self.clock.now(),
        }))
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Leave `Running`: reset the timer, then record the session if it
    /// reached the threshold.
    fn complete(&mut self) -> Result<Event> {
        let now = self.clock.now();
        let mode = self.mode;
        let elapsed = self.elapsed();
        let started_at = self.started_at.take();

        self.stop_ticking();
        self.remaining = mode.reset_value(self.timer.pomodoro_secs);
        self.notify(notification::SESSION_COMPLETE);

        let started_at = match started_at {
            Some(at) if elapsed >= self.timer.min_commit_secs => at,
            _ => {
                debug!(
                    elapsed,
                    threshold = self.timer.min_commit_secs,
                    "session below threshold, not recorded"
                );
                return Ok(Event::SessionDiscarded {
                    mode,
                    elapsed_secs: elapsed,
                    at: now,
                });
            }
        };

        let entry = LogEntry {
            id: now.timestamp_millis(),
            project: self.selected_project.clone().unwrap_or_default(),
            kind: mode,
            start_time: format_clock(&started_at),
            duration_secs: elapsed,
            date: format_date(&now),
            timestamp: now.timestamp_millis(),
            notes: self.notes.clone(),
        };
        let (entry, logs) = self.store.append_log(entry)?;
        self.logs = logs;
        self.notes.clear();
        debug!(
            id = entry.id,
            duration = %format_duration(entry.duration_secs),
            "session recorded"
        );

        Ok(Event::SessionCommitted { entry, at: now })
    }

    fn stop_ticking(&mut self) {
        if let Some(handle) = self.tick.take() {
            self.ticker.cancel(handle);
            debug!(tick = handle.id(), "tick cancelled");
        }
    }

    fn notify(&mut self, message: &str) {
        self.notification = Some(Notification::new(
            message,
            self.clock.now_ms(),
            self.notifications.dismiss_after_ms,
        ));
    }
}

impl<S, T: TickScheduler, C> Drop for SessionEngine<S, T, C> {
    fn drop(&mut self) {
        if let Some(handle) = self.tick.take() {
            self.ticker.cancel(handle);
        }
    }
}
