//! Durable project and session-log collections.
//!
//! Each collection lives under its own key as a JSON array. Reads validate
//! the stored value and self-heal: an absent, unparsable or wrong-shaped
//! value is replaced by the default, which is written back immediately.
//! Every mutation rewrites the full collection.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use super::config::{LogSeed, StorageConfig};
use super::kv::KvStore;
use super::seed;
use crate::error::Result;
use crate::records::{LogEntry, Project};
use crate::timer::{Clock, SystemClock};

/// Project and log persistence over a [`KvStore`].
pub struct LogStore<S, C = SystemClock> {
    backend: S,
    config: StorageConfig,
    clock: C,
}

impl<S: KvStore> LogStore<S, SystemClock> {
    pub fn new(backend: S, config: StorageConfig) -> Self {
        Self::with_clock(backend, config, SystemClock)
    }
}

impl<S: KvStore, C: Clock> LogStore<S, C> {
    pub fn with_clock(backend: S, config: StorageConfig, clock: C) -> Self {
        Self {
            backend,
            config,
            clock,
        }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    /// Stored projects, or the seed projects if the stored value is unusable.
    pub fn load_projects(&mut self) -> Result<Vec<Project>> {
        self.read_projects(false)
    }

    /// Stored log entries, or the configured default if unusable.
    ///
    /// An empty stored array is a valid, empty history.
    pub fn load_logs(&mut self) -> Result<Vec<LogEntry>> {
        let key = self.config.logs_key.clone();
        match self.read_array::<LogEntry>(&key)? {
            Some(logs) if ids_are_unique(logs.iter().map(|l| l.id)) => Ok(logs),
            _ => {
                let defaults = self.default_logs();
                self.save_logs(&defaults)?;
                Ok(defaults)
            }
        }
    }

    pub fn save_projects(&mut self, projects: &[Project]) -> Result<()> {
        let key = self.config.projects_key.clone();
        self.write_array(&key, projects)
    }

    pub fn save_logs(&mut self, logs: &[LogEntry]) -> Result<()> {
        let key = self.config.logs_key.clone();
        self.write_array(&key, logs)
    }

    /// Prepend `entry` to the stored log, reassigning its id if taken.
    ///
    /// Returns the entry as stored and the full updated collection.
    pub fn append_log(&mut self, mut entry: LogEntry) -> Result<(LogEntry, Vec<LogEntry>)> {
        let mut logs = self.load_logs()?;
        entry.id = unique_id(entry.id, logs.iter().map(|l| l.id));
        logs.insert(0, entry.clone());
        self.save_logs(&logs)?;
        info!(
            id = entry.id,
            project = %entry.project,
            duration_secs = entry.duration_secs,
            "log entry committed"
        );
        Ok((entry, logs))
    }

    /// Remove the entry with `id`. Unknown ids leave storage untouched.
    pub fn delete_log(&mut self, id: i64) -> Result<(Option<LogEntry>, Vec<LogEntry>)> {
        let mut logs = self.load_logs()?;
        let Some(pos) = logs.iter().position(|l| l.id == id) else {
            return Ok((None, logs));
        };
        let removed = logs.remove(pos);
        self.save_logs(&logs)?;
        info!(id, "log entry deleted");
        Ok((Some(removed), logs))
    }

    /// Append a project named `name`. Blank names are ignored.
    pub fn add_project(
        &mut self,
        name: &str,
        icon: &str,
    ) -> Result<(Option<Project>, Vec<Project>)> {
        let mut projects = self.read_projects(true)?;
        if name.trim().is_empty() {
            return Ok((None, projects));
        }
        let id = unique_id(self.clock.now_ms(), projects.iter().map(|p| p.id));
        let project = Project::new(id, name, icon);
        projects.push(project.clone());
        self.save_projects(&projects)?;
        info!(id, name, "project added");
        Ok((Some(project), projects))
    }

    /// Remove the project with `id`. Unknown ids leave storage untouched.
    ///
    /// Removing the last project leaves an empty collection in storage;
    /// [`LogStore::load_projects`] reseeds it, the mutators do not.
    pub fn delete_project(&mut self, id: i64) -> Result<(Option<Project>, Vec<Project>)> {
        let mut projects = self.read_projects(true)?;
        let Some(pos) = projects.iter().position(|p| p.id == id) else {
            return Ok((None, projects));
        };
        let removed = projects.remove(pos);
        self.save_projects(&projects)?;
        info!(id, name = %removed.name, "project deleted");
        Ok((Some(removed), projects))
    }

    /// Stored projects, healing unusable values. An empty list only counts
    /// as unusable when `allow_empty` is false.
    fn read_projects(&mut self, allow_empty: bool) -> Result<Vec<Project>> {
        let key = self.config.projects_key.clone();
        match self.read_array::<Project>(&key)? {
            Some(projects) if allow_empty && projects.is_empty() => Ok(projects),
            Some(projects) if projects_are_valid(&projects) => Ok(projects),
            _ => {
                let defaults = seed::default_projects();
                self.save_projects(&defaults)?;
                Ok(defaults)
            }
        }
    }

    fn default_logs(&self) -> Vec<LogEntry> {
        match self.config.log_seed {
            LogSeed::Empty => Vec::new(),
            LogSeed::Placeholder { seed, count } => {
                seed::placeholder_logs(seed, count, self.clock.now())
            }
        }
    }

    /// `Ok(None)` when the key is absent or its value is not an array of `T`.
    fn read_array<T: DeserializeOwned>(&self, key: &str) -> Result<Option<Vec<T>>> {
        let Some(raw) = self.backend.get(key)? else {
            warn!(key, "no stored value, writing default");
            return Ok(None);
        };
        match serde_json::from_str::<Vec<T>>(&raw) {
            Ok(items) => Ok(Some(items)),
            Err(e) => {
                warn!(key, error = %e, "stored value is malformed, resetting to default");
                Ok(None)
            }
        }
    }

    fn write_array<T: Serialize>(&mut self, key: &str, items: &[T]) -> Result<()> {
        let json = serde_json::to_string(items)?;
        self.backend.set(key, &json)?;
        Ok(())
    }
}

fn projects_are_valid(projects: &[Project]) -> bool {
    if projects.is_empty() {
        warn!("stored project list is empty, reseeding");
        return false;
    }
    if projects.iter().any(|p| p.name.trim().is_empty()) {
        warn!("stored project with empty name, reseeding");
        return false;
    }
    ids_are_unique(projects.iter().map(|p| p.id))
}

fn ids_are_unique(ids: impl Iterator<Item = i64>) -> bool {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            warn!(id, "duplicate id in stored collection");
            return false;
        }
    }
    true
}

/// `candidate` if free, otherwise one past the largest existing id, or the
/// nearest free id below `candidate` when that would overflow.
fn unique_id(candidate: i64, existing: impl Iterator<Item = i64> + Clone) -> i64 {
    let taken = |id: i64| existing.clone().any(|e| e == id);
    if !taken(candidate) {
        return candidate;
    }
    existing
        .clone()
        .max()
        .and_then(|max| max.checked_add(1))
        .or_else(|| (i64::MIN..candidate).rev().find(|&id| !taken(id)))
        .unwrap_or(candidate)
}
