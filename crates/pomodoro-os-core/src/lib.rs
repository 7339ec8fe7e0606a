//! # Pomodoro OS Core Library
//!
//! Core logic for a local productivity timer: focused work sessions are
//! timed against user-defined projects, committed to a persistent session
//! log, and annotated with consecutive-day streaks for display.
//!
//! ## Architecture
//!
//! - **Session Engine**: a single-threaded state machine (Pomodoro countdown
//!   or Infinite count-up) driven by an injected tick scheduler
//! - **Log Store**: JSON collections of projects and log entries over an
//!   injected key-value store, self-healing on corrupt data
//! - **Streaks**: a pure function over the full log, recomputed on change
//!
//! ## Key Components
//!
//! - [`SessionEngine`]: timer state machine and intent handler
//! - [`LogStore`]: project and log persistence
//! - [`compute_streaks`]: consecutive-day streak calculation
//! - [`Config`]: application configuration management
//! - [`KvStore`]: storage port, backed by [`Database`] or [`MemoryKv`]

pub mod error;
pub mod events;
pub mod icons;
pub mod logging;
pub mod notification;
pub mod records;
pub mod stats;
pub mod storage;
pub mod streak;
pub mod timer;

pub use error::{ConfigError, CoreError, StorageError};
pub use events::Event;
pub use icons::{BuiltinIcons, IconRegistry};
pub use notification::Notification;
pub use records::{LogEntry, Project, SessionKind, StreakedEntry};
pub use stats::{focus_minutes_on, group_by_date, today_focus_minutes, DayGroup};
pub use storage::{Config, Database, KvStore, LogSeed, LogStore, MemoryKv};
pub use streak::{annotate_streaks, compute_streaks};
pub use timer::{
    Clock, EngineSnapshot, ManualClock, ManualTicker, SessionEngine, SystemClock, TickHandle,
    TickScheduler, TokioTicker,
};
