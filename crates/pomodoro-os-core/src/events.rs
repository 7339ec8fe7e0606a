use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::records::{LogEntry, Project, SessionKind};

/// Every state change made by the session engine produces an Event.
/// The rendering layer re-reads engine state when it sees one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        mode: SessionKind,
        remaining_secs: u64,
        at: DateTime<Local>,
    },
    /// A session ended and was written to the log.
    SessionCommitted {
        entry: LogEntry,
        at: DateTime<Local>,
    },
    /// A session ended below the commit threshold; nothing was written.
    SessionDiscarded {
        mode: SessionKind,
        elapsed_secs: u64,
        at: DateTime<Local>,
    },
    ModeSwitched {
        from: SessionKind,
        to: SessionKind,
        /// Entry committed for the interrupted session, if any.
        committed: Option<LogEntry>,
        at: DateTime<Local>,
    },
    LogDeleted {
        entry: LogEntry,
        at: DateTime<Local>,
    },
    ProjectAdded {
        project: Project,
        at: DateTime<Local>,
    },
    ProjectDeleted {
        project: Project,
        /// Selection after the deletion.
        selected: Option<String>,
        at: DateTime<Local>,
    },
}

impl Event {
    /// The committed entry carried by this event, if any.
    pub fn committed_entry(&self) -> Option<&LogEntry> {
        match self {
            Event::SessionCommitted { entry, .. } => Some(entry),
            Event::ModeSwitched { committed, .. } => committed.as_ref(),
            _ => None,
        }
    }
}
