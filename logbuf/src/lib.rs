//! Process-wide in-memory ring of recent diagnostic entries.
//!
//! This crate is UI-framework agnostic: the [`CaptureLayer`] feeds the
//! buffer from `tracing`, and [`panel`] derives what a log viewer shows.
//! Consumers only need `entries()` and `clear()`.

mod layer;
pub mod panel;

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

pub use layer::CaptureLayer;

pub const DEFAULT_CAPACITY: usize = 1000;

// =============================================================================
// LEVEL
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Log,
    Info,
    Warn,
    Error,
    Debug,
}

impl LogLevel {
    pub const ALL: [Self; 5] = [Self::Log, Self::Info, Self::Warn, Self::Error, Self::Debug];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Log => "log",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Debug => "debug",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level '{0}'")]
pub struct UnknownLevel(pub String);

impl FromStr for LogLevel {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == lower)
            .ok_or_else(|| UnknownLevel(s.to_owned()))
    }
}

impl From<tracing::Level> for LogLevel {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Self::Error,
            tracing::Level::WARN => Self::Warn,
            tracing::Level::INFO => Self::Info,
            _ => Self::Debug,
        }
    }
}

// =============================================================================
// ENTRY
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: OffsetDateTime,
    pub level: LogLevel,
    pub message: String,
    /// Structured extras attached to the entry (tracing fields).
    pub fields: Map<String, Value>,
}

// =============================================================================
// BUFFER
// =============================================================================

struct Ring {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    next_id: u64,
}

/// Cloneable handle; every clone shares the same ring.
#[derive(Clone)]
pub struct LogBuffer {
    inner: Arc<Mutex<Ring>>,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl fmt::Debug for LogBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogBuffer").field("len", &self.len()).finish_non_exhaustive()
    }
}

impl LogBuffer {
    /// Ring holding at most `capacity` entries (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let ring = Ring { entries: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)), capacity, next_id: 1 };
        Self { inner: Arc::new(Mutex::new(ring)) }
    }

    fn ring(&self) -> std::sync::MutexGuard<'_, Ring> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append an entry, evicting the oldest at capacity. Returns its id.
    pub fn push(&self, level: LogLevel, message: impl Into<String>, fields: Map<String, Value>) -> u64 {
        self.push_at(OffsetDateTime::now_utc(), level, message, fields)
    }

    /// Append with an explicit timestamp (for testing and replay).
    pub fn push_at(
        &self,
        timestamp: OffsetDateTime,
        level: LogLevel,
        message: impl Into<String>,
        fields: Map<String, Value>,
    ) -> u64 {
        let mut ring = self.ring();
        let id = ring.next_id;
        ring.next_id += 1;
        if ring.entries.len() == ring.capacity {
            ring.entries.pop_front();
        }
        ring.entries.push_back(LogEntry { id, timestamp, level, message: message.into(), fields });
        id
    }

    /// Oldest-first copy of the current entries.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.ring().entries.iter().cloned().collect()
    }

    /// Drop all entries. Ids keep increasing afterwards.
    pub fn clear(&self) {
        self.ring().entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ring().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.ring().capacity
    }
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
