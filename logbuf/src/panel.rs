//! Log panel view model: level filter, tail window and footer stats.
//!
//! Rendering targets plain text; a graphical front end can use the same
//! [`PanelView`] and [`level_display`] to draw its own rows.

use std::fmt::Write as _;
use std::str::FromStr;

use crate::{LogEntry, LogLevel, UnknownLevel};

/// Rows shown at once; older matches are counted but not rendered.
pub const PANEL_TAIL: usize = 50;

pub const EMPTY_TEXT: &str = "No logs to display";
pub const PANEL_TITLE: &str = "Console Logs";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelDisplay {
    pub label: &'static str,
    pub color: &'static str,
}

#[must_use]
pub fn level_display(level: LogLevel) -> LevelDisplay {
    match level {
        LogLevel::Error => LevelDisplay { label: "ERROR", color: "#ef4444" },
        LogLevel::Warn => LevelDisplay { label: "WARN", color: "#eab308" },
        LogLevel::Info => LevelDisplay { label: "INFO", color: "#3b82f6" },
        LogLevel::Debug => LevelDisplay { label: "DEBUG", color: "#6b7280" },
        LogLevel::Log => LevelDisplay { label: "LOG", color: "#e5e7eb" },
    }
}

// =============================================================================
// FILTER
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LevelFilter {
    #[default]
    All,
    Only(LogLevel),
}

impl LevelFilter {
    #[must_use]
    pub fn allows(self, entry: &LogEntry) -> bool {
        match self {
            Self::All => true,
            Self::Only(level) => entry.level == level,
        }
    }
}

impl FromStr for LevelFilter {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

// =============================================================================
// VIEW
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct PanelView {
    pub filter: LevelFilter,
    /// Last [`PANEL_TAIL`] matching entries, oldest first.
    pub rows: Vec<LogEntry>,
    /// Number of entries matching the filter, including those not in `rows`.
    pub matched: usize,
}

impl PanelView {
    #[must_use]
    pub fn build(entries: &[LogEntry], filter: LevelFilter) -> Self {
        let matching: Vec<&LogEntry> = entries.iter().filter(|e| filter.allows(e)).collect();
        let matched = matching.len();
        let rows = matching[matched.saturating_sub(PANEL_TAIL)..].iter().map(|e| (*e).clone()).collect();
        Self { filter, rows, matched }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `"12 logs"`, or `"3 logs (warn)"` when filtered.
    #[must_use]
    pub fn footer(&self) -> String {
        match self.filter {
            LevelFilter::All => format!("{} logs", self.matched),
            LevelFilter::Only(level) => format!("{} logs ({level})", self.matched),
        }
    }

    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{PANEL_TITLE}");
        if self.rows.is_empty() {
            let _ = writeln!(out, "  {EMPTY_TEXT}");
        } else {
            for entry in &self.rows {
                let _ = writeln!(out, "{}", format_entry(entry));
            }
        }
        out.push_str(&self.footer());
        out
    }
}

/// Collapsed-panel label.
#[must_use]
pub fn badge(total: usize) -> String {
    format!("Logs ({total})")
}

/// `HH:MM:SS [LEVEL] message`, plus indented pretty JSON of the fields.
#[must_use]
pub fn format_entry(entry: &LogEntry) -> String {
    let ts = entry.timestamp;
    let mut line = format!(
        "{:02}:{:02}:{:02} [{}] {}",
        ts.hour(),
        ts.minute(),
        ts.second(),
        level_display(entry.level).label,
        entry.message
    );
    if !entry.fields.is_empty() {
        if let Ok(json) = serde_json::to_string_pretty(&entry.fields) {
            for data_line in json.lines() {
                line.push_str("\n        ");
                line.push_str(data_line);
            }
        }
    }
    line
}

#[cfg(test)]
#[path = "panel_test.rs"]
mod tests;
