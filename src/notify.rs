//! One-shot user-facing notices (success / failure toasts).
//!
//! Notices are layered on top of state transitions; they are never part of
//! the session state itself.

use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success(m) | Self::Error(m) => m,
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

pub trait Notify: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Delivers notices to a channel. A dropped receiver is not an error.
impl Notify for mpsc::UnboundedSender<Notice> {
    fn notify(&self, notice: Notice) {
        let _ = self.send(notice);
    }
}

/// Writes notices to the `tracing` log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notify for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Success(message) => tracing::info!(%message, "notice"),
            Notice::Error(message) => tracing::warn!(%message, "notice"),
        }
    }
}

#[cfg(test)]
#[path = "notify_test.rs"]
mod tests;
