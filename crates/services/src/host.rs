//! Host capabilities the exam depends on but does not implement.

use std::sync::Mutex;

use crate::error::HostError;
use crate::sessions::Scorecard;

/// Fullscreen toggle. Best-effort: callers ignore failures.
pub trait Fullscreen: Send + Sync {
    fn is_active(&self) -> bool;

    /// # Errors
    ///
    /// Returns `HostError` if the host refuses or does not support fullscreen.
    fn enter(&self) -> Result<(), HostError>;

    /// # Errors
    ///
    /// Returns `HostError` if the host cannot leave fullscreen.
    fn exit(&self) -> Result<(), HostError>;
}

/// Printing of the final scorecard. Fire and forget.
pub trait Printer: Send + Sync {
    fn print(&self, scorecard: &Scorecard);
}

/// Host with no fullscreen support.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFullscreen;

impl Fullscreen for NoFullscreen {
    fn is_active(&self) -> bool {
        false
    }

    fn enter(&self) -> Result<(), HostError> {
        Err(HostError::Unsupported("fullscreen"))
    }

    fn exit(&self) -> Result<(), HostError> {
        Err(HostError::Unsupported("fullscreen"))
    }
}

/// In-memory fullscreen flag, useful for tests and headless hosts.
#[derive(Debug, Default)]
pub struct InMemoryFullscreen {
    active: Mutex<bool>,
}

impl InMemoryFullscreen {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self, value: bool) -> Result<(), HostError> {
        let mut active = self
            .active
            .lock()
            .map_err(|_| HostError::Failed("fullscreen state poisoned".into()))?;
        *active = value;
        Ok(())
    }
}

impl Fullscreen for InMemoryFullscreen {
    fn is_active(&self) -> bool {
        self.active.lock().map(|active| *active).unwrap_or(false)
    }

    fn enter(&self) -> Result<(), HostError> {
        self.set(true)
    }

    fn exit(&self) -> Result<(), HostError> {
        self.set(false)
    }
}

/// Collects printed scorecards instead of sending them anywhere.
#[derive(Debug, Default)]
pub struct RecordingPrinter {
    printed: Mutex<Vec<Scorecard>>,
}

impl RecordingPrinter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn printed(&self) -> Vec<Scorecard> {
        self.printed
            .lock()
            .map(|printed| printed.clone())
            .unwrap_or_default()
    }
}

impl Printer for RecordingPrinter {
    fn print(&self, scorecard: &Scorecard) {
        if let Ok(mut printed) = self.printed.lock() {
            printed.push(scorecard.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_fullscreen_toggles() {
        let fs = InMemoryFullscreen::new();
        assert!(!fs.is_active());
        fs.enter().unwrap();
        assert!(fs.is_active());
        fs.exit().unwrap();
        assert!(!fs.is_active());
    }

    #[test]
    fn no_fullscreen_reports_unsupported() {
        assert_eq!(NoFullscreen.enter(), Err(HostError::Unsupported("fullscreen")));
        assert!(!NoFullscreen.is_active());
    }
}
