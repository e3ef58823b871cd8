//! Terminal implementations of the session's host capabilities.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use services::{Fullscreen, HostError, Printer, Scorecard};

use crate::render::scorecard_text;

const ENTER_ALT_SCREEN: &str = "\x1b[?1049h";
const LEAVE_ALT_SCREEN: &str = "\x1b[?1049l";

/// Uses the terminal's alternate screen as the "fullscreen" surface.
#[derive(Debug, Default)]
pub struct TerminalFullscreen {
    active: AtomicBool,
}

impl TerminalFullscreen {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn switch(&self, sequence: &str, active: bool) -> Result<(), HostError> {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(sequence.as_bytes())
            .and_then(|()| stdout.flush())
            .map_err(|err| HostError::Failed(err.to_string()))?;
        self.active.store(active, Ordering::SeqCst);
        Ok(())
    }
}

impl Fullscreen for TerminalFullscreen {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<(), HostError> {
        self.switch(ENTER_ALT_SCREEN, true)
    }

    fn exit(&self) -> Result<(), HostError> {
        self.switch(LEAVE_ALT_SCREEN, false)
    }
}

impl Drop for TerminalFullscreen {
    fn drop(&mut self) {
        if self.is_active() {
            let _ = self.exit();
        }
    }
}

/// Writes the scorecard to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutPrinter;

impl Printer for StdoutPrinter {
    fn print(&self, scorecard: &Scorecard) {
        let mut stdout = io::stdout().lock();
        if let Err(err) = writeln!(stdout, "{}", scorecard_text(scorecard)) {
            tracing::warn!(%err, "failed to print scorecard");
        }
    }
}
