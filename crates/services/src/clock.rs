//! Exam countdown.
//!
//! `SessionClock` is a pure counter advanced by discrete ticks. It never reads
//! wall time; the tick source lives in [`crate::ticker`].

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClockState {
    Idle,
    Running,
    Stopped { elapsed_secs: u32 },
}

/// Result of delivering one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The clock was not running; nothing changed.
    Ignored,
    /// One second consumed.
    Running { remaining_secs: u32 },
    /// The countdown reached zero and the clock froze.
    Expired { elapsed_secs: u32 },
}

/// Countdown for one exam attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClock {
    duration_secs: u32,
    remaining_secs: u32,
    state: ClockState,
}

impl SessionClock {
    #[must_use]
    pub fn new(duration_secs: u32) -> Self {
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            state: ClockState::Idle,
        }
    }

    /// Begin counting down. Has no effect unless the clock is idle.
    pub fn start(&mut self) {
        if self.state == ClockState::Idle {
            self.remaining_secs = self.duration_secs;
            self.state = ClockState::Running;
        }
    }

    /// Consume one second.
    ///
    /// Reaching zero stops the clock and records the full duration as elapsed.
    /// Ticks delivered while idle or after stopping are ignored.
    pub fn tick(&mut self) -> TickOutcome {
        if self.state != ClockState::Running {
            return TickOutcome::Ignored;
        }
        if self.remaining_secs <= 1 {
            self.remaining_secs = 0;
            let elapsed_secs = self.duration_secs;
            self.state = ClockState::Stopped { elapsed_secs };
            return TickOutcome::Expired { elapsed_secs };
        }
        self.remaining_secs -= 1;
        TickOutcome::Running {
            remaining_secs: self.remaining_secs,
        }
    }

    /// Freeze the clock and return the elapsed seconds.
    ///
    /// Idempotent: a stopped clock returns the value captured at the first stop.
    /// Stopping an idle clock records zero elapsed.
    pub fn stop(&mut self) -> u32 {
        match self.state {
            ClockState::Stopped { elapsed_secs } => elapsed_secs,
            ClockState::Idle | ClockState::Running => {
                let elapsed_secs = self.duration_secs - self.remaining_secs;
                self.state = ClockState::Stopped { elapsed_secs };
                elapsed_secs
            }
        }
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.remaining_secs
    }

    /// Elapsed seconds captured when the clock stopped.
    #[must_use]
    pub fn elapsed_at_stop(&self) -> Option<u32> {
        match self.state {
            ClockState::Stopped { elapsed_secs } => Some(elapsed_secs),
            ClockState::Idle | ClockState::Running => None,
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_clock_ignores_ticks() {
        let mut clock = SessionClock::new(10);
        assert_eq!(clock.tick(), TickOutcome::Ignored);
        assert_eq!(clock.remaining(), 10);
    }

    #[test]
    fn stop_records_elapsed_once() {
        let mut clock = SessionClock::new(10_800);
        clock.start();
        for _ in 0..37 {
            clock.tick();
        }
        assert_eq!(clock.stop(), 37);
        assert_eq!(clock.remaining(), 10_763);
        assert_eq!(clock.tick(), TickOutcome::Ignored);
        assert_eq!(clock.stop(), 37);
        assert_eq!(clock.elapsed_at_stop(), Some(37));
    }

    #[test]
    fn expires_exactly_once() {
        let mut clock = SessionClock::new(3);
        clock.start();
        assert_eq!(clock.tick(), TickOutcome::Running { remaining_secs: 2 });
        assert_eq!(clock.tick(), TickOutcome::Running { remaining_secs: 1 });
        assert_eq!(clock.tick(), TickOutcome::Expired { elapsed_secs: 3 });
        assert_eq!(clock.tick(), TickOutcome::Ignored);
        assert_eq!(clock.remaining(), 0);
        assert!(!clock.is_running());
    }

    #[test]
    fn start_is_not_repeatable_after_stop() {
        let mut clock = SessionClock::new(5);
        clock.start();
        clock.tick();
        clock.stop();
        clock.start();
        assert!(!clock.is_running());
        assert_eq!(clock.remaining(), 4);
    }
}
