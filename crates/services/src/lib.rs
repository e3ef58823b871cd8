#![forbid(unsafe_code)]

pub mod clock;
pub mod error;
pub mod host;
pub mod sessions;
pub mod ticker;

pub use exam_core::Clock;
pub use sessions as session;

pub use clock::{SessionClock, TickOutcome};
pub use error::{HostError, SessionError};
pub use host::{Fullscreen, InMemoryFullscreen, NoFullscreen, Printer, RecordingPrinter};
pub use ticker::{CancelToken, TICK_PERIOD, Tick, Ticker};

pub use sessions::{
    ExamLoopService, ExamSession, PaletteEntry, Phase, Scorecard, SessionCommand, SessionTick,
    StatusCounts, SubmissionSummary, SubmitOutcome, VerificationRow,
};
