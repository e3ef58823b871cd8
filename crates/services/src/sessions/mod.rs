mod navigation;
mod phase;
mod progress;
mod service;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use navigation::Navigator;
pub use phase::Phase;
pub use progress::{StatusCounts, SubmissionSummary};
pub use service::{ExamSession, SessionTick, SubmitOutcome, SubmitTrigger};
pub use view::{PaletteEntry, Scorecard, VerificationRow};
pub use workflow::{ExamLoopService, SessionCommand};
