use std::sync::Arc;

use exam_core::model::{AnswerInput, QuestionId, QuestionPaper, SectionId};

use crate::Clock;
use crate::error::{HostError, SessionError};
use crate::host::{Fullscreen, Printer};

use super::phase::Phase;
use super::service::{ExamSession, SessionTick, SubmitOutcome};

/// A discrete user action applied to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    SetExamName(String),
    AttachPaper(QuestionPaper),
    Login { candidate_name: String },
    Begin { acknowledged: bool },
    GoTo(usize),
    Answer(AnswerInput),
    SaveAndNext,
    MarkForReview,
    ClearResponse,
    SelectSection(SectionId),
    ToggleFullscreen,
    Submit,
    ConfirmSubmission,
    Grade { id: QuestionId, is_correct: bool },
    FinishVerification,
    Print,
}

/// Applies commands and ticks to a session, driving host capabilities around
/// the phase changes (fullscreen on start, exit on submit, printing at the end).
#[derive(Clone)]
pub struct ExamLoopService {
    clock: Clock,
    fullscreen: Arc<dyn Fullscreen>,
    printer: Arc<dyn Printer>,
}

impl ExamLoopService {
    #[must_use]
    pub fn new(fullscreen: Arc<dyn Fullscreen>, printer: Arc<dyn Printer>) -> Self {
        Self {
            clock: Clock::system(),
            fullscreen,
            printer,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Apply one command. Each command runs to completion before the next.
    ///
    /// # Errors
    ///
    /// Propagates the `SessionError` of the underlying operation; the session is unchanged.
    pub fn dispatch(
        &self,
        session: &mut ExamSession,
        command: SessionCommand,
    ) -> Result<(), SessionError> {
        match command {
            SessionCommand::SetExamName(name) => session.set_exam_name(&name),
            SessionCommand::AttachPaper(paper) => session.attach_paper(paper),
            SessionCommand::Login { candidate_name } => session.login(&candidate_name),
            SessionCommand::Begin { acknowledged } => self.start_exam(session, acknowledged),
            SessionCommand::GoTo(index) => session.go_to(index),
            SessionCommand::Answer(input) => session.set_answer(input),
            SessionCommand::SaveAndNext => session.save_and_next().map(|_| ()),
            SessionCommand::MarkForReview => session.mark_for_review().map(|_| ()),
            SessionCommand::ClearResponse => session.clear_response().map(|_| ()),
            SessionCommand::SelectSection(id) => session.select_section(&id),
            SessionCommand::ToggleFullscreen => self.toggle_fullscreen(session),
            SessionCommand::Submit => self.submit(session).map(|_| ()),
            SessionCommand::ConfirmSubmission => session.confirm_submission(),
            SessionCommand::Grade { id, is_correct } => session.set_correctness(id, is_correct),
            SessionCommand::FinishVerification => session.finish_verification().map(|_| ()),
            SessionCommand::Print => self.print_scorecard(session),
        }
    }

    /// `instructions -> active`, then request fullscreen.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotAcknowledged` or `SessionError::InvalidPhase`.
    pub fn start_exam(
        &self,
        session: &mut ExamSession,
        acknowledged: bool,
    ) -> Result<(), SessionError> {
        session.begin(acknowledged, self.clock.now())?;
        if !self.fullscreen.is_active() {
            ignore_host_failure("enter fullscreen", self.fullscreen.enter());
        }
        Ok(())
    }

    /// Manual submit. Leaves fullscreen only when this call closed the exam.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` before the exam has started.
    pub fn submit(&self, session: &mut ExamSession) -> Result<SubmitOutcome, SessionError> {
        let outcome = session.submit(self.clock.now())?;
        if matches!(outcome, SubmitOutcome::Submitted(_)) {
            self.leave_fullscreen();
        }
        Ok(outcome)
    }

    /// Deliver one clock tick.
    ///
    /// # Errors
    ///
    /// Propagates workflow errors from the expiry transition.
    pub fn on_tick(&self, session: &mut ExamSession) -> Result<SessionTick, SessionError> {
        let tick = session.tick(self.clock.now())?;
        if let SessionTick::Expired(summary) = tick {
            tracing::info!(time_spent_secs = summary.time_spent_secs, "time is up");
            self.leave_fullscreen();
        }
        Ok(tick)
    }

    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` outside the active phase.
    pub fn toggle_fullscreen(&self, session: &ExamSession) -> Result<(), SessionError> {
        if session.phase() != Phase::Active {
            return Err(SessionError::InvalidPhase {
                expected: Phase::Active,
                actual: session.phase(),
            });
        }
        if self.fullscreen.is_active() {
            ignore_host_failure("exit fullscreen", self.fullscreen.exit());
        } else {
            ignore_host_failure("enter fullscreen", self.fullscreen.enter());
        }
        Ok(())
    }

    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen.is_active()
    }

    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` until the scorecard exists.
    pub fn print_scorecard(&self, session: &ExamSession) -> Result<(), SessionError> {
        let scorecard = session.scorecard().ok_or(SessionError::InvalidPhase {
            expected: Phase::Scored,
            actual: session.phase(),
        })?;
        self.printer.print(&scorecard);
        Ok(())
    }

    fn leave_fullscreen(&self) {
        if self.fullscreen.is_active() {
            ignore_host_failure("exit fullscreen", self.fullscreen.exit());
        }
    }
}

fn ignore_host_failure(action: &'static str, result: Result<(), HostError>) {
    if let Err(err) = result {
        tracing::warn!(action, %err, "host request ignored");
    }
}
