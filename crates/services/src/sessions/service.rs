use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;

use exam_core::ExamBlueprint;
use exam_core::model::{
    AnswerInput, Question, QuestionId, QuestionPaper, QuestionStatus, Section, SectionId,
    create_questions,
};
use exam_core::scoring::{self, CorrectnessMap, ScoreReport};

use super::navigation::Navigator;
use super::phase::{Phase, Workflow};
use super::progress::{StatusCounts, SubmissionSummary};
use super::view::{PaletteEntry, Scorecard, VerificationRow};
use crate::clock::{SessionClock, TickOutcome};
use crate::error::SessionError;

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// What caused the `active -> submitted` transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    Manual,
    Expiry,
}

/// Result of a manual submit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// This call closed the exam.
    Submitted(SubmissionSummary),
    /// The exam was already closed (e.g. by clock expiry); nothing changed.
    AlreadySubmitted,
}

/// Result of applying one clock tick to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTick {
    Ignored,
    Running { remaining_secs: u32 },
    Expired(SubmissionSummary),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Single owner of all state for one exam attempt.
///
/// Navigation mutates question records and the cursor, the clock mutates
/// remaining/elapsed time, the workflow mutates the phase and verdicts. Every
/// mutation goes through a method here that first checks the phase.
pub struct ExamSession {
    blueprint: Arc<ExamBlueprint>,
    exam_name: String,
    candidate_name: Option<String>,
    paper: Option<QuestionPaper>,
    questions: Vec<Question>,
    navigator: Navigator,
    clock: SessionClock,
    workflow: Workflow,
    started_at: Option<DateTime<Utc>>,
    submitted_at: Option<DateTime<Utc>>,
    report: Option<ScoreReport>,
}

impl ExamSession {
    /// Create a session in the login phase.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Configuration` if the question list cannot be built.
    pub fn new(blueprint: Arc<ExamBlueprint>) -> Result<Self, SessionError> {
        let questions = create_questions(blueprint.sections())?;
        let navigator = Navigator::new(blueprint.sections());
        let clock = SessionClock::new(blueprint.duration_secs());
        Ok(Self {
            exam_name: blueprint.exam_name().to_string(),
            blueprint,
            candidate_name: None,
            paper: None,
            questions,
            navigator,
            clock,
            workflow: Workflow::new(),
            started_at: None,
            submitted_at: None,
            report: None,
        })
    }

    /// Fresh session from the same blueprint, once this one is scored.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` before the scored phase.
    pub fn restart(&self) -> Result<Self, SessionError> {
        self.workflow.require(Phase::Scored)?;
        tracing::info!("session restarted");
        Self::new(Arc::clone(&self.blueprint))
    }

    // ─── Accessors ──────────────────────────────────────────────────────────

    #[must_use]
    pub fn blueprint(&self) -> &ExamBlueprint {
        &self.blueprint
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.workflow.phase()
    }

    #[must_use]
    pub fn exam_name(&self) -> &str {
        &self.exam_name
    }

    #[must_use]
    pub fn candidate_name(&self) -> Option<&str> {
        self.candidate_name.as_deref()
    }

    #[must_use]
    pub fn paper(&self) -> Option<&QuestionPaper> {
        self.paper.as_ref()
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        id.index().and_then(|i| self.questions.get(i))
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.navigator.current()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.navigator.current())
    }

    #[must_use]
    pub fn active_section(&self) -> Option<&Section> {
        self.blueprint
            .sections()
            .section(self.navigator.active_section())
    }

    #[must_use]
    pub fn clock(&self) -> &SessionClock {
        &self.clock
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.clock.remaining()
    }

    /// Seconds spent, known once the exam has been submitted.
    #[must_use]
    pub fn time_spent_secs(&self) -> Option<u32> {
        self.clock.elapsed_at_stop()
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    #[must_use]
    pub fn correctness(&self) -> &CorrectnessMap {
        self.workflow.verdicts()
    }

    #[must_use]
    pub fn attempted(&self) -> &[QuestionId] {
        self.workflow.attempted()
    }

    #[must_use]
    pub fn ungraded_count(&self) -> usize {
        self.workflow.ungraded_count()
    }

    /// Whether every attempted question has a verdict.
    #[must_use]
    pub fn ready_to_score(&self) -> bool {
        self.phase() == Phase::Verifying && self.workflow.ungraded_count() == 0
    }

    #[must_use]
    pub fn report(&self) -> Option<&ScoreReport> {
        self.report.as_ref()
    }

    #[must_use]
    pub fn status_counts(&self) -> StatusCounts {
        StatusCounts::from_questions(&self.questions)
    }

    // ─── Login / instructions ──────────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` after login, `SessionError::EmptyExamName` for blank input.
    pub fn set_exam_name(&mut self, name: &str) -> Result<(), SessionError> {
        self.workflow.require(Phase::Login)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyExamName);
        }
        self.exam_name = name.to_string();
        Ok(())
    }

    /// Attach the optional question paper. Replaces a previous one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` after login.
    pub fn attach_paper(&mut self, paper: QuestionPaper) -> Result<(), SessionError> {
        self.workflow.require(Phase::Login)?;
        tracing::info!(name = paper.name(), bytes = paper.len(), "question paper attached");
        self.paper = Some(paper);
        Ok(())
    }

    /// `login -> instructions`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyCandidateName` for a blank name.
    pub fn login(&mut self, candidate_name: &str) -> Result<(), SessionError> {
        self.workflow.require(Phase::Login)?;
        let name = candidate_name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyCandidateName);
        }
        self.candidate_name = Some(name.to_string());
        self.workflow.advance(Phase::Login)?;
        Ok(())
    }

    /// `instructions -> active`, starting the countdown.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotAcknowledged` unless the declaration is accepted.
    pub fn begin(&mut self, acknowledged: bool, at: DateTime<Utc>) -> Result<(), SessionError> {
        self.workflow.require(Phase::Instructions)?;
        if !acknowledged {
            return Err(SessionError::NotAcknowledged);
        }
        self.workflow.advance(Phase::Instructions)?;
        self.clock.start();
        self.started_at = Some(at);
        tracing::info!(duration_secs = self.clock.duration_secs(), "exam started");
        Ok(())
    }

    // ─── Navigation (active only) ───────────────────────────────────────────

    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` outside the active phase.
    pub fn go_to(&mut self, index: usize) -> Result<(), SessionError> {
        self.workflow.require(Phase::Active)?;
        self.navigator.go_to(&self.questions, index);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` outside the active phase, or
    /// `SessionError::Question` if the input does not fit the current question.
    pub fn set_answer(&mut self, input: AnswerInput) -> Result<(), SessionError> {
        self.workflow.require(Phase::Active)?;
        self.navigator.set_answer(&mut self.questions, input)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` outside the active phase.
    pub fn save_and_next(&mut self) -> Result<Option<QuestionStatus>, SessionError> {
        self.workflow.require(Phase::Active)?;
        Ok(self.navigator.save_and_next(&mut self.questions))
    }

    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` outside the active phase.
    pub fn mark_for_review(&mut self) -> Result<Option<QuestionStatus>, SessionError> {
        self.workflow.require(Phase::Active)?;
        Ok(self.navigator.mark_for_review(&mut self.questions))
    }

    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` outside the active phase.
    pub fn clear_response(&mut self) -> Result<Option<QuestionStatus>, SessionError> {
        self.workflow.require(Phase::Active)?;
        Ok(self.navigator.clear_response(&mut self.questions))
    }

    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` outside the active phase or
    /// `SessionError::UnknownSection` for an unknown tab.
    pub fn select_section(&mut self, id: &SectionId) -> Result<(), SessionError> {
        self.workflow.require(Phase::Active)?;
        self.navigator.select_section(self.blueprint.sections(), id)
    }

    // ─── Clock & submission ─────────────────────────────────────────────────

    /// Apply one countdown tick. A no-op outside the active phase.
    ///
    /// # Errors
    ///
    /// Propagates workflow errors from the expiry transition.
    pub fn tick(&mut self, at: DateTime<Utc>) -> Result<SessionTick, SessionError> {
        if self.phase() != Phase::Active {
            return Ok(SessionTick::Ignored);
        }
        match self.clock.tick() {
            TickOutcome::Ignored => Ok(SessionTick::Ignored),
            TickOutcome::Running { remaining_secs } => Ok(SessionTick::Running { remaining_secs }),
            TickOutcome::Expired { .. } => {
                let summary = self.close(at, SubmitTrigger::Expiry)?;
                Ok(SessionTick::Expired(summary))
            }
        }
    }

    /// Manual submit. The first transition wins; later requests are no-ops.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` before the exam has started.
    pub fn submit(&mut self, at: DateTime<Utc>) -> Result<SubmitOutcome, SessionError> {
        match self.phase() {
            Phase::Active => Ok(SubmitOutcome::Submitted(
                self.close(at, SubmitTrigger::Manual)?,
            )),
            Phase::Submitted | Phase::Verifying | Phase::Scored => {
                tracing::debug!("submit ignored: exam already submitted");
                Ok(SubmitOutcome::AlreadySubmitted)
            }
            actual @ (Phase::Login | Phase::Instructions) => Err(SessionError::InvalidPhase {
                expected: Phase::Active,
                actual,
            }),
        }
    }

    fn close(
        &mut self,
        at: DateTime<Utc>,
        trigger: SubmitTrigger,
    ) -> Result<SubmissionSummary, SessionError> {
        self.workflow.advance(Phase::Active)?;
        let elapsed_secs = self.clock.stop();
        self.submitted_at = Some(at);
        let summary = SubmissionSummary::new(self.status_counts(), elapsed_secs);
        tracing::info!(
            ?trigger,
            elapsed_secs,
            remaining_secs = self.clock.remaining(),
            answered = summary.answered,
            "exam submitted"
        );
        Ok(summary)
    }

    /// Post-submit summary. `None` until the exam is submitted.
    #[must_use]
    pub fn submission_summary(&self) -> Option<SubmissionSummary> {
        self.clock
            .elapsed_at_stop()
            .filter(|_| self.phase() >= Phase::Submitted)
            .map(|elapsed| SubmissionSummary::new(self.status_counts(), elapsed))
    }

    // ─── Verification ──────────────────────────────────────────────────────

    /// `submitted -> verifying`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidPhase` unless the exam is in the submitted phase.
    pub fn confirm_submission(&mut self) -> Result<(), SessionError> {
        self.workflow.begin_verification(&self.questions)
    }

    /// Record a verdict for an attempted question, replacing any earlier one.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotAttempted` for questions outside the attempted set.
    pub fn set_correctness(&mut self, id: QuestionId, is_correct: bool) -> Result<(), SessionError> {
        if self.question(id).is_none() {
            return Err(SessionError::UnknownQuestion(id));
        }
        self.workflow.set_correctness(id, is_correct)
    }

    /// `verifying -> scored`, computing the report.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UngradedQuestions` while any attempted question lacks a verdict.
    pub fn finish_verification(&mut self) -> Result<&ScoreReport, SessionError> {
        self.workflow.finish()?;
        let report = scoring::score(&self.questions, self.workflow.verdicts());
        tracing::info!(
            marks = report.overall.marks,
            correct = report.overall.correct,
            incorrect = report.overall.incorrect,
            "scorecard generated"
        );
        Ok(self.report.insert(report))
    }

    // ─── Views ─────────────────────────────────────────────────────────────

    /// Palette cells for the active tab.
    #[must_use]
    pub fn palette(&self) -> Vec<PaletteEntry> {
        let current = self.navigator.current();
        let Some(section) = self.active_section() else {
            return Vec::new();
        };
        self.questions
            .iter()
            .enumerate()
            .filter(|(_, q)| section.contains(q.id()))
            .map(|(index, q)| PaletteEntry {
                id: q.id(),
                status: q.status(),
                is_current: index == current,
            })
            .collect()
    }

    /// Rows for the grading screen, in question order.
    #[must_use]
    pub fn verification_rows(&self) -> Vec<VerificationRow> {
        self.workflow
            .attempted()
            .iter()
            .filter_map(|id| self.question(*id))
            .map(|q| VerificationRow {
                id: q.id(),
                subject: q.subject().to_string(),
                kind: q.kind(),
                response: q.response_label(),
                verdict: self.workflow.verdicts().get(q.id()),
            })
            .collect()
    }

    /// Final scorecard. `None` until scored.
    #[must_use]
    pub fn scorecard(&self) -> Option<Scorecard> {
        let report = self.report.as_ref()?;
        Some(Scorecard {
            exam_name: self.exam_name.clone(),
            candidate_name: self.candidate_name.clone().unwrap_or_default(),
            time_spent_secs: self.clock.elapsed_at_stop().unwrap_or_default(),
            report: report.clone(),
        })
    }
}

impl fmt::Debug for ExamSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExamSession")
            .field("phase", &self.phase())
            .field("exam_name", &self.exam_name)
            .field("questions_len", &self.questions.len())
            .field("current", &self.navigator.current())
            .field("remaining_secs", &self.clock.remaining())
            .field("started_at", &self.started_at)
            .field("submitted_at", &self.submitted_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use exam_core::ExamConfig;
    use exam_core::model::OptionChoice;
    use exam_core::time::fixed_now;

    fn active_session() -> ExamSession {
        let blueprint = Arc::new(ExamConfig::default().into_blueprint().unwrap());
        let mut session = ExamSession::new(blueprint).unwrap();
        session.login("Asha").unwrap();
        session.begin(true, fixed_now()).unwrap();
        session
    }

    fn select(option: u8) -> AnswerInput {
        AnswerInput::Select(OptionChoice::new(option).unwrap())
    }

    #[test]
    fn login_requires_candidate_name() {
        let blueprint = Arc::new(ExamConfig::default().into_blueprint().unwrap());
        let mut session = ExamSession::new(blueprint).unwrap();
        assert_eq!(session.login("   "), Err(SessionError::EmptyCandidateName));
        assert_eq!(session.phase(), Phase::Login);
        session.login(" Asha ").unwrap();
        assert_eq!(session.candidate_name(), Some("Asha"));
        assert_eq!(session.phase(), Phase::Instructions);
    }

    #[test]
    fn begin_requires_acknowledgement() {
        let blueprint = Arc::new(ExamConfig::default().into_blueprint().unwrap());
        let mut session = ExamSession::new(blueprint).unwrap();
        session.login("Asha").unwrap();
        assert_eq!(
            session.begin(false, fixed_now()),
            Err(SessionError::NotAcknowledged)
        );
        assert!(!session.clock().is_running());
        session.begin(true, fixed_now()).unwrap();
        assert_eq!(session.phase(), Phase::Active);
        assert!(session.clock().is_running());
        assert_eq!(session.started_at(), Some(fixed_now()));
    }

    #[test]
    fn navigation_before_start_is_rejected() {
        let blueprint = Arc::new(ExamConfig::default().into_blueprint().unwrap());
        let mut session = ExamSession::new(blueprint).unwrap();
        assert!(matches!(
            session.save_and_next(),
            Err(SessionError::InvalidPhase { .. })
        ));
    }

    #[test]
    fn questions_are_frozen_after_submit() {
        let mut session = active_session();
        session.set_answer(select(1)).unwrap();
        session.save_and_next().unwrap();
        session.submit(fixed_now()).unwrap();

        assert!(session.set_answer(select(2)).is_err());
        assert!(session.clear_response().is_err());
        assert!(session.go_to(5).is_err());
        assert_eq!(
            session.questions()[0].selected_option(),
            Some(OptionChoice::new(1).unwrap())
        );
    }

    #[test]
    fn expiry_then_manual_submit_transitions_once() {
        let blueprint = Arc::new(
            ExamConfig {
                duration_minutes: 1,
                ..ExamConfig::default()
            }
            .into_blueprint()
            .unwrap(),
        );
        let mut session = ExamSession::new(blueprint).unwrap();
        session.login("Asha").unwrap();
        session.begin(true, fixed_now()).unwrap();

        let mut expired = 0;
        for _ in 0..60 {
            if let SessionTick::Expired(summary) = session.tick(fixed_now()).unwrap() {
                expired += 1;
                assert_eq!(summary.time_spent_secs, 60);
            }
        }
        assert_eq!(expired, 1);
        assert_eq!(session.phase(), Phase::Submitted);
        assert_eq!(session.submit(fixed_now()).unwrap(), SubmitOutcome::AlreadySubmitted);
        assert_eq!(session.tick(fixed_now()).unwrap(), SessionTick::Ignored);
        assert_eq!(session.time_spent_secs(), Some(60));
        assert_eq!(session.remaining_secs(), 0);
    }

    #[test]
    fn manual_submit_then_late_tick_is_noop() {
        let mut session = active_session();
        session.tick(fixed_now()).unwrap();
        assert!(matches!(
            session.submit(fixed_now()).unwrap(),
            SubmitOutcome::Submitted(_)
        ));
        assert_eq!(session.tick(fixed_now()).unwrap(), SessionTick::Ignored);
        assert_eq!(session.remaining_secs(), 10_799);
        assert_eq!(session.time_spent_secs(), Some(1));
    }

    #[test]
    fn submit_before_start_is_invalid() {
        let blueprint = Arc::new(ExamConfig::default().into_blueprint().unwrap());
        let mut session = ExamSession::new(blueprint).unwrap();
        assert!(matches!(
            session.submit(fixed_now()),
            Err(SessionError::InvalidPhase { expected: Phase::Active, .. })
        ));
    }

    #[test]
    fn exam_name_and_paper_only_editable_at_login() {
        let blueprint = Arc::new(ExamConfig::default().into_blueprint().unwrap());
        let mut session = ExamSession::new(blueprint).unwrap();
        session.set_exam_name("Mock 3").unwrap();
        let paper = QuestionPaper::from_upload("p.pdf", "application/pdf", b"%PDF-1".to_vec()).unwrap();
        session.attach_paper(paper.clone()).unwrap();
        session.login("Asha").unwrap();
        assert_eq!(session.exam_name(), "Mock 3");
        assert!(session.attach_paper(paper).is_err());
        assert!(session.set_exam_name("Other").is_err());
    }

    #[test]
    fn palette_follows_active_tab() {
        let mut session = active_session();
        let palette = session.palette();
        assert_eq!(palette.len(), 20);
        assert!(palette[0].is_current);

        session.select_section(&SectionId::new("phys_b")).unwrap();
        let palette = session.palette();
        assert_eq!(palette.len(), 5);
        assert_eq!(palette[0].id, QuestionId::new(46));
        assert!(palette[0].is_current);
    }

    #[test]
    fn verification_rows_list_attempted_only() {
        let mut session = active_session();
        session.set_answer(select(3)).unwrap();
        session.save_and_next().unwrap();
        session.mark_for_review().unwrap();
        session.go_to(20).unwrap();
        session.set_answer(AnswerInput::Append("2.5".into())).unwrap();
        session.mark_for_review().unwrap();
        session.submit(fixed_now()).unwrap();
        session.confirm_submission().unwrap();

        let rows = session.verification_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].response, "Opt 3");
        assert_eq!(rows[1].id, QuestionId::new(21));
        assert_eq!(rows[1].response, "2.5");
        assert!(rows.iter().all(|r| r.verdict.is_none()));
        assert!(!session.ready_to_score());

        session.set_correctness(QuestionId::new(1), true).unwrap();
        session.set_correctness(QuestionId::new(21), false).unwrap();
        assert!(session.ready_to_score());
        assert_eq!(session.verification_rows()[1].verdict, Some(false));
    }

    #[test]
    fn restart_only_after_scoring() {
        let mut session = active_session();
        assert!(session.restart().is_err());
        session.submit(fixed_now()).unwrap();
        session.confirm_submission().unwrap();
        session.finish_verification().unwrap();
        let fresh = session.restart().unwrap();
        assert_eq!(fresh.phase(), Phase::Login);
        assert_eq!(fresh.remaining_secs(), 10_800);
    }
}
