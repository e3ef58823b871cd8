use std::fmt;

use exam_core::model::{Question, QuestionId};
use exam_core::scoring::CorrectnessMap;

use crate::error::SessionError;

/// Macro-stage of an exam attempt. Advances strictly forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Login,
    Instructions,
    Active,
    Submitted,
    Verifying,
    Scored,
}

impl Phase {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Login => "login",
            Phase::Instructions => "instructions",
            Phase::Active => "active",
            Phase::Submitted => "submitted",
            Phase::Verifying => "verifying",
            Phase::Scored => "scored",
        }
    }

    #[must_use]
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Login => Some(Phase::Instructions),
            Phase::Instructions => Some(Phase::Active),
            Phase::Active => Some(Phase::Submitted),
            Phase::Submitted => Some(Phase::Verifying),
            Phase::Verifying => Some(Phase::Scored),
            Phase::Scored => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Phase plus the grading state that only exists after submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Workflow {
    phase: Phase,
    attempted: Vec<QuestionId>,
    verdicts: CorrectnessMap,
}

impl Workflow {
    pub(crate) fn new() -> Self {
        Self {
            phase: Phase::Login,
            attempted: Vec::new(),
            verdicts: CorrectnessMap::new(),
        }
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn require(&self, expected: Phase) -> Result<(), SessionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    /// Move from `from` to its successor.
    pub(crate) fn advance(&mut self, from: Phase) -> Result<Phase, SessionError> {
        self.require(from)?;
        let Some(to) = from.next() else {
            return Err(SessionError::InvalidPhase {
                expected: from,
                actual: self.phase,
            });
        };
        self.phase = to;
        tracing::info!(from = %from, to = %to, "exam phase changed");
        Ok(to)
    }

    /// `submitted -> verifying`, freezing the attempted set.
    pub(crate) fn begin_verification(&mut self, questions: &[Question]) -> Result<(), SessionError> {
        self.advance(Phase::Submitted)?;
        self.attempted = questions
            .iter()
            .filter(|q| q.status().is_attempted())
            .map(Question::id)
            .collect();
        tracing::info!(attempted = self.attempted.len(), "verification started");
        Ok(())
    }

    pub(crate) fn attempted(&self) -> &[QuestionId] {
        &self.attempted
    }

    pub(crate) fn verdicts(&self) -> &CorrectnessMap {
        &self.verdicts
    }

    pub(crate) fn set_correctness(
        &mut self,
        id: QuestionId,
        is_correct: bool,
    ) -> Result<(), SessionError> {
        self.require(Phase::Verifying)?;
        if !self.attempted.contains(&id) {
            return Err(SessionError::NotAttempted(id));
        }
        self.verdicts.set(id, is_correct);
        tracing::debug!(question = %id, is_correct, "verdict recorded");
        Ok(())
    }

    pub(crate) fn ungraded_count(&self) -> usize {
        self.attempted
            .iter()
            .filter(|id| !self.verdicts.contains(**id))
            .count()
    }

    /// `verifying -> scored`, only once every attempted question has a verdict.
    pub(crate) fn finish(&mut self) -> Result<(), SessionError> {
        self.require(Phase::Verifying)?;
        let remaining = self.ungraded_count();
        if remaining > 0 {
            tracing::warn!(remaining, "scorecard requested with ungraded questions");
            return Err(SessionError::UngradedQuestions { remaining });
        }
        self.advance(Phase::Verifying)?;
        Ok(())
    }
}
