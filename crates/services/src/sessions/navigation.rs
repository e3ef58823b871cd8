use exam_core::model::{
    AnswerInput, Question, QuestionError, QuestionStatus, SectionId, SectionMap,
};

use crate::error::SessionError;

/// Current question pointer and active section tab.
///
/// Owns nothing but the cursor; question records are borrowed per call so the
/// session decides when mutation is allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: usize,
    active_section: SectionId,
}

impl Navigator {
    /// Position on the first question of the first tab.
    #[must_use]
    pub fn new(sections: &SectionMap) -> Self {
        let first = sections.first();
        Self {
            current: first.start().index().unwrap_or(0),
            active_section: first.id().clone(),
        }
    }

    #[must_use]
    pub fn current(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn active_section(&self) -> &SectionId {
        &self.active_section
    }

    /// Jump to `index`, syncing the tab. Out of range is a silent no-op.
    ///
    /// Returns whether the pointer moved.
    pub fn go_to(&mut self, questions: &[Question], index: usize) -> bool {
        let Some(target) = questions.get(index) else {
            tracing::debug!(index, "navigation ignored: index out of range");
            return false;
        };
        self.current = index;
        self.active_section = target.section().clone();
        true
    }

    /// Edit the current question's response without touching its status.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::KindMismatch` if the input does not fit the question.
    pub fn set_answer(
        &self,
        questions: &mut [Question],
        input: AnswerInput,
    ) -> Result<(), QuestionError> {
        match questions.get_mut(self.current) {
            Some(question) => question.apply_input(input),
            None => Ok(()),
        }
    }

    /// Commit the current question as answered/unanswered and move on.
    pub fn save_and_next(&mut self, questions: &mut [Question]) -> Option<QuestionStatus> {
        self.commit_and_advance(questions, false)
    }

    /// Commit the current question flagged for review and move on.
    pub fn mark_for_review(&mut self, questions: &mut [Question]) -> Option<QuestionStatus> {
        self.commit_and_advance(questions, true)
    }

    /// Drop the current response. The pointer stays put.
    pub fn clear_response(&self, questions: &mut [Question]) -> Option<QuestionStatus> {
        let question = questions.get_mut(self.current)?;
        let status = question.clear();
        tracing::debug!(question = %question.id(), %status, "response cleared");
        Some(status)
    }

    /// Switch tab and jump to its first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownSection` for an id not in the section map.
    pub fn select_section(
        &mut self,
        sections: &SectionMap,
        id: &SectionId,
    ) -> Result<(), SessionError> {
        let section = sections
            .section(id)
            .ok_or_else(|| SessionError::UnknownSection(id.clone()))?;
        self.active_section = section.id().clone();
        if let Some(index) = section.start().index() {
            self.current = index;
        }
        Ok(())
    }

    fn commit_and_advance(
        &mut self,
        questions: &mut [Question],
        want_marked: bool,
    ) -> Option<QuestionStatus> {
        let question = questions.get_mut(self.current)?;
        let status = question.commit(want_marked);
        tracing::debug!(question = %question.id(), %status, "response committed");

        // No wraparound: the last question stays current.
        let next = self.current + 1;
        if next < questions.len() {
            self.go_to(questions, next);
        }
        Some(status)
    }
}
