use exam_core::model::{Question, QuestionStatus};

/// Per-status counts for the palette legend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub not_visited: usize,
    pub not_answered: usize,
    pub answered: usize,
    pub marked: usize,
    pub answered_marked: usize,
}

impl StatusCounts {
    #[must_use]
    pub fn from_questions(questions: &[Question]) -> Self {
        let mut counts = Self::default();
        for question in questions {
            match question.status() {
                QuestionStatus::NotVisited => counts.not_visited += 1,
                QuestionStatus::NotAnswered => counts.not_answered += 1,
                QuestionStatus::Answered => counts.answered += 1,
                QuestionStatus::Marked => counts.marked += 1,
                QuestionStatus::AnsweredMarked => counts.answered_marked += 1,
            }
        }
        counts
    }

    #[must_use]
    pub fn get(&self, status: QuestionStatus) -> usize {
        match status {
            QuestionStatus::NotVisited => self.not_visited,
            QuestionStatus::NotAnswered => self.not_answered,
            QuestionStatus::Answered => self.answered,
            QuestionStatus::Marked => self.marked,
            QuestionStatus::AnsweredMarked => self.answered_marked,
        }
    }

    /// Questions that will be graded: answered, with or without a review flag.
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.answered + self.answered_marked
    }
}

/// Summary shown right after submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionSummary {
    pub answered: usize,
    pub not_answered: usize,
    pub time_spent_secs: u32,
}

impl SubmissionSummary {
    #[must_use]
    pub fn new(counts: StatusCounts, time_spent_secs: u32) -> Self {
        Self {
            answered: counts.attempted(),
            not_answered: counts.not_answered,
            time_spent_secs,
        }
    }
}
