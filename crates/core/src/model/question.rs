use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::{QuestionId, SectionId};
use crate::model::section::{SectionMap, SectionMapError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("option must be between 1 and 4, got {0}")]
    InvalidOption(u8),

    #[error("question {id} expects a {expected} response")]
    KindMismatch { id: QuestionId, expected: QuestionKind },
}

//
// ─── KIND ──────────────────────────────────────────────────────────────────────
//

/// Response format of a question, fixed by its section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionKind {
    /// One of four options.
    #[serde(rename = "mcq")]
    SingleChoice,
    /// Free keypad entry representing a decimal number.
    #[serde(rename = "numeric")]
    NumericEntry,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::SingleChoice => f.write_str("single-choice"),
            QuestionKind::NumericEntry => f.write_str("numeric-entry"),
        }
    }
}

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Palette status of a question.
///
/// Declared in display precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QuestionStatus {
    /// Never opened.
    NotVisited,
    /// Saved without a value.
    NotAnswered,
    /// Saved with a value.
    Answered,
    /// Flagged for review without a value.
    Marked,
    /// Flagged for review with a value.
    AnsweredMarked,
}

impl QuestionStatus {
    pub const ALL: [QuestionStatus; 5] = [
        QuestionStatus::NotVisited,
        QuestionStatus::NotAnswered,
        QuestionStatus::Answered,
        QuestionStatus::Marked,
        QuestionStatus::AnsweredMarked,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionStatus::NotVisited => "not-visited",
            QuestionStatus::NotAnswered => "not-answered",
            QuestionStatus::Answered => "answered",
            QuestionStatus::Marked => "marked",
            QuestionStatus::AnsweredMarked => "answered-marked",
        }
    }

    /// Whether a question in this status is eligible for grading.
    #[must_use]
    pub fn is_attempted(self) -> bool {
        matches!(self, QuestionStatus::Answered | QuestionStatus::AnsweredMarked)
    }
}

impl fmt::Display for QuestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps content presence and review intent to a status.
///
/// This is the only place a status other than `NotVisited` is produced.
#[must_use]
pub fn derive_status(has_value: bool, want_marked: bool) -> QuestionStatus {
    match (has_value, want_marked) {
        (true, false) => QuestionStatus::Answered,
        (true, true) => QuestionStatus::AnsweredMarked,
        (false, false) => QuestionStatus::NotAnswered,
        (false, true) => QuestionStatus::Marked,
    }
}

//
// ─── ANSWER INPUT ──────────────────────────────────────────────────────────────
//

/// A validated single-choice option in `1..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionChoice(u8);

impl OptionChoice {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    /// # Errors
    ///
    /// Returns `QuestionError::InvalidOption` outside `1..=4`.
    pub fn new(value: u8) -> Result<Self, QuestionError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(QuestionError::InvalidOption(value))
        }
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

/// An edit applied to the current question's response buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerInput {
    /// Select an option (single-choice only).
    Select(OptionChoice),
    /// Append characters to the numeric buffer, unvalidated.
    Append(String),
    /// Remove the last character of the numeric buffer.
    Backspace,
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Per-question record tracked through the exam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    section: SectionId,
    subject: String,
    kind: QuestionKind,
    status: QuestionStatus,
    selected_option: Option<OptionChoice>,
    numeric_value: String,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn section(&self) -> &SectionId {
        &self.section
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    #[must_use]
    pub fn status(&self) -> QuestionStatus {
        self.status
    }

    #[must_use]
    pub fn selected_option(&self) -> Option<OptionChoice> {
        self.selected_option
    }

    #[must_use]
    pub fn numeric_value(&self) -> &str {
        &self.numeric_value
    }

    /// Whether the field active for this question's kind holds a value.
    #[must_use]
    pub fn has_value(&self) -> bool {
        match self.kind {
            QuestionKind::SingleChoice => self.selected_option.is_some(),
            QuestionKind::NumericEntry => !self.numeric_value.is_empty(),
        }
    }

    /// Status this question would have if committed now.
    #[must_use]
    pub fn derive_status(&self, want_marked: bool) -> QuestionStatus {
        derive_status(self.has_value(), want_marked)
    }

    /// Response as shown to the grader: `Opt N` or the raw numeric buffer.
    #[must_use]
    pub fn response_label(&self) -> String {
        match self.kind {
            QuestionKind::SingleChoice => self
                .selected_option
                .map(|opt| format!("Opt {}", opt.value()))
                .unwrap_or_default(),
            QuestionKind::NumericEntry => self.numeric_value.clone(),
        }
    }

    /// Edit the response buffer. Status is left untouched.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::KindMismatch` if the input does not fit the question kind.
    pub fn apply_input(&mut self, input: AnswerInput) -> Result<(), QuestionError> {
        match (self.kind, input) {
            (QuestionKind::SingleChoice, AnswerInput::Select(choice)) => {
                self.selected_option = Some(choice);
            }
            (QuestionKind::NumericEntry, AnswerInput::Append(text)) => {
                self.numeric_value.push_str(&text);
            }
            (QuestionKind::NumericEntry, AnswerInput::Backspace) => {
                self.numeric_value.pop();
            }
            (kind, _) => {
                return Err(QuestionError::KindMismatch {
                    id: self.id,
                    expected: kind,
                });
            }
        }
        Ok(())
    }

    /// Commit the current content, recomputing the status.
    pub fn commit(&mut self, want_marked: bool) -> QuestionStatus {
        self.status = self.derive_status(want_marked);
        self.status
    }

    /// Drop any response and commit as unanswered.
    pub fn clear(&mut self) -> QuestionStatus {
        self.selected_option = None;
        self.numeric_value.clear();
        self.commit(false)
    }
}

/// Build the ordered question list `1..=total` from a validated section map.
///
/// # Errors
///
/// Returns `SectionMapError::Gap` / `SectionMapError::Overlap` if any id does not
/// belong to exactly one section.
pub fn create_questions(sections: &SectionMap) -> Result<Vec<Question>, SectionMapError> {
    (1..=sections.total())
        .map(|raw| {
            let id = QuestionId::new(raw);
            let mut owners = sections.sections().iter().filter(|s| s.contains(id));
            let section = owners
                .next()
                .ok_or(SectionMapError::Gap { question: raw })?;
            if owners.next().is_some() {
                return Err(SectionMapError::Overlap { question: raw });
            }
            Ok(Question {
                id,
                section: section.id().clone(),
                subject: section.subject().to_string(),
                kind: section.kind(),
                status: QuestionStatus::NotVisited,
                selected_option: None,
                numeric_value: String::new(),
            })
        })
        .collect()
}
