//! Shared error types for the services crate.

use thiserror::Error;

use exam_core::model::{QuestionError, QuestionId, SectionId, SectionMapError};

use crate::sessions::Phase;

/// Errors emitted by the exam session and its workflow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("operation requires the {expected} phase, session is in {actual}")]
    InvalidPhase { expected: Phase, actual: Phase },
    #[error("candidate name cannot be empty")]
    EmptyCandidateName,
    #[error("exam name cannot be empty")]
    EmptyExamName,
    #[error("instructions must be acknowledged before starting")]
    NotAcknowledged,
    #[error("{remaining} questions remain ungraded")]
    UngradedQuestions { remaining: usize },
    #[error("question {0} was not attempted and cannot be graded")]
    NotAttempted(QuestionId),
    #[error("unknown question: {0}")]
    UnknownQuestion(QuestionId),
    #[error("unknown section: {0}")]
    UnknownSection(SectionId),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Configuration(#[from] SectionMapError),
}

/// Failures reported by host capabilities. Never fatal to the session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HostError {
    #[error("{0} is not supported by this host")]
    Unsupported(&'static str),
    #[error("host request failed: {0}")]
    Failed(String),
}
