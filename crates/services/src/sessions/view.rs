use exam_core::model::{QuestionId, QuestionKind, QuestionStatus};
use exam_core::scoring::ScoreReport;

/// One cell of the question palette for the active tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteEntry {
    pub id: QuestionId,
    pub status: QuestionStatus,
    pub is_current: bool,
}

/// One attempted question awaiting (or holding) a verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRow {
    pub id: QuestionId,
    pub subject: String,
    pub kind: QuestionKind,
    pub response: String,
    pub verdict: Option<bool>,
}

/// Everything the final result screen and the printer need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scorecard {
    pub exam_name: String,
    pub candidate_name: String,
    pub time_spent_secs: u32,
    pub report: ScoreReport,
}
