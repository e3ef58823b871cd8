//! Marks computation from verified results.
//!
//! Fixed scheme: +4 for a correct attempted question, -1 for an incorrect one,
//! 0 for anything unattempted or ungraded. Totals may go negative.

use std::collections::BTreeMap;

use crate::model::{Question, QuestionId};

pub const CORRECT_MARKS: i32 = 4;
pub const INCORRECT_MARKS: i32 = -1;

//
// ─── CORRECTNESS MAP ───────────────────────────────────────────────────────────
//

/// Grader verdicts keyed by question. A missing entry means "not yet graded".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrectnessMap {
    verdicts: BTreeMap<QuestionId, bool>,
}

impl CorrectnessMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a verdict, replacing any earlier one.
    pub fn set(&mut self, id: QuestionId, is_correct: bool) {
        self.verdicts.insert(id, is_correct);
    }

    #[must_use]
    pub fn get(&self, id: QuestionId) -> Option<bool> {
        self.verdicts.get(&id).copied()
    }

    #[must_use]
    pub fn contains(&self, id: QuestionId) -> bool {
        self.verdicts.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, bool)> + '_ {
        self.verdicts.iter().map(|(id, ok)| (*id, *ok))
    }
}

//
// ─── REPORT ────────────────────────────────────────────────────────────────────
//

/// Counts and marks for a group of questions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreTally {
    pub attempted: u32,
    pub correct: u32,
    pub incorrect: u32,
    pub marks: i32,
}

impl ScoreTally {
    fn record(&mut self, question: &Question, verdicts: &CorrectnessMap) {
        if !question.status().is_attempted() {
            return;
        }
        self.attempted += 1;
        match verdicts.get(question.id()) {
            Some(true) => self.correct += 1,
            Some(false) => self.incorrect += 1,
            None => {}
        }
        self.marks += contribution(question, verdicts);
    }
}

/// Per-subject line of the scorecard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectScore {
    pub subject: String,
    pub tally: ScoreTally,
}

/// Final marks: grand total plus one row per subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreReport {
    pub overall: ScoreTally,
    pub subjects: Vec<SubjectScore>,
}

impl ScoreReport {
    #[must_use]
    pub fn subject(&self, name: &str) -> Option<&ScoreTally> {
        self.subjects
            .iter()
            .find(|row| row.subject == name)
            .map(|row| &row.tally)
    }
}

/// Marks contributed by a single question.
#[must_use]
pub fn contribution(question: &Question, verdicts: &CorrectnessMap) -> i32 {
    if !question.status().is_attempted() {
        return 0;
    }
    match verdicts.get(question.id()) {
        Some(true) => CORRECT_MARKS,
        Some(false) => INCORRECT_MARKS,
        None => 0,
    }
}

/// Score a question set. Subjects appear in order of first occurrence.
#[must_use]
pub fn score(questions: &[Question], verdicts: &CorrectnessMap) -> ScoreReport {
    let mut overall = ScoreTally::default();
    let mut subjects: Vec<SubjectScore> = Vec::new();

    for question in questions {
        overall.record(question, verdicts);

        let existing = subjects
            .iter()
            .position(|row| row.subject == question.subject());
        let pos = existing.unwrap_or_else(|| {
            subjects.push(SubjectScore {
                subject: question.subject().to_string(),
                tally: ScoreTally::default(),
            });
            subjects.len() - 1
        });
        subjects[pos].tally.record(question, verdicts);
    }

    ScoreReport { overall, subjects }
}
