use std::collections::HashSet;

use thiserror::Error;

use crate::model::ids::{QuestionId, SectionId};
use crate::model::question::QuestionKind;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Invalid section layout. Always fatal at startup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SectionMapError {
    #[error("exam must have at least one question")]
    NoQuestions,

    #[error("exam must declare at least one section")]
    NoSections,

    #[error("section id cannot be empty")]
    EmptySectionId,

    #[error("duplicate section id: {0}")]
    DuplicateSection(SectionId),

    #[error("section {section} has an invalid range {start}..={end}")]
    InvalidRange {
        section: SectionId,
        start: u32,
        end: u32,
    },

    #[error("question {question} is not covered by any section")]
    Gap { question: u32 },

    #[error("question {question} is covered by more than one section")]
    Overlap { question: u32 },

    #[error("section {section} reaches question {end} beyond the total of {total}")]
    OutOfRange {
        section: SectionId,
        end: u32,
        total: u32,
    },
}

//
// ─── SECTION ───────────────────────────────────────────────────────────────────
//

/// Static descriptor for one section tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    id: SectionId,
    label: String,
    start: QuestionId,
    end: QuestionId,
    kind: QuestionKind,
    subject: String,
}

impl Section {
    #[must_use]
    pub fn new(
        id: SectionId,
        label: impl Into<String>,
        start: u32,
        end: u32,
        kind: QuestionKind,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            start: QuestionId::new(start),
            end: QuestionId::new(end),
            kind,
            subject: subject.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &SectionId {
        &self.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn start(&self) -> QuestionId {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> QuestionId {
        self.end
    }

    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        self.kind
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Inclusive range membership.
    #[must_use]
    pub fn contains(&self, id: QuestionId) -> bool {
        id >= self.start && id <= self.end
    }

    /// Number of questions in this section.
    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.end.value() - self.start.value() + 1
    }
}

//
// ─── SECTION MAP ───────────────────────────────────────────────────────────────
//

/// Validated partition of question ids `1..=total` into sections.
///
/// Sections keep their declaration order (tab order). Ranges are contiguous,
/// non-overlapping and cover every id exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMap {
    sections: Vec<Section>,
    total: u32,
}

impl SectionMap {
    /// Validate and build a section map.
    ///
    /// # Errors
    ///
    /// Returns `SectionMapError` if the sections do not partition `1..=total` exactly.
    pub fn new(sections: Vec<Section>, total: u32) -> Result<Self, SectionMapError> {
        if total == 0 {
            return Err(SectionMapError::NoQuestions);
        }
        if sections.is_empty() {
            return Err(SectionMapError::NoSections);
        }

        let mut seen = HashSet::new();
        for section in &sections {
            if section.id.as_str().trim().is_empty() {
                return Err(SectionMapError::EmptySectionId);
            }
            if !seen.insert(section.id.clone()) {
                return Err(SectionMapError::DuplicateSection(section.id.clone()));
            }
            if section.start.value() == 0 || section.start > section.end {
                return Err(SectionMapError::InvalidRange {
                    section: section.id.clone(),
                    start: section.start.value(),
                    end: section.end.value(),
                });
            }
            if section.end.value() > total {
                return Err(SectionMapError::OutOfRange {
                    section: section.id.clone(),
                    end: section.end.value(),
                    total,
                });
            }
        }

        let mut ordered: Vec<&Section> = sections.iter().collect();
        ordered.sort_by_key(|s| s.start);

        let mut next = 1_u32;
        for section in ordered {
            let start = section.start.value();
            if start > next {
                return Err(SectionMapError::Gap { question: next });
            }
            if start < next {
                return Err(SectionMapError::Overlap { question: start });
            }
            next = section.end.value().saturating_add(1);
        }
        if next <= total {
            return Err(SectionMapError::Gap { question: next });
        }

        Ok(Self { sections, total })
    }

    /// Total number of questions covered.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Sections in declaration (tab) order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// The first tab.
    #[must_use]
    pub fn first(&self) -> &Section {
        // `new` rejects an empty list.
        &self.sections[0]
    }

    /// Section owning the given question. Total over `1..=total`.
    #[must_use]
    pub fn section_for_question(&self, id: QuestionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.contains(id))
    }

    /// Section for a tab id.
    #[must_use]
    pub fn section(&self, id: &SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| &s.id == id)
    }

    /// Distinct subjects in tab order.
    #[must_use]
    pub fn subjects(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for section in &self.sections {
            if !out.contains(&section.subject()) {
                out.push(section.subject());
            }
        }
        out
    }
}
