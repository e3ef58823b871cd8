use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One-based identifier of a question within an exam.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(u32);

impl QuestionId {
    /// Creates a new `QuestionId`
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Builds the id for a zero-based position in the question list.
    ///
    /// Returns `None` if the position does not fit the id range.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index)
            .ok()
            .and_then(|i| i.checked_add(1))
            .map(Self)
    }

    /// Returns the underlying u32 value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Zero-based position of this question in the question list.
    ///
    /// Returns `None` for the invalid id `0`.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.0
            .checked_sub(1)
            .and_then(|i| usize::try_from(i).ok())
    }
}

/// Stable slug identifying a section tab (e.g. `math_a`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({})", self.0)
    }
}

impl fmt::Debug for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SectionId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

/// Error type for parsing ID from string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    kind: &'static str,
}

impl fmt::Display for ParseIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to parse {} from string", self.kind)
    }
}

impl std::error::Error for ParseIdError {}

impl FromStr for QuestionId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .ok()
            .filter(|id| *id > 0)
            .map(QuestionId::new)
            .ok_or(ParseIdError { kind: "QuestionId" })
    }
}

impl FromStr for SectionId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseIdError { kind: "SectionId" });
        }
        Ok(SectionId::new(trimmed))
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_id_index_is_zero_based() {
        assert_eq!(QuestionId::new(1).index(), Some(0));
        assert_eq!(QuestionId::new(75).index(), Some(74));
        assert_eq!(QuestionId::new(0).index(), None);
    }

    #[test]
    fn question_id_from_index() {
        assert_eq!(QuestionId::from_index(0), Some(QuestionId::new(1)));
        assert_eq!(QuestionId::from_index(20), Some(QuestionId::new(21)));
    }

    #[test]
    fn question_id_from_str_rejects_zero() {
        assert!("0".parse::<QuestionId>().is_err());
        assert!("abc".parse::<QuestionId>().is_err());
        assert_eq!("12".parse::<QuestionId>().unwrap(), QuestionId::new(12));
    }

    #[test]
    fn section_id_display() {
        let id = SectionId::new("math_b");
        assert_eq!(id.to_string(), "math_b");
        assert_eq!(id.as_str(), "math_b");
    }

    #[test]
    fn section_id_from_str_rejects_blank() {
        assert!("  ".parse::<SectionId>().is_err());
        assert_eq!(" phys_a ".parse::<SectionId>().unwrap(), SectionId::new("phys_a"));
    }
}
