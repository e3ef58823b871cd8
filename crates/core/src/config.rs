//! Exam blueprint configuration.
//!
//! An `ExamConfig` is the raw, deserializable form (TOML). It becomes an
//! `ExamBlueprint` only after the section layout validates.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::model::{QuestionKind, Section, SectionId, SectionMap, SectionMapError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("failed to read exam config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] toml::de::Error),
    #[error("exam duration must be > 0 minutes")]
    InvalidDuration,
    #[error("exam name cannot be empty")]
    EmptyExamName,
    #[error(transparent)]
    Sections(#[from] SectionMapError),
}

/// One section entry as written in the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SectionConfig {
    pub id: String,
    pub label: String,
    pub start: u32,
    pub end: u32,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub subject: String,
}

impl SectionConfig {
    fn new(id: &str, label: &str, start: u32, end: u32, kind: QuestionKind, subject: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            start,
            end,
            kind,
            subject: subject.to_string(),
        }
    }
}

/// Raw exam configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExamConfig {
    pub exam_name: String,
    pub duration_minutes: u32,
    pub total_questions: u32,
    pub sections: Vec<SectionConfig>,
}

impl Default for ExamConfig {
    /// The 75-question, three-subject paper with a 180 minute limit.
    fn default() -> Self {
        use QuestionKind::{NumericEntry, SingleChoice};
        Self {
            exam_name: "JEE (Main) - 2026".to_string(),
            duration_minutes: 180,
            total_questions: 75,
            sections: vec![
                SectionConfig::new("math_a", "Mathematics Section A", 1, 20, SingleChoice, "Mathematics"),
                SectionConfig::new("math_b", "Mathematics Section B", 21, 25, NumericEntry, "Mathematics"),
                SectionConfig::new("phys_a", "Physics Section A", 26, 45, SingleChoice, "Physics"),
                SectionConfig::new("phys_b", "Physics Section B", 46, 50, NumericEntry, "Physics"),
                SectionConfig::new("chem_a", "Chemistry Section A", 51, 70, SingleChoice, "Chemistry"),
                SectionConfig::new("chem_b", "Chemistry Section B", 71, 75, NumericEntry, "Chemistry"),
            ],
        }
    }
}

impl ExamConfig {
    /// Parse a TOML document. Missing keys fall back to the default blueprint.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed TOML.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Read and parse a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, `ConfigError::Parse` otherwise.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_minutes.saturating_mul(60)
    }

    /// Validate the configuration into an immutable blueprint.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an empty name, zero duration, or invalid sections.
    pub fn into_blueprint(self) -> Result<ExamBlueprint, ConfigError> {
        if self.exam_name.trim().is_empty() {
            return Err(ConfigError::EmptyExamName);
        }
        if self.duration_minutes == 0 {
            return Err(ConfigError::InvalidDuration);
        }
        let duration_secs = self.duration_secs();
        let sections = self
            .sections
            .into_iter()
            .map(|s| Section::new(SectionId::new(s.id), s.label, s.start, s.end, s.kind, s.subject))
            .collect();
        let sections = SectionMap::new(sections, self.total_questions)?;

        Ok(ExamBlueprint {
            exam_name: self.exam_name,
            duration_secs,
            sections,
        })
    }
}

/// Validated, immutable exam definition shared by every session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamBlueprint {
    exam_name: String,
    duration_secs: u32,
    sections: SectionMap,
}

impl ExamBlueprint {
    #[must_use]
    pub fn exam_name(&self) -> &str {
        &self.exam_name
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    #[must_use]
    pub fn sections(&self) -> &SectionMap {
        &self.sections
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.sections.total()
    }
}
