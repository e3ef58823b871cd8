use std::fmt;
use thiserror::Error;

use crate::model::ids::QuestionId;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PaperError {
    #[error("unsupported question paper type: {0}")]
    UnsupportedContentType(String),

    #[error("question paper is empty")]
    Empty,
}

/// An uploaded question paper, kept as opaque bytes for the host viewer.
#[derive(Clone, PartialEq, Eq)]
pub struct QuestionPaper {
    name: String,
    bytes: Vec<u8>,
}

impl QuestionPaper {
    /// Accept an upload whose declared content type is PDF.
    ///
    /// # Errors
    ///
    /// Returns `PaperError::UnsupportedContentType` for any other type and
    /// `PaperError::Empty` for a zero-length upload.
    pub fn from_upload(
        name: impl Into<String>,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<Self, PaperError> {
        if !content_type.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE) {
            return Err(PaperError::UnsupportedContentType(content_type.to_string()));
        }
        if bytes.is_empty() {
            return Err(PaperError::Empty);
        }
        Ok(Self {
            name: name.into(),
            bytes,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Debug for QuestionPaper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuestionPaper")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Guess a content type from leading bytes when the host did not declare one.
#[must_use]
pub fn sniff_content_type(bytes: &[u8]) -> Option<&'static str> {
    bytes.starts_with(PDF_MAGIC).then_some(PDF_CONTENT_TYPE)
}

/// Text shown in place of the viewer when no paper is attached.
#[must_use]
pub fn placeholder_prompt(id: QuestionId) -> String {
    format!("Please read Question Number {id} from your booklet.")
}
