use exam_core::model::{QuestionId, QuestionPaper, paper::placeholder_prompt};

pub const DEFAULT_HEIGHT: u32 = 400;
pub const HEIGHT_STEP: u32 = 100;
pub const MIN_HEIGHT: u32 = 200;
pub const MAX_HEIGHT: u32 = 1200;

/// Question paper viewport. Height only changes in fixed steps, within bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaperView {
    height: u32,
}

impl Default for PaperView {
    fn default() -> Self {
        Self {
            height: DEFAULT_HEIGHT,
        }
    }
}

impl PaperView {
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn zoom_in(&mut self) -> u32 {
        self.height = (self.height + HEIGHT_STEP).min(MAX_HEIGHT);
        self.height
    }

    pub fn zoom_out(&mut self) -> u32 {
        self.height = self.height.saturating_sub(HEIGHT_STEP).max(MIN_HEIGHT);
        self.height
    }

    /// The single line shown where the paper would be displayed.
    #[must_use]
    pub fn caption(&self, paper: Option<&QuestionPaper>, current: QuestionId) -> String {
        match paper {
            Some(paper) => format!(
                "[paper: {} ({} bytes), viewer height {}px]",
                paper.name(),
                paper.len(),
                self.height
            ),
            None => placeholder_prompt(current),
        }
    }
}
