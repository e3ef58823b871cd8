mod ids;
pub mod paper;
mod question;
mod section;

pub use ids::{ParseIdError, QuestionId, SectionId};
pub use paper::{PDF_CONTENT_TYPE, PaperError, QuestionPaper};

pub use question::{
    AnswerInput, OptionChoice, Question, QuestionError, QuestionKind, QuestionStatus,
    create_questions, derive_status,
};
pub use section::{Section, SectionMap, SectionMapError};
