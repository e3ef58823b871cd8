mod paper_vm;
mod time_fmt;

pub use paper_vm::PaperView;
pub use time_fmt::{format_clock, format_datetime, format_hours_minutes};
