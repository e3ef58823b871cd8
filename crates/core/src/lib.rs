#![forbid(unsafe_code)]

pub mod config;
pub mod model;
pub mod scoring;
pub mod time;

pub use config::{ConfigError, ExamBlueprint, ExamConfig};
pub use time::Clock;
