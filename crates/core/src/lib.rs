#![forbid(unsafe_code)]

pub mod model;
pub mod scoring;
pub mod time;

pub use scoring::{NOT_ANSWERED, ScoreReport, SectionTally, WrongAnswer, score};
pub use time::Clock;
