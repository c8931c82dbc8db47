#![forbid(unsafe_code)]

pub mod bank;
pub mod error;
pub mod sessions;

pub use quiz_core::Clock;

pub use bank::fetch_question_bank;
pub use error::{BankFetchError, QuizError};
pub use sessions::{
    Countdown, Flow, NavState, Presentation, QuestionView, QuizEvent, QuizService, QuizSession,
    Screen, SessionPhase, SubmitOutcome, TickOutcome, draw_questions, format_remaining,
};
