mod countdown;
mod draw;
mod events;
mod presentation;
mod session;
mod workflow;

#[cfg(test)]
mod test_harness;

// Public API of the session subsystem.
pub use crate::error::QuizError;
pub use countdown::Countdown;
pub use draw::draw_questions;
pub use events::{Flow, QuizEvent};
pub use presentation::{NavState, Presentation, QuestionView, Screen, format_remaining};
pub use session::{QuizSession, SessionPhase, SubmitOutcome, TickOutcome};
pub use workflow::QuizService;
