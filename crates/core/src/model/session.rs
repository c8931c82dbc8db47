use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Question;
use crate::scoring::{self, ScoreReport};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionStateError {
    #[error("a session needs at least one question")]
    NoQuestions,

    #[error("{answers} answers recorded for {questions} questions")]
    AnswerCountMismatch { questions: usize, answers: usize },

    #[error("question index {index} is out of range (0..{len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("option {option} is out of range for question {question} ({options} options)")]
    OptionOutOfRange {
        question: usize,
        option: usize,
        options: usize,
    },
}

//
// ─── DIRECTION ─────────────────────────────────────────────────────────────────
//

/// One step backwards or forwards through the question list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    #[must_use]
    pub fn offset(self) -> isize {
        match self {
            Direction::Previous => -1,
            Direction::Next => 1,
        }
    }
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Everything needed to resume an attempt: the drawn questions, the answers so far,
/// the cursor, and the countdown.
///
/// `answers` is index-aligned with `questions`; `None` means not answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PersistedSessionState", into = "PersistedSessionState")]
pub struct SessionState {
    questions: Vec<Question>,
    answers: Vec<Option<usize>>,
    current_index: usize,
    time_remaining: u32,
    start_time: DateTime<Utc>,
}

impl SessionState {
    /// Fresh state: everything unanswered, cursor on the first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::NoQuestions` if `questions` is empty.
    pub fn new(
        questions: Vec<Question>,
        duration_secs: u32,
        start_time: DateTime<Utc>,
    ) -> Result<Self, SessionStateError> {
        let answers = vec![None; questions.len()];
        Self::from_persisted(questions, answers, 0, duration_secs, start_time)
    }

    /// Rehydrate a state, checking every invariant.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError` if the answers do not line up with the questions,
    /// the cursor is out of range, or a stored answer does not address an option.
    pub fn from_persisted(
        questions: Vec<Question>,
        answers: Vec<Option<usize>>,
        current_index: usize,
        time_remaining: u32,
        start_time: DateTime<Utc>,
    ) -> Result<Self, SessionStateError> {
        if questions.is_empty() {
            return Err(SessionStateError::NoQuestions);
        }
        if answers.len() != questions.len() {
            return Err(SessionStateError::AnswerCountMismatch {
                questions: questions.len(),
                answers: answers.len(),
            });
        }
        if current_index >= questions.len() {
            return Err(SessionStateError::IndexOutOfRange {
                index: current_index,
                len: questions.len(),
            });
        }
        for (i, (question, answer)) in questions.iter().zip(&answers).enumerate() {
            if let Some(option) = *answer {
                if option >= question.options().len() {
                    return Err(SessionStateError::OptionOutOfRange {
                        question: i,
                        option,
                        options: question.options().len(),
                    });
                }
            }
        }

        Ok(Self {
            questions,
            answers,
            current_index,
            time_remaining,
            start_time,
        })
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    #[must_use]
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.current_index]
    }

    /// The option chosen for the question under the cursor, if any.
    #[must_use]
    pub fn selected_option(&self) -> Option<usize> {
        self.answers[self.current_index]
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.current_index == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.current_index + 1 == self.questions.len()
    }

    /// "Question i of N", 1-based.
    #[must_use]
    pub fn progress_text(&self) -> String {
        format!(
            "Question {} of {}",
            self.current_index + 1,
            self.questions.len()
        )
    }

    #[must_use]
    pub fn answered_flags(&self) -> Vec<bool> {
        self.answers.iter().map(Option::is_some).collect()
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_none()).count()
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.time_remaining == 0
    }

    /// Record `option` for the question under the cursor, replacing any earlier choice.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::OptionOutOfRange` if `option` does not address
    /// one of the current question's options.
    pub fn select_option(&mut self, option: usize) -> Result<(), SessionStateError> {
        let options = self.current_question().options().len();
        if option >= options {
            return Err(SessionStateError::OptionOutOfRange {
                question: self.current_index,
                option,
                options,
            });
        }
        self.answers[self.current_index] = Some(option);
        Ok(())
    }

    /// Step the cursor one question. Returns `false` without moving at either end.
    pub fn navigate(&mut self, direction: Direction) -> bool {
        match self
            .current_index
            .checked_add_signed(direction.offset())
            .filter(|next| *next < self.questions.len())
        {
            Some(next) => {
                self.current_index = next;
                true
            }
            None => false,
        }
    }

    /// Move the cursor directly to `index`.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::IndexOutOfRange` if `index` is not a question.
    pub fn jump_to(&mut self, index: usize) -> Result<(), SessionStateError> {
        if index >= self.questions.len() {
            return Err(SessionStateError::IndexOutOfRange {
                index,
                len: self.questions.len(),
            });
        }
        self.current_index = index;
        Ok(())
    }

    /// Count down one second and return what is left. Never goes below zero.
    pub fn tick(&mut self) -> u32 {
        self.time_remaining = self.time_remaining.saturating_sub(1);
        self.time_remaining
    }

    #[must_use]
    pub fn score(&self) -> ScoreReport {
        scoring::score(&self.questions, &self.answers)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedSessionState {
    questions: Vec<Question>,
    answers: Vec<Option<usize>>,
    current_index: usize,
    time_remaining: u32,
    start_time: DateTime<Utc>,
}

impl TryFrom<PersistedSessionState> for SessionState {
    type Error = SessionStateError;

    fn try_from(p: PersistedSessionState) -> Result<Self, Self::Error> {
        SessionState::from_persisted(
            p.questions,
            p.answers,
            p.current_index,
            p.time_remaining,
            p.start_time,
        )
    }
}

impl From<SessionState> for PersistedSessionState {
    fn from(s: SessionState) -> Self {
        Self {
            questions: s.questions,
            answers: s.answers,
            current_index: s.current_index,
            time_remaining: s.time_remaining,
            start_time: s.start_time,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
