//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{Section, SessionStateError};
use storage::BankDocumentError;
use storage::repository::StorageError;

/// Errors emitted by the quiz session and its driver.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("section {section} has {available} questions but {required} are required")]
    InsufficientQuestions {
        section: Section,
        available: usize,
        required: usize,
    },
    #[error("question bank unavailable: {0}")]
    Bank(#[source] StorageError),
    #[error("no quiz in progress")]
    NoSession,
    #[error("quiz already submitted")]
    Submitted,
    #[error(transparent)]
    State(#[from] SessionStateError),
}

/// Errors emitted while fetching a question document over HTTP.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankFetchError {
    #[error("question bank request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Document(#[from] BankDocumentError),
}
