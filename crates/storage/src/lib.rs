#![forbid(unsafe_code)]

pub mod codec;
pub mod json_bank;
pub mod repository;
pub mod sqlite;

pub use json_bank::{BankDocumentError, JsonQuestionBank};
pub use repository::{InMemoryRepository, QuestionBank, SessionStore, Storage, StorageError};
