use quiz_core::model::{Question, Section};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn parse_section(s: &str) -> Result<Section, StorageError> {
    s.parse::<Section>().map_err(ser)
}

/// Options are stored as a JSON array of strings.
pub(crate) fn options_to_text(options: &[String]) -> Result<String, StorageError> {
    serde_json::to_string(options).map_err(ser)
}

pub(crate) fn options_from_text(text: &str) -> Result<Vec<String>, StorageError> {
    serde_json::from_str(text).map_err(ser)
}

pub(crate) fn answer_index_to_i64(index: usize) -> Result<i64, StorageError> {
    i64::try_from(index).map_err(|_| StorageError::Serialization("answer_index overflow".into()))
}

pub(crate) fn map_question_row(row: &sqlx::sqlite::SqliteRow) -> Result<Question, StorageError> {
    let section = parse_section(row.try_get::<String, _>("section").map_err(ser)?.as_str())?;
    let text: String = row.try_get("question").map_err(ser)?;
    let options = options_from_text(row.try_get::<String, _>("options").map_err(ser)?.as_str())?;
    let answer_i64: i64 = row.try_get("answer_index").map_err(ser)?;
    let answer_index = usize::try_from(answer_i64)
        .map_err(|_| StorageError::Serialization(format!("invalid answer_index: {answer_i64}")))?;

    Question::new(section, text, options, answer_index).map_err(ser)
}
