use quiz_core::model::{Question, Section};

use super::SqliteRepository;
use super::mapping::{answer_index_to_i64, conn, map_question_row, options_to_text};
use crate::repository::{QuestionBank, StorageError};

#[async_trait::async_trait]
impl QuestionBank for SqliteRepository {
    async fn section_pool(&self, section: Section) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT section, question, options, answer_index
            FROM questions
            WHERE section = ?1
            ORDER BY id
            ",
        )
        .bind(section.key())
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_question_row).collect()
    }
}

impl SqliteRepository {
    /// Add a question to its section's pool. Returns the new row id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the options cannot be encoded or the insert fails.
    pub async fn insert_question(&self, question: &Question) -> Result<i64, StorageError> {
        let res = sqlx::query(
            r"
            INSERT INTO questions (section, question, options, answer_index)
            VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(question.section().key())
        .bind(question.text())
        .bind(options_to_text(question.options())?)
        .bind(answer_index_to_i64(question.answer_index())?)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(res.last_insert_rowid())
    }

    /// Remove every question in `section`. Returns how many rows were deleted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the delete fails.
    pub async fn clear_section(&self, section: Section) -> Result<u64, StorageError> {
        let res = sqlx::query("DELETE FROM questions WHERE section = ?1")
            .bind(section.key())
            .execute(&self.pool)
            .await
            .map_err(conn)?;
        Ok(res.rows_affected())
    }
}
