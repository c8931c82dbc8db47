//! Question banks loaded from a JSON document.
//!
//! The document is an object keyed by section (`programLogic`, `html`, `css`,
//! `js`, `sql`, `php`), each holding an array of
//! `{ "question": ..., "options": [...], "answer": <index> }` records.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use async_trait::async_trait;
use quiz_core::model::{Question, QuestionError, Section, SectionParseError};
use serde::Deserialize;
use thiserror::Error;

use crate::repository::{QuestionBank, StorageError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankDocumentError {
    #[error("cannot read question document: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed question document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    UnknownSection(#[from] SectionParseError),

    #[error("{section} question #{position}: {source}")]
    InvalidQuestion {
        section: Section,
        position: usize,
        #[source]
        source: QuestionError,
    },
}

#[derive(Debug, Deserialize)]
struct QuestionEntry {
    question: String,
    options: Vec<String>,
    #[serde(alias = "answerIndex")]
    answer: usize,
}

/// Fully parsed, validated question document held in memory.
#[derive(Debug, Clone, Default)]
pub struct JsonQuestionBank {
    pools: HashMap<Section, Vec<Question>>,
}

impl JsonQuestionBank {
    /// Parse and validate a question document.
    ///
    /// # Errors
    ///
    /// Returns `BankDocumentError` for malformed JSON, unknown section keys, or
    /// questions that fail validation.
    pub fn from_json(text: &str) -> Result<Self, BankDocumentError> {
        let raw: BTreeMap<String, Vec<QuestionEntry>> = serde_json::from_str(text)?;
        let mut pools: HashMap<Section, Vec<Question>> = HashMap::new();

        for (key, entries) in raw {
            let section: Section = key.parse()?;
            let pool = pools.entry(section).or_default();
            for (i, entry) in entries.into_iter().enumerate() {
                let question = Question::new(section, entry.question, entry.options, entry.answer)
                    .map_err(|source| BankDocumentError::InvalidQuestion {
                        section,
                        position: i + 1,
                        source,
                    })?;
                pool.push(question);
            }
        }

        Ok(Self { pools })
    }

    /// Read and parse a question document from disk.
    ///
    /// # Errors
    ///
    /// Returns `BankDocumentError::Io` if the file cannot be read, or any parse error.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BankDocumentError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    #[must_use]
    pub fn pool(&self, section: Section) -> &[Question] {
        self.pools.get(&section).map_or(&[], Vec::as_slice)
    }

    /// All questions in canonical section order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        Section::ALL.into_iter().flat_map(|s| self.pool(s).iter())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pools.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl QuestionBank for JsonQuestionBank {
    async fn section_pool(&self, section: Section) -> Result<Vec<Question>, StorageError> {
        Ok(self.pool(section).to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "html": [
            { "question": "Which tag makes a link?", "options": ["<a>", "<p>", "<div>"], "answer": 0 },
            { "question": "Which tag is a line break?", "options": ["<hr>", "<br>"], "answerIndex": 1 }
        ],
        "programLogic": [
            { "question": "A loop that never ends is?", "options": ["finite", "infinite"], "answer": 1 }
        ]
    }"#;

    #[test]
    fn parses_pools_per_section() {
        let bank = JsonQuestionBank::from_json(DOC).unwrap();
        assert_eq!(bank.len(), 3);
        assert_eq!(bank.pool(Section::Html).len(), 2);
        assert_eq!(bank.pool(Section::Html)[1].answer_index(), 1);
        assert!(bank.pool(Section::Php).is_empty());

        let order: Vec<_> = bank.questions().map(Question::section).collect();
        assert_eq!(order, vec![Section::ProgramLogic, Section::Html, Section::Html]);
    }

    #[test]
    fn unknown_section_is_rejected() {
        let err = JsonQuestionBank::from_json(r#"{ "cobol": [] }"#).unwrap_err();
        assert!(matches!(err, BankDocumentError::UnknownSection(_)));
    }

    #[test]
    fn invalid_question_reports_position() {
        let doc = r#"{ "sql": [ { "question": "Q", "options": ["a", "b"], "answer": 4 } ] }"#;
        let err = JsonQuestionBank::from_json(doc).unwrap_err();
        assert!(matches!(
            err,
            BankDocumentError::InvalidQuestion { section: Section::Sql, position: 1, .. }
        ));
    }

    #[tokio::test]
    async fn serves_pools_through_the_bank_trait() {
        let bank = JsonQuestionBank::from_json(DOC).unwrap();
        let pool = bank.section_pool(Section::ProgramLogic).await.unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].correct_answer(), "infinite");
    }
}
