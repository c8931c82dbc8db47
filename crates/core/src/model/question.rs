use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Section;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("question needs at least two options, got {0}")]
    TooFewOptions(usize),

    #[error("answer index {index} is out of range for {options} options")]
    AnswerOutOfRange { index: usize, options: usize },
}

/// A multiple-choice question drawn from a section pool.
///
/// Immutable once built; `answer_index` always addresses one of `options`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord", into = "QuestionRecord")]
pub struct Question {
    section: Section,
    text: String,
    options: Vec<String>,
    answer_index: usize,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is blank, fewer than two options are
    /// given, or `answer_index` does not address an option.
    pub fn new(
        section: Section,
        text: impl Into<String>,
        options: Vec<String>,
        answer_index: usize,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions(options.len()));
        }
        if answer_index >= options.len() {
            return Err(QuestionError::AnswerOutOfRange {
                index: answer_index,
                options: options.len(),
            });
        }
        Ok(Self {
            section,
            text,
            options,
            answer_index,
        })
    }

    #[must_use]
    pub fn section(&self) -> Section {
        self.section
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn answer_index(&self) -> usize {
        self.answer_index
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.options[self.answer_index]
    }

    #[must_use]
    pub fn is_correct(&self, chosen: Option<usize>) -> bool {
        chosen == Some(self.answer_index)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionRecord {
    question: String,
    options: Vec<String>,
    answer_index: usize,
    section: Section,
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuestionError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        Question::new(
            record.section,
            record.question,
            record.options,
            record.answer_index,
        )
    }
}

impl From<Question> for QuestionRecord {
    fn from(question: Question) -> Self {
        Self {
            question: question.text,
            options: question.options,
            answer_index: question.answer_index,
            section: question.section,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("opt {i}")).collect()
    }

    #[test]
    fn rejects_answer_outside_options() {
        let err = Question::new(Section::Css, "Which selector?", options(3), 3).unwrap_err();
        assert_eq!(err, QuestionError::AnswerOutOfRange { index: 3, options: 3 });
    }

    #[test]
    fn rejects_blank_text_and_single_option() {
        assert_eq!(
            Question::new(Section::Css, "  ", options(3), 0).unwrap_err(),
            QuestionError::EmptyText
        );
        assert_eq!(
            Question::new(Section::Css, "Q", options(1), 0).unwrap_err(),
            QuestionError::TooFewOptions(1)
        );
    }

    #[test]
    fn deserializing_revalidates() {
        let json = r#"{"question":"Q","options":["a","b"],"answerIndex":5,"section":"sql"}"#;
        assert!(serde_json::from_str::<Question>(json).is_err());

        let json = r#"{"question":"Q","options":["a","b"],"answerIndex":1,"section":"sql"}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.section(), Section::Sql);
        assert_eq!(q.correct_answer(), "b");
        assert!(q.is_correct(Some(1)));
        assert!(!q.is_correct(None));
    }
}
