//! Result computation for a finished attempt.

use crate::model::{Question, Section};

/// Shown in place of the user's answer when a question was skipped.
pub const NOT_ANSWERED: &str = "Not answered";

/// Correct/total counts for one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionTally {
    pub section: Section,
    pub correct: usize,
    pub total: usize,
}

/// A question the user got wrong or skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrongAnswer {
    /// 1-based position in the attempt.
    pub number: usize,
    pub question: String,
    pub section: Section,
    pub user_answer: String,
    pub correct_answer: String,
}

impl WrongAnswer {
    #[must_use]
    pub fn section_name(&self) -> &'static str {
        self.section.display_name()
    }

    #[must_use]
    pub fn was_skipped(&self) -> bool {
        self.user_answer == NOT_ANSWERED
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreReport {
    pub total_correct: usize,
    pub total_questions: usize,
    /// Rounded to one decimal place.
    pub percentage: f64,
    /// Always all six sections, in canonical order.
    pub sections: Vec<SectionTally>,
    /// In question order.
    pub wrong_answers: Vec<WrongAnswer>,
}

/// Score `answers` against `questions`. Pure; the slices are index-aligned and a
/// missing answer is never correct.
#[must_use]
pub fn score(questions: &[Question], answers: &[Option<usize>]) -> ScoreReport {
    let mut sections: Vec<SectionTally> = Section::ALL
        .into_iter()
        .map(|section| SectionTally {
            section,
            correct: 0,
            total: 0,
        })
        .collect();
    let mut wrong_answers = Vec::new();
    let mut total_correct = 0_usize;

    for (i, question) in questions.iter().enumerate() {
        let chosen = answers.get(i).copied().flatten();
        let correct = question.is_correct(chosen);

        if let Some(tally) = sections.iter_mut().find(|t| t.section == question.section()) {
            tally.total += 1;
            if correct {
                tally.correct += 1;
            }
        }

        if correct {
            total_correct += 1;
        } else {
            let user_answer = chosen
                .and_then(|idx| question.option(idx))
                .unwrap_or(NOT_ANSWERED)
                .to_owned();
            wrong_answers.push(WrongAnswer {
                number: i + 1,
                question: question.text().to_owned(),
                section: question.section(),
                user_answer,
                correct_answer: question.correct_answer().to_owned(),
            });
        }
    }

    ScoreReport {
        total_correct,
        total_questions: questions.len(),
        percentage: percentage(total_correct, questions.len()),
        sections,
        wrong_answers,
    }
}

#[allow(clippy::cast_precision_loss)]
fn percentage(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = correct as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}
