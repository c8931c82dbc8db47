use rand::Rng;
use rand::seq::SliceRandom;

use quiz_core::model::{Question, Section};
use storage::repository::QuestionBank;

use crate::error::QuizError;

/// Draw `per_section` questions from every section pool, without replacement.
///
/// Sections are visited in canonical order and concatenated, so the result is
/// section-major. Each section's sample is independent of the others.
///
/// # Errors
///
/// Returns `QuizError::Bank` if a pool cannot be read and
/// `QuizError::InsufficientQuestions` if a pool is smaller than `per_section`.
pub async fn draw_questions<R: Rng + ?Sized>(
    bank: &dyn QuestionBank,
    per_section: usize,
    rng: &mut R,
) -> Result<Vec<Question>, QuizError> {
    let mut drawn = Vec::with_capacity(per_section * Section::ALL.len());

    for section in Section::ALL {
        let mut pool = bank.section_pool(section).await.map_err(QuizError::Bank)?;
        if pool.len() < per_section {
            return Err(QuizError::InsufficientQuestions {
                section,
                available: pool.len(),
                required: per_section,
            });
        }
        pool.shuffle(rng);
        pool.truncate(per_section);
        drawn.extend(pool);
    }

    Ok(drawn)
}
