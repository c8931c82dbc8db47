use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("questions per section must be > 0")]
    InvalidQuestionsPerSection,

    #[error("quiz duration must be > 0 seconds")]
    InvalidDuration,

    #[error("tick period must be > 0 ms")]
    InvalidTickPeriod,

    #[error("state key cannot be empty")]
    EmptyStateKey,
}

/// Tunables for a quiz attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSettings {
    questions_per_section: usize,
    duration_secs: u32,
    warning_thresholds: Vec<u32>,
    tick_millis: u64,
    state_key: String,
}

impl Default for QuizSettings {
    /// 10 questions per section, 50 minutes, warnings at 5 and 1 minute left,
    /// one tick per second, saved under `quizState`.
    fn default() -> Self {
        Self {
            questions_per_section: 10,
            duration_secs: 3000,
            warning_thresholds: vec![300, 60],
            tick_millis: 1000,
            state_key: "quizState".into(),
        }
    }
}

impl QuizSettings {
    /// # Errors
    ///
    /// Returns `SettingsError` if a count or period is zero or the key is blank.
    pub fn new(
        questions_per_section: usize,
        duration_secs: u32,
        warning_thresholds: Vec<u32>,
        tick_millis: u64,
        state_key: impl Into<String>,
    ) -> Result<Self, SettingsError> {
        let state_key = state_key.into();
        if questions_per_section == 0 {
            return Err(SettingsError::InvalidQuestionsPerSection);
        }
        if duration_secs == 0 {
            return Err(SettingsError::InvalidDuration);
        }
        if tick_millis == 0 {
            return Err(SettingsError::InvalidTickPeriod);
        }
        if state_key.trim().is_empty() {
            return Err(SettingsError::EmptyStateKey);
        }
        Ok(Self {
            questions_per_section,
            duration_secs,
            warning_thresholds,
            tick_millis,
            state_key,
        })
    }

    /// Same settings with a different duration.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidDuration` for zero.
    pub fn with_duration_secs(self, duration_secs: u32) -> Result<Self, SettingsError> {
        Self::new(
            self.questions_per_section,
            duration_secs,
            self.warning_thresholds,
            self.tick_millis,
            self.state_key,
        )
    }

    #[must_use]
    pub fn questions_per_section(&self) -> usize {
        self.questions_per_section
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    #[must_use]
    pub fn warning_thresholds(&self) -> &[u32] {
        &self.warning_thresholds
    }

    #[must_use]
    pub fn tick_millis(&self) -> u64 {
        self.tick_millis
    }

    #[must_use]
    pub fn state_key(&self) -> &str {
        &self.state_key
    }

    /// Whether `remaining` hits one of the warning thresholds exactly.
    #[must_use]
    pub fn is_warning_threshold(&self, remaining: u32) -> bool {
        self.warning_thresholds.contains(&remaining)
    }

    /// Whether the timer should be shown in its warning style.
    #[must_use]
    pub fn in_warning_window(&self, remaining: u32) -> bool {
        self.warning_thresholds
            .iter()
            .max()
            .is_some_and(|window| remaining <= *window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_fifty_minute_quiz() {
        let s = QuizSettings::default();
        assert_eq!(s.questions_per_section(), 10);
        assert_eq!(s.duration_secs(), 3000);
        assert!(s.is_warning_threshold(300));
        assert!(s.is_warning_threshold(60));
        assert!(!s.is_warning_threshold(299));
        assert!(s.in_warning_window(299));
        assert!(!s.in_warning_window(301));
    }

    #[test]
    fn zero_values_are_rejected() {
        assert_eq!(
            QuizSettings::new(0, 10, vec![], 1000, "k").unwrap_err(),
            SettingsError::InvalidQuestionsPerSection
        );
        assert_eq!(
            QuizSettings::default().with_duration_secs(0).unwrap_err(),
            SettingsError::InvalidDuration
        );
        assert_eq!(
            QuizSettings::new(1, 10, vec![], 1000, " ").unwrap_err(),
            SettingsError::EmptyStateKey
        );
    }
}
