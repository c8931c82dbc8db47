use quiz_core::ScoreReport;
use quiz_core::model::Question;

/// Top-level screens the presentation can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Start,
    Quiz,
    Results,
}

/// Which navigation controls are live for the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavState {
    pub prev_enabled: bool,
    pub show_next: bool,
    pub show_submit: bool,
}

impl NavState {
    /// Previous is disabled on the first question; Submit replaces Next on the last.
    #[must_use]
    pub fn at(index: usize, len: usize) -> Self {
        let is_last = index + 1 >= len;
        Self {
            prev_enabled: index > 0,
            show_next: !is_last,
            show_submit: is_last,
        }
    }
}

/// Everything needed to draw one question.
#[derive(Debug, Clone)]
pub struct QuestionView<'a> {
    pub question: &'a Question,
    pub index: usize,
    pub selected: Option<usize>,
    pub progress: String,
    pub nav: NavState,
}

/// Rendering and user-dialog capability supplied by the front end.
///
/// The session calls these synchronously; `confirm` is expected to block until the
/// user answers.
pub trait Presentation: Send + Sync {
    fn show_screen(&self, screen: Screen);

    fn render_question(&self, view: &QuestionView<'_>);

    fn render_navigator(&self, answered: &[bool], current: usize);

    fn render_timer(&self, seconds_remaining: u32, is_warning: bool);

    fn notify(&self, message: &str);

    fn confirm(&self, message: &str) -> bool;

    fn render_results(&self, report: &ScoreReport);
}

/// `MM:SS` for a countdown value.
#[must_use]
pub fn format_remaining(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
