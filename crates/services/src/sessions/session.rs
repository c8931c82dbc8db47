use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use quiz_core::{Clock, ScoreReport};
use quiz_core::model::{Direction, QuizSettings, SessionState};
use storage::repository::SessionStore;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use super::countdown::Countdown;
use super::events::QuizEvent;
use super::presentation::{NavState, Presentation, QuestionView, Screen};
use crate::error::QuizError;

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Countdown running (when a tick channel is attached).
    Active,
    /// Tick source paused while the front end is not visible.
    Hidden,
    /// Results computed and the saved state removed.
    Submitted,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Stale generation, hidden, or already submitted.
    Ignored,
    Running(u32),
    /// Time ran out and the quiz was submitted.
    Expired(ScoreReport),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The user chose to keep going.
    Declined { unanswered: usize },
    Submitted(ScoreReport),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One quiz attempt from start to submission.
///
/// Owns the `SessionState`, drives the presentation, and saves after every change.
/// Saving is best-effort: a failed write is logged and never fails the command.
pub struct QuizSession {
    state: SessionState,
    settings: QuizSettings,
    store: Arc<dyn SessionStore>,
    presentation: Arc<dyn Presentation>,
    clock: Clock,
    generation: u64,
    ticks: Option<UnboundedSender<QuizEvent>>,
    countdown: Option<Countdown>,
    phase: SessionPhase,
}

impl QuizSession {
    /// Wrap `state`. Nothing is rendered and no countdown runs until `open`.
    ///
    /// `generation` tags the ticks this session accepts.
    #[must_use]
    pub fn new(
        state: SessionState,
        settings: QuizSettings,
        store: Arc<dyn SessionStore>,
        presentation: Arc<dyn Presentation>,
        generation: u64,
    ) -> Self {
        Self {
            state,
            settings,
            store,
            presentation,
            clock: Clock::system(),
            generation,
            ticks: None,
            countdown: None,
            phase: SessionPhase::Active,
        }
    }

    /// Attach the channel the countdown sends ticks into. Without one, ticks must
    /// be fed through `tick` by the caller.
    #[must_use]
    pub fn with_ticks(mut self, ticks: UnboundedSender<QuizEvent>) -> Self {
        self.ticks = Some(ticks);
        self
    }

    /// Clock used for elapsed-time reporting.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.phase == SessionPhase::Submitted
    }

    /// Wall-clock seconds since the attempt was started, including time spent hidden
    /// or closed.
    #[must_use]
    pub fn elapsed_secs(&self) -> i64 {
        self.clock.seconds_since(self.state.start_time())
    }

    #[must_use]
    pub fn countdown_running(&self) -> bool {
        self.countdown.as_ref().is_some_and(Countdown::is_running)
    }

    /// Show the quiz screen, draw the current question, and start the countdown.
    pub fn open(&mut self) {
        self.presentation.show_screen(Screen::Quiz);
        self.render();
        self.start_countdown();
    }

    /// Redraw question, navigator, and timer.
    pub fn render(&self) {
        self.render_question();
        self.render_navigator();
        self.render_timer();
    }

    /// Choose an option for the current question, replacing any earlier choice.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Submitted` after submission and `QuizError::State` if
    /// `option` is not one of the current question's options.
    pub async fn select_option(&mut self, option: usize) -> Result<(), QuizError> {
        self.ensure_open()?;
        self.state.select_option(option)?;
        self.persist().await;
        self.render_navigator();
        Ok(())
    }

    /// Step one question. Returns `false`, doing nothing, at either end.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Submitted` after submission.
    pub async fn navigate(&mut self, direction: Direction) -> Result<bool, QuizError> {
        self.ensure_open()?;
        if !self.state.navigate(direction) {
            return Ok(false);
        }
        self.after_move().await;
        Ok(true)
    }

    /// Go straight to `index` (0-based).
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Submitted` after submission and `QuizError::State` if
    /// `index` is not a question.
    pub async fn jump_to(&mut self, index: usize) -> Result<(), QuizError> {
        self.ensure_open()?;
        self.state.jump_to(index)?;
        self.after_move().await;
        Ok(())
    }

    /// Apply one countdown tick.
    ///
    /// Ticks from another generation, or arriving while hidden or after submission,
    /// are ignored. Reaching zero submits without asking for confirmation.
    ///
    /// # Errors
    ///
    /// Currently infallible; the `Result` keeps the signature aligned with the other commands.
    pub async fn tick(&mut self, generation: u64) -> Result<TickOutcome, QuizError> {
        if generation != self.generation || self.phase != SessionPhase::Active {
            debug!(generation, current = self.generation, phase = ?self.phase, "tick ignored");
            return Ok(TickOutcome::Ignored);
        }

        let remaining = self.state.tick();
        self.render_timer();
        if self.settings.is_warning_threshold(remaining) {
            self.presentation.notify(&warning_message(remaining));
        }
        self.persist().await;

        if remaining == 0 {
            self.stop_countdown();
            self.presentation
                .notify("Time is up! Your answers have been submitted.");
            return Ok(TickOutcome::Expired(self.finish().await));
        }
        Ok(TickOutcome::Running(remaining))
    }

    /// Submit the attempt.
    ///
    /// Unless `forced`, unanswered questions trigger a confirmation; declining
    /// leaves the session untouched.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Submitted` if already submitted.
    pub async fn submit(&mut self, forced: bool) -> Result<SubmitOutcome, QuizError> {
        self.ensure_open()?;
        let unanswered = self.state.unanswered_count();
        if !forced && unanswered > 0 {
            let message = format!(
                "You have {unanswered} unanswered question{}. Submit anyway?",
                if unanswered == 1 { "" } else { "s" }
            );
            if !self.presentation.confirm(&message) {
                debug!(unanswered, "submission declined");
                return Ok(SubmitOutcome::Declined { unanswered });
            }
        }
        Ok(SubmitOutcome::Submitted(self.finish().await))
    }

    /// Pause the tick source and save, e.g. when the window is hidden.
    pub async fn hide(&mut self) {
        if self.phase != SessionPhase::Active {
            return;
        }
        self.stop_countdown();
        self.phase = SessionPhase::Hidden;
        self.persist().await;
        debug!(remaining = self.state.time_remaining(), "session hidden");
    }

    /// Resume ticking from the saved `time_remaining`. Time spent hidden is not deducted.
    pub fn show(&mut self) {
        if self.phase != SessionPhase::Hidden {
            return;
        }
        self.phase = SessionPhase::Active;
        self.render_timer();
        self.start_countdown();
    }

    /// Tear down without submitting: stop the countdown and save so the attempt can be resumed.
    pub async fn suspend(mut self) {
        self.stop_countdown();
        if self.phase != SessionPhase::Submitted {
            self.persist().await;
            info!(remaining = self.state.time_remaining(), "session suspended");
        }
    }

    async fn finish(&mut self) -> ScoreReport {
        self.stop_countdown();
        self.phase = SessionPhase::Submitted;

        let report = self.state.score();
        info!(
            correct = report.total_correct,
            total = report.total_questions,
            percentage = report.percentage,
            time_used = self.settings.duration_secs().saturating_sub(self.state.time_remaining()),
            elapsed = self.elapsed_secs(),
            "quiz submitted"
        );
        self.presentation.show_screen(Screen::Results);
        self.presentation.render_results(&report);

        if let Err(err) = self.store.clear_state(self.settings.state_key()).await {
            warn!(error = %err, "failed to clear saved quiz state");
        }
        report
    }

    async fn after_move(&mut self) {
        self.render_question();
        self.render_navigator();
        self.persist().await;
    }

    fn ensure_open(&self) -> Result<(), QuizError> {
        if self.phase == SessionPhase::Submitted {
            return Err(QuizError::Submitted);
        }
        Ok(())
    }

    fn start_countdown(&mut self) {
        if self.phase != SessionPhase::Active {
            return;
        }
        let Some(ticks) = self.ticks.clone() else {
            return;
        };
        self.stop_countdown();
        let period = Duration::from_millis(self.settings.tick_millis());
        self.countdown = Some(Countdown::start(ticks, self.generation, period));
    }

    fn stop_countdown(&mut self) {
        if let Some(mut countdown) = self.countdown.take() {
            countdown.cancel();
        }
    }

    pub(crate) async fn persist(&self) {
        if let Err(err) = self
            .store
            .save_state(self.settings.state_key(), &self.state)
            .await
        {
            warn!(error = %err, "failed to save quiz state");
        }
    }

    fn render_question(&self) {
        let index = self.state.current_index();
        self.presentation.render_question(&QuestionView {
            question: self.state.current_question(),
            index,
            selected: self.state.selected_option(),
            progress: self.state.progress_text(),
            nav: NavState::at(index, self.state.len()),
        });
    }

    fn render_navigator(&self) {
        self.presentation
            .render_navigator(&self.state.answered_flags(), self.state.current_index());
    }

    fn render_timer(&self) {
        let remaining = self.state.time_remaining();
        self.presentation
            .render_timer(remaining, self.settings.in_warning_window(remaining));
    }
}

fn warning_message(remaining: u32) -> String {
    match (remaining / 60, remaining % 60) {
        (1, 0) => "1 minute remaining!".to_owned(),
        (m, 0) if m > 1 => format!("{m} minutes remaining!"),
        _ => format!("{remaining} seconds remaining!"),
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions_len", &self.state.len())
            .field("current_index", &self.state.current_index())
            .field("time_remaining", &self.state.time_remaining())
            .field("generation", &self.generation)
            .field("phase", &self.phase)
            .field("countdown", &self.countdown.is_some())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
