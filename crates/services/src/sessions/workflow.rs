use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use quiz_core::Clock;
use quiz_core::model::{QuizSettings, SessionState};
use storage::repository::{QuestionBank, SessionStore};
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{info, warn};

use super::draw::draw_questions;
use super::events::{Flow, QuizEvent};
use super::presentation::Presentation;
use super::session::QuizSession;
use crate::error::QuizError;

/// Owns the current `QuizSession` and routes events to it, one at a time.
///
/// Starting or resuming replaces the current session; the replaced session's
/// countdown is cancelled when it is dropped, and its queued ticks no longer
/// match the new generation.
pub struct QuizService {
    clock: Clock,
    settings: QuizSettings,
    bank: Arc<dyn QuestionBank>,
    store: Arc<dyn SessionStore>,
    presentation: Arc<dyn Presentation>,
    ticks: Option<UnboundedSender<QuizEvent>>,
    rng: StdRng,
    generation: u64,
    current: Option<QuizSession>,
}

impl QuizService {
    #[must_use]
    pub fn new(
        clock: Clock,
        settings: QuizSettings,
        bank: Arc<dyn QuestionBank>,
        store: Arc<dyn SessionStore>,
        presentation: Arc<dyn Presentation>,
    ) -> Self {
        Self {
            clock,
            settings,
            bank,
            store,
            presentation,
            ticks: None,
            rng: StdRng::from_os_rng(),
            generation: 0,
            current: None,
        }
    }

    /// Sessions started from here run a countdown that feeds `ticks`.
    #[must_use]
    pub fn with_ticks(mut self, ticks: UnboundedSender<QuizEvent>) -> Self {
        self.ticks = Some(ticks);
        self
    }

    /// Deterministic question draws.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.current.as_ref()
    }

    /// Whether a valid saved attempt exists. A corrupt save counts as none.
    pub async fn has_saved_session(&self) -> bool {
        matches!(
            self.store.load_state(self.settings.state_key()).await,
            Ok(Some(_))
        )
    }

    /// Draw a fresh question set and open it, replacing (and cancelling) any
    /// current session once the draw has succeeded.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Bank` or `QuizError::InsufficientQuestions` when the
    /// questions cannot be drawn. No session is created and the current one, if
    /// any, keeps running.
    pub async fn start_new(&mut self) -> Result<&mut QuizSession, QuizError> {
        let questions = draw_questions(
            self.bank.as_ref(),
            self.settings.questions_per_section(),
            &mut self.rng,
        )
        .await?;

        let state = SessionState::new(questions, self.settings.duration_secs(), self.clock.now())?;
        self.current = None;
        let mut session = self.build_session(state);
        session.persist().await;
        session.open();
        info!(
            questions = session.state().len(),
            generation = session.generation(),
            "quiz started"
        );
        Ok(self.current.insert(session))
    }

    /// Reopen the saved attempt, if there is a valid one.
    ///
    /// A missing or unreadable save yields `None`; the current session (if any)
    /// is kept in that case.
    pub async fn resume(&mut self) -> Option<&mut QuizSession> {
        let state = match self.store.load_state(self.settings.state_key()).await {
            Ok(Some(state)) => state,
            Ok(None) => return None,
            Err(err) => {
                warn!(error = %err, "saved quiz state unreadable; treating as absent");
                return None;
            }
        };

        self.current = None;
        let mut session = self.build_session(state);
        session.open();
        info!(
            remaining = session.state().time_remaining(),
            current = session.state().current_index(),
            "quiz resumed"
        );
        Some(self.current.insert(session))
    }

    /// Apply one event.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoSession` for session commands with nothing open, and
    /// whatever the session command itself returns.
    pub async fn handle(&mut self, event: QuizEvent) -> Result<Flow, QuizError> {
        match event {
            QuizEvent::StartNew => {
                self.start_new().await?;
            }
            QuizEvent::Resume => {
                if self.resume().await.is_none() {
                    self.presentation.notify("There is no saved quiz to resume.");
                }
            }
            QuizEvent::Select(option) => {
                self.require_session()?.select_option(option).await?;
            }
            QuizEvent::Navigate(direction) => {
                self.require_session()?.navigate(direction).await?;
            }
            QuizEvent::JumpTo(index) => {
                self.require_session()?.jump_to(index).await?;
            }
            QuizEvent::Submit => {
                self.require_session()?.submit(false).await?;
            }
            QuizEvent::Tick { generation } => {
                if let Some(session) = self.current.as_mut() {
                    session.tick(generation).await?;
                }
            }
            QuizEvent::Hidden => {
                if let Some(session) = self.current.as_mut() {
                    session.hide().await;
                }
            }
            QuizEvent::Visible => {
                if let Some(session) = self.current.as_mut() {
                    session.show();
                }
            }
            QuizEvent::Quit => {
                self.shutdown().await;
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    /// Process events until `Quit` or until every sender is gone.
    ///
    /// Command errors are reported to the user and do not stop the loop.
    pub async fn run(&mut self, mut events: UnboundedReceiver<QuizEvent>) {
        while let Some(event) = events.recv().await {
            match self.handle(event).await {
                Ok(Flow::Exit) => return,
                Ok(Flow::Continue) => {}
                Err(err) => {
                    warn!(error = %err, ?event, "quiz command failed");
                    self.presentation.notify(&failure_message(&err));
                }
            }
        }
        self.shutdown().await;
    }

    /// Cancel the countdown and save the open attempt so it can be resumed.
    pub async fn shutdown(&mut self) {
        if let Some(session) = self.current.take() {
            session.suspend().await;
        }
    }

    fn require_session(&mut self) -> Result<&mut QuizSession, QuizError> {
        self.current.as_mut().ok_or(QuizError::NoSession)
    }

    fn build_session(&mut self, state: SessionState) -> QuizSession {
        self.generation += 1;
        let session = QuizSession::new(
            state,
            self.settings.clone(),
            Arc::clone(&self.store),
            Arc::clone(&self.presentation),
            self.generation,
        )
        .with_clock(self.clock);
        match self.ticks.clone() {
            Some(ticks) => session.with_ticks(ticks),
            None => session,
        }
    }
}

fn failure_message(err: &QuizError) -> String {
    match err {
        QuizError::Bank(_) | QuizError::InsufficientQuestions { .. } => {
            format!("Could not load questions: {err}")
        }
        _ => err.to_string(),
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
