use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use quiz_core::ScoreReport;
use quiz_core::model::{Question, Section, SessionState};
use storage::InMemoryRepository;
use storage::repository::{SessionStore, StorageError};

use super::presentation::{NavState, Presentation, QuestionView, Screen};

/// `per_section` questions in every section. Question `i` answers option `i % 4`.
pub fn fixture_bank(per_section: usize) -> InMemoryRepository {
    let repo = InMemoryRepository::new();
    for section in Section::ALL {
        for i in 0..per_section {
            repo.insert_question(fixture_question(section, i)).unwrap();
        }
    }
    repo
}

pub fn fixture_question(section: Section, i: usize) -> Question {
    Question::new(
        section,
        format!("{} #{i}", section.key()),
        (0..4).map(|o| format!("{} #{i} option {o}", section.key())).collect(),
        i % 4,
    )
    .unwrap()
}

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Screen(Screen),
    Question {
        index: usize,
        selected: Option<usize>,
        progress: String,
        nav: NavState,
    },
    Navigator {
        answered: Vec<bool>,
        current: usize,
    },
    Timer {
        remaining: u32,
        warning: bool,
    },
    Notify(String),
    Confirm(String),
    Results(ScoreReport),
}

/// Records every presentation call; `confirm` answers with a fixed reply.
pub struct RecordingPresentation {
    calls: Mutex<Vec<Call>>,
    confirm_reply: AtomicBool,
}

impl RecordingPresentation {
    pub fn new(confirm_reply: bool) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            confirm_reply: AtomicBool::new(confirm_reply),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    pub fn notifications(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Notify(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    pub fn confirms(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Confirm(_)))
            .count()
    }

    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Presentation for RecordingPresentation {
    fn show_screen(&self, screen: Screen) {
        self.push(Call::Screen(screen));
    }

    fn render_question(&self, view: &QuestionView<'_>) {
        self.push(Call::Question {
            index: view.index,
            selected: view.selected,
            progress: view.progress.clone(),
            nav: view.nav,
        });
    }

    fn render_navigator(&self, answered: &[bool], current: usize) {
        self.push(Call::Navigator {
            answered: answered.to_vec(),
            current,
        });
    }

    fn render_timer(&self, seconds_remaining: u32, is_warning: bool) {
        self.push(Call::Timer {
            remaining: seconds_remaining,
            warning: is_warning,
        });
    }

    fn notify(&self, message: &str) {
        self.push(Call::Notify(message.to_owned()));
    }

    fn confirm(&self, message: &str) -> bool {
        self.push(Call::Confirm(message.to_owned()));
        self.confirm_reply.load(Ordering::SeqCst)
    }

    fn render_results(&self, report: &ScoreReport) {
        self.push(Call::Results(report.clone()));
    }
}

/// A store whose every write fails.
pub struct FailingStore;

#[async_trait]
impl SessionStore for FailingStore {
    async fn save_state(&self, _key: &str, _state: &SessionState) -> Result<(), StorageError> {
        Err(StorageError::Connection("disk full".into()))
    }

    async fn load_state(&self, _key: &str) -> Result<Option<SessionState>, StorageError> {
        Err(StorageError::Connection("disk full".into()))
    }

    async fn clear_state(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("disk full".into()))
    }
}
