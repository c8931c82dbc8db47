use std::sync::{Arc, Mutex};
use std::time::Duration;

use quiz_core::ScoreReport;
use quiz_core::model::{Direction, Question, QuizSettings, Section, SessionState};
use quiz_core::time::{fixed_clock, fixed_now};
use services::{
    Presentation, QuestionView, QuizEvent, QuizService, QuizSession, Screen, SubmitOutcome,
};
use storage::InMemoryRepository;
use storage::repository::SessionStore;

#[derive(Default)]
struct LogPresentation {
    log: Mutex<Vec<String>>,
    results: Mutex<Vec<ScoreReport>>,
}

impl LogPresentation {
    fn lines(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    fn results(&self) -> Vec<ScoreReport> {
        self.results.lock().unwrap().clone()
    }
}

impl Presentation for LogPresentation {
    fn show_screen(&self, screen: Screen) {
        self.log.lock().unwrap().push(format!("screen {screen:?}"));
    }

    fn render_question(&self, view: &QuestionView<'_>) {
        self.log.lock().unwrap().push(view.progress.clone());
    }

    fn render_navigator(&self, _answered: &[bool], _current: usize) {}

    fn render_timer(&self, _seconds_remaining: u32, _is_warning: bool) {}

    fn notify(&self, message: &str) {
        self.log.lock().unwrap().push(format!("notify {message}"));
    }

    fn confirm(&self, message: &str) -> bool {
        self.log.lock().unwrap().push(format!("confirm {message}"));
        true
    }

    fn render_results(&self, report: &ScoreReport) {
        self.results.lock().unwrap().push(report.clone());
    }
}

fn seeded_repo(per_section: usize) -> InMemoryRepository {
    let repo = InMemoryRepository::new();
    for section in Section::ALL {
        for i in 0..per_section {
            let q = Question::new(
                section,
                format!("{section} {i}"),
                vec!["w".into(), "x".into(), "y".into(), "z".into()],
                i % 4,
            )
            .unwrap();
            repo.insert_question(q).unwrap();
        }
    }
    repo
}

#[tokio::test]
async fn two_question_fixture_scores_one_correct() {
    let questions = vec![
        Question::new(Section::Html, "first", vec!["a".into(), "b".into(), "c".into()], 0)
            .unwrap(),
        Question::new(Section::Html, "second", vec!["a".into(), "b".into(), "c".into()], 1)
            .unwrap(),
    ];
    let state = SessionState::new(questions, 3000, fixed_now()).unwrap();
    let repo = InMemoryRepository::new();
    let presentation = Arc::new(LogPresentation::default());
    let mut session = QuizSession::new(
        state,
        QuizSettings::default(),
        Arc::new(repo.clone()),
        presentation.clone(),
        1,
    );

    session.select_option(0).await.unwrap();
    session.navigate(Direction::Next).await.unwrap();
    session.select_option(2).await.unwrap();

    let SubmitOutcome::Submitted(report) = session.submit(false).await.unwrap() else {
        panic!("fully answered quiz should submit");
    };
    assert_eq!(report.total_correct, 1);
    assert_eq!(report.wrong_answers.len(), 1);
    let wrong = &report.wrong_answers[0];
    assert_eq!(wrong.number, 2);
    assert_eq!(wrong.user_answer, "c");
    assert_eq!(wrong.correct_answer, "b");
    assert_eq!(wrong.section_name(), "HTML");

    assert!(repo.load_state("quizState").await.unwrap().is_none());
    assert_eq!(presentation.results(), vec![report]);
}

#[tokio::test(start_paused = true)]
async fn countdown_expiry_submits_through_the_event_loop() {
    let repo = seeded_repo(10);
    let presentation = Arc::new(LogPresentation::default());
    let settings = QuizSettings::default().with_duration_secs(3).unwrap();
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

    let mut svc = QuizService::new(
        fixed_clock(),
        settings,
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
        presentation.clone(),
    )
    .with_seed(9)
    .with_ticks(tx.clone());

    tx.send(QuizEvent::StartNew).unwrap();
    tx.send(QuizEvent::Select(1)).unwrap();
    let quitter = tx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(10)).await;
        let _ = quitter.send(QuizEvent::Quit);
    });

    svc.run(rx).await;

    let lines = presentation.lines();
    assert!(lines.iter().any(|l| l.starts_with("notify Time is up")));
    assert!(!lines.iter().any(|l| l.starts_with("confirm")));
    assert!(lines.contains(&"screen Results".to_owned()));

    let results = presentation.results();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].total_questions, 60);
    assert_eq!(results[0].wrong_answers.len() + results[0].total_correct, 60);
    assert!(repo.load_state("quizState").await.unwrap().is_none());
}

#[tokio::test(start_paused = true)]
async fn hidden_session_keeps_its_remaining_time() {
    let repo = seeded_repo(10);
    let presentation = Arc::new(LogPresentation::default());
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    let mut svc = QuizService::new(
        fixed_clock(),
        QuizSettings::default(),
        Arc::new(repo.clone()),
        Arc::new(repo.clone()),
        presentation,
    )
    .with_seed(3)
    .with_ticks(tx);

    svc.start_new().await.unwrap();
    tokio::time::sleep(Duration::from_millis(2500)).await;
    while let Ok(event) = rx.try_recv() {
        svc.handle(event).await.unwrap();
    }
    assert_eq!(svc.session().unwrap().state().time_remaining(), 2998);

    svc.handle(QuizEvent::Hidden).await.unwrap();
    tokio::time::sleep(Duration::from_secs(60)).await;
    while let Ok(event) = rx.try_recv() {
        svc.handle(event).await.unwrap();
    }
    let saved = repo.load_state("quizState").await.unwrap().unwrap();
    assert_eq!(saved.time_remaining(), 2998);

    svc.handle(QuizEvent::Visible).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    while let Ok(event) = rx.try_recv() {
        svc.handle(event).await.unwrap();
    }
    assert_eq!(svc.session().unwrap().state().time_remaining(), 2997);
}
