use quiz_core::model::{Direction, Question, Section, SessionState};
use quiz_core::time::fixed_now;
use storage::repository::{QuestionBank, SessionStore, StorageError};
use storage::sqlite::SqliteRepository;

fn build_question(section: Section, i: usize) -> Question {
    Question::new(
        section,
        format!("{} question {i}", section.display_name()),
        vec!["first".into(), "second".into(), "third".into()],
        i % 3,
    )
    .unwrap()
}

async fn connect(name: &str) -> SqliteRepository {
    let repo = SqliteRepository::connect(&format!("sqlite:file:{name}?mode=memory&cache=shared"))
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");
    repo
}

#[tokio::test]
async fn sqlite_round_trips_session_state() {
    let repo = connect("memdb_state_roundtrip").await;

    let questions = (0..4).map(|i| build_question(Section::Css, i)).collect();
    let mut state = SessionState::new(questions, 3000, fixed_now()).unwrap();
    state.select_option(2).unwrap();
    state.navigate(Direction::Next);
    state.select_option(0).unwrap();
    state.tick();

    repo.save_state("quizState", &state).await.unwrap();
    let loaded = repo.load_state("quizState").await.unwrap().expect("saved");
    assert_eq!(loaded, state);
    assert_eq!(loaded.current_index(), 1);
    assert_eq!(loaded.time_remaining(), 2999);
    assert_eq!(loaded.start_time(), fixed_now());

    state.tick();
    repo.save_state("quizState", &state).await.unwrap();
    let loaded = repo.load_state("quizState").await.unwrap().expect("saved");
    assert_eq!(loaded.time_remaining(), 2998);
}

#[tokio::test]
async fn sqlite_clear_makes_state_absent() {
    let repo = connect("memdb_state_clear").await;
    let state = SessionState::new(vec![build_question(Section::Php, 0)], 60, fixed_now()).unwrap();

    repo.save_state("quizState", &state).await.unwrap();
    repo.clear_state("quizState").await.unwrap();
    assert!(repo.load_state("quizState").await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_corrupt_state_is_serialization_error() {
    let repo = connect("memdb_state_corrupt").await;
    repo.put_raw_state("quizState", "{\"questions\": []}")
        .await
        .unwrap();
    assert!(matches!(
        repo.load_state("quizState").await,
        Err(StorageError::Serialization(_))
    ));
}

#[tokio::test]
async fn sqlite_serves_section_pools_in_insert_order() {
    let repo = connect("memdb_pools").await;
    for i in 0..3 {
        repo.insert_question(&build_question(Section::Sql, i))
            .await
            .unwrap();
    }
    repo.insert_question(&build_question(Section::Js, 9))
        .await
        .unwrap();

    let sql = repo.section_pool(Section::Sql).await.unwrap();
    assert_eq!(sql.len(), 3);
    assert_eq!(sql[0], build_question(Section::Sql, 0));
    assert_eq!(sql[2].answer_index(), 2);
    assert_eq!(repo.section_pool(Section::Js).await.unwrap().len(), 1);
    assert!(repo.section_pool(Section::Html).await.unwrap().is_empty());

    assert_eq!(repo.clear_section(Section::Sql).await.unwrap(), 3);
    assert!(repo.section_pool(Section::Sql).await.unwrap().is_empty());
}
