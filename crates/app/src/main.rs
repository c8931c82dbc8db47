use std::sync::Arc;

use quiz_core::model::QuizSettings;
use services::{Clock, Presentation, QuizService, Screen, fetch_question_bank};
use storage::JsonQuestionBank;
use storage::repository::{QuestionBank, Storage};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod terminal;

use config::{Args, BankSource, prepare_sqlite_file, print_usage};
use terminal::{Prompter, TerminalPresentation, spawn_input_reader};

/// Logs go to stderr so they never interleave with the quiz on stdout.
fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn load_bank(
    source: &BankSource,
    storage: Storage,
) -> Result<Storage, Box<dyn std::error::Error>> {
    let bank: Arc<dyn QuestionBank> = match source {
        BankSource::Database => return Ok(storage),
        BankSource::File(path) => {
            let bank = JsonQuestionBank::from_path(path)?;
            info!(path = %path.display(), questions = bank.len(), "question bank loaded");
            Arc::new(bank)
        }
        BankSource::Http(url) => {
            let client = reqwest::Client::new();
            Arc::new(fetch_question_bank(&client, url.clone()).await?)
        }
    };
    Ok(storage.with_bank(bank))
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    init_tracing(&args.log_filter);

    // Open + migrate SQLite at startup; the saved attempt always lives there.
    prepare_sqlite_file(&args.db_url)?;
    let storage = Storage::sqlite(&args.db_url).await?;
    let storage = load_bank(&args.bank, storage).await?;

    let settings = match args.duration_secs {
        Some(secs) => QuizSettings::default().with_duration_secs(secs)?,
        None => QuizSettings::default(),
    };

    let (events_tx, events_rx) = tokio::sync::mpsc::unbounded_channel();
    let prompter = Arc::new(Prompter::new());
    let presentation = Arc::new(TerminalPresentation::new(Arc::clone(&prompter)));

    let mut service = QuizService::new(
        Clock::system(),
        settings,
        storage.bank,
        storage.states,
        Arc::clone(&presentation) as Arc<dyn Presentation>,
    )
    .with_ticks(events_tx.clone());

    presentation.show_screen(Screen::Start);
    if service.has_saved_session().await {
        presentation.notify("A saved quiz was found. Type `resume` to continue it.");
    }

    info!(db = %args.db_url, "quiz ready");
    spawn_input_reader(prompter, events_tx);

    // The loop runs on a worker so `confirm` can block in place.
    tokio::spawn(async move { service.run(events_rx).await }).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
