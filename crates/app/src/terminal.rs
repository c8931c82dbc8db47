use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, mpsc};

use quiz_core::ScoreReport;
use services::{Presentation, QuestionView, QuizEvent, Screen, format_remaining};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::commands::{self, Command};

/// Routes stdin lines either to a pending yes/no question or to the event queue.
///
/// Once input is closed the reply sender is gone, so every question (open or
/// asked later) is declined.
pub struct Prompter {
    waiting: AtomicBool,
    reply_tx: Mutex<Option<mpsc::Sender<bool>>>,
    reply_rx: Mutex<mpsc::Receiver<bool>>,
}

impl Prompter {
    #[must_use]
    pub fn new() -> Self {
        let (reply_tx, reply_rx) = mpsc::channel();
        Self {
            waiting: AtomicBool::new(false),
            reply_tx: Mutex::new(Some(reply_tx)),
            reply_rx: Mutex::new(reply_rx),
        }
    }

    fn reply(&self, yes: bool) {
        self.waiting.store(false, Ordering::SeqCst);
        if let Ok(guard) = self.reply_tx.lock() {
            if let Some(tx) = guard.as_ref() {
                let _ = tx.send(yes);
            }
        }
    }

    /// Block the calling worker thread until the reader thread delivers an answer.
    fn ask(&self) -> bool {
        let Ok(rx) = self.reply_rx.lock() else {
            return false;
        };
        while rx.try_recv().is_ok() {}
        self.waiting.store(true, Ordering::SeqCst);
        let answer = tokio::task::block_in_place(|| rx.recv().unwrap_or(false));
        self.waiting.store(false, Ordering::SeqCst);
        answer
    }

    /// Feed one line of input. Returns the event to queue, if any.
    pub fn route(&self, line: &str) -> Option<QuizEvent> {
        if self.waiting.load(Ordering::SeqCst) {
            self.reply(commands::is_yes(line));
            return None;
        }
        match commands::parse(line) {
            Ok(Command::Event(event)) => Some(event),
            Ok(Command::Help) => {
                println!("{}", commands::HELP);
                None
            }
            Ok(Command::Empty) => None,
            Err(err) => {
                println!("{err}");
                None
            }
        }
    }

    /// End of input: drop the reply sender so `ask` stops waiting.
    fn close(&self) {
        self.waiting.store(false, Ordering::SeqCst);
        if let Ok(mut guard) = self.reply_tx.lock() {
            guard.take();
        }
    }
}

impl Default for Prompter {
    fn default() -> Self {
        Self::new()
    }
}

/// Read stdin on a plain thread and forward commands as events.
pub fn spawn_input_reader(prompter: Arc<Prompter>, events: UnboundedSender<QuizEvent>) {
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    warn!(error = %err, "stdin read failed");
                    break;
                }
            };
            if let Some(event) = prompter.route(&line) {
                debug!(?event, "input");
                let quit = event == QuizEvent::Quit;
                if events.send(event).is_err() || quit {
                    return;
                }
            }
        }
        prompter.close();
        let _ = events.send(QuizEvent::Quit);
    });
}

/// Plain-text rendering on stdout.
pub struct TerminalPresentation {
    prompter: Arc<Prompter>,
    last_timer: AtomicU32,
}

impl TerminalPresentation {
    #[must_use]
    pub fn new(prompter: Arc<Prompter>) -> Self {
        Self {
            prompter,
            last_timer: AtomicU32::new(u32::MAX),
        }
    }

    /// Printing every second would bury the question, so the timer is shown on
    /// minute marks, every ten seconds while in the warning window, and whenever
    /// it jumps (resume).
    fn should_print_timer(&self, seconds: u32, is_warning: bool) -> bool {
        let previous = self.last_timer.swap(seconds, Ordering::Relaxed);
        previous != seconds.saturating_add(1)
            || seconds % 60 == 0
            || (is_warning && seconds % 10 == 0)
    }
}

fn flush() {
    let _ = std::io::stdout().flush();
}

impl Presentation for TerminalPresentation {
    fn show_screen(&self, screen: Screen) {
        match screen {
            Screen::Start => {
                println!();
                println!("=== Web Development Quiz ===");
                println!("Type `new` to begin, `resume` to continue a saved quiz, `help` for commands.");
            }
            Screen::Quiz => {
                self.last_timer.store(u32::MAX, Ordering::Relaxed);
                println!();
                println!("--- Quiz in progress ---");
            }
            Screen::Results => {
                println!();
                println!("=== Results ===");
            }
        }
        flush();
    }

    fn render_question(&self, view: &QuestionView<'_>) {
        let question = view.question;
        println!();
        println!("{}  [{}]", view.progress, question.section().display_name());
        println!("{}", question.text());
        for (i, option) in question.options().iter().enumerate() {
            let marker = if view.selected == Some(i) { '*' } else { ' ' };
            println!(" {marker} {}. {option}", i + 1);
        }
        let mut controls = Vec::new();
        if view.nav.prev_enabled {
            controls.push("prev");
        }
        if view.nav.show_next {
            controls.push("next");
        }
        if view.nav.show_submit {
            controls.push("submit");
        }
        println!("({})", controls.join(" | "));
        flush();
    }

    fn render_navigator(&self, answered: &[bool], current: usize) {
        let cells: Vec<String> = answered
            .iter()
            .enumerate()
            .map(|(i, done)| {
                let mark = if *done { "x" } else { "." };
                if i == current {
                    format!("[{mark}]")
                } else {
                    mark.to_owned()
                }
            })
            .collect();
        println!("{}", cells.join(""));
        flush();
    }

    fn render_timer(&self, seconds_remaining: u32, is_warning: bool) {
        if !self.should_print_timer(seconds_remaining, is_warning) {
            return;
        }
        let flag = if is_warning { " !" } else { "" };
        println!("Time remaining: {}{flag}", format_remaining(seconds_remaining));
        flush();
    }

    fn notify(&self, message: &str) {
        println!(">> {message}");
        flush();
    }

    fn confirm(&self, message: &str) -> bool {
        print!("{message} [y/N] ");
        flush();
        self.prompter.ask()
    }

    fn render_results(&self, report: &ScoreReport) {
        println!(
            "Score: {}/{} ({:.1}%)",
            report.total_correct, report.total_questions, report.percentage
        );
        for tally in &report.sections {
            println!(
                "  {:<14} {}/{}",
                tally.section.display_name(),
                tally.correct,
                tally.total
            );
        }
        if report.wrong_answers.is_empty() {
            println!("Every answer was correct.");
        } else {
            println!();
            println!("Review:");
            for wrong in &report.wrong_answers {
                println!("{}. [{}] {}", wrong.number, wrong.section_name(), wrong.question);
                println!("   Your answer:    {}", wrong.user_answer);
                println!("   Correct answer: {}", wrong.correct_answer);
            }
        }
        println!();
        println!("Type `new` for another attempt or `quit` to exit.");
        flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_commands_when_no_question_is_open() {
        let prompter = Prompter::new();
        assert_eq!(prompter.route("next"), Some(QuizEvent::Navigate(quiz_core::model::Direction::Next)));
        assert_eq!(prompter.route(""), None);
        assert_eq!(prompter.route("nonsense"), None);
    }

    #[test]
    fn open_question_captures_the_next_line() {
        let prompter = Prompter::new();
        prompter.waiting.store(true, Ordering::SeqCst);
        assert_eq!(prompter.route("yes"), None);
        assert!(!prompter.waiting.load(Ordering::SeqCst));
        let reply = prompter.reply_rx.lock().unwrap().try_recv().unwrap();
        assert!(reply);

        prompter.waiting.store(true, Ordering::SeqCst);
        assert_eq!(prompter.route("n"), None);
        assert!(!prompter.reply_rx.lock().unwrap().try_recv().unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn questions_after_input_closes_are_declined() {
        let prompter = Arc::new(Prompter::new());
        prompter.close();

        let asking = Arc::clone(&prompter);
        let answer = tokio::time::timeout(
            std::time::Duration::from_secs(3),
            tokio::spawn(async move { asking.ask() }),
        )
        .await
        .expect("confirm returned after input closed")
        .unwrap();
        assert!(!answer);
        assert!(prompter.route("yes").is_none());
    }

    #[test]
    fn timer_prints_on_marks_and_jumps() {
        let presentation = TerminalPresentation::new(Arc::new(Prompter::new()));
        assert!(presentation.should_print_timer(3000, false));
        assert!(!presentation.should_print_timer(2999, false));
        presentation.last_timer.store(61, Ordering::Relaxed);
        assert!(presentation.should_print_timer(60, false));
        assert!(!presentation.should_print_timer(59, true));
        presentation.last_timer.store(51, Ordering::Relaxed);
        assert!(presentation.should_print_timer(50, true));
    }
}
