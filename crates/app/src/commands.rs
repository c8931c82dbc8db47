use std::fmt;

use quiz_core::model::Direction;
use services::QuizEvent;

/// One line of user input, interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Event(QuizEvent),
    Help,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Unknown(String),
    MissingNumber(&'static str),
    BadNumber(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Unknown(input) => {
                write!(f, "Unknown command `{input}`. Type `help` for the list.")
            }
            CommandError::MissingNumber(command) => write!(f, "`{command}` needs a number."),
            CommandError::BadNumber(raw) => write!(f, "`{raw}` is not a number from 1 up."),
        }
    }
}

impl std::error::Error for CommandError {}

pub const HELP: &str = "\
Commands:
  new                start a new quiz
  resume             continue the saved quiz
  1..n | a..d        choose an option (also: select <n>)
  next | n           next question
  prev | p           previous question
  goto <n> | g <n>   jump to question n
  submit | s         submit your answers
  hide | show        pause and resume the timer
  quit | q           save and exit";

/// 1-based user number to a 0-based index.
fn one_based(raw: &str) -> Result<usize, CommandError> {
    match raw.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(CommandError::BadNumber(raw.to_owned())),
    }
}

fn option_letter(word: &str) -> Option<usize> {
    let mut chars = word.chars();
    match (chars.next(), chars.next()) {
        (Some(c @ 'a'..='d'), None) => Some(c as usize - 'a' as usize),
        _ => None,
    }
}

/// Parse a line typed at the prompt.
///
/// # Errors
///
/// Returns `CommandError` for unknown words or missing/invalid numbers.
pub fn parse(line: &str) -> Result<Command, CommandError> {
    let lowered = line.trim().to_ascii_lowercase();
    let mut words = lowered.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(Command::Empty);
    };
    let arg = words.next();

    let event = match head {
        "new" | "start" => QuizEvent::StartNew,
        "resume" | "continue" => QuizEvent::Resume,
        "next" | "n" => QuizEvent::Navigate(Direction::Next),
        "prev" | "previous" | "p" => QuizEvent::Navigate(Direction::Previous),
        "submit" | "s" => QuizEvent::Submit,
        "hide" => QuizEvent::Hidden,
        "show" => QuizEvent::Visible,
        "quit" | "exit" | "q" => QuizEvent::Quit,
        "help" | "?" | "h" => return Ok(Command::Help),
        "select" | "answer" => {
            let raw = arg.ok_or(CommandError::MissingNumber("select"))?;
            let index = option_letter(raw).map_or_else(|| one_based(raw), Ok)?;
            QuizEvent::Select(index)
        }
        "goto" | "g" => {
            let raw = arg.ok_or(CommandError::MissingNumber("goto"))?;
            QuizEvent::JumpTo(one_based(raw)?)
        }
        other => {
            if let Some(index) = option_letter(other) {
                QuizEvent::Select(index)
            } else if other.chars().all(|c| c.is_ascii_digit()) {
                QuizEvent::Select(one_based(other)?)
            } else {
                return Err(CommandError::Unknown(line.trim().to_owned()));
            }
        }
    };
    Ok(Command::Event(event))
}

/// `y`/`yes` count as agreement; anything else declines.
#[must_use]
pub fn is_yes(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(line: &str) -> QuizEvent {
        match parse(line).unwrap() {
            Command::Event(event) => event,
            other => panic!("expected an event for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn numbers_and_letters_select_options() {
        assert_eq!(event("1"), QuizEvent::Select(0));
        assert_eq!(event(" 4 "), QuizEvent::Select(3));
        assert_eq!(event("B"), QuizEvent::Select(1));
        assert_eq!(event("select 3"), QuizEvent::Select(2));
        assert_eq!(event("select c"), QuizEvent::Select(2));
        assert_eq!(parse("0"), Err(CommandError::BadNumber("0".into())));
    }

    #[test]
    fn navigation_words() {
        assert_eq!(event("next"), QuizEvent::Navigate(Direction::Next));
        assert_eq!(event("P"), QuizEvent::Navigate(Direction::Previous));
        assert_eq!(event("goto 12"), QuizEvent::JumpTo(11));
        assert_eq!(parse("goto"), Err(CommandError::MissingNumber("goto")));
        assert_eq!(parse("g x"), Err(CommandError::BadNumber("x".into())));
    }

    #[test]
    fn lifecycle_words() {
        assert_eq!(event("new"), QuizEvent::StartNew);
        assert_eq!(event("resume"), QuizEvent::Resume);
        assert_eq!(event("submit"), QuizEvent::Submit);
        assert_eq!(event("hide"), QuizEvent::Hidden);
        assert_eq!(event("show"), QuizEvent::Visible);
        assert_eq!(event("q"), QuizEvent::Quit);
    }

    #[test]
    fn blank_help_and_unknown() {
        assert_eq!(parse("   ").unwrap(), Command::Empty);
        assert_eq!(parse("help").unwrap(), Command::Help);
        assert!(matches!(parse("dance"), Err(CommandError::Unknown(_))));
    }

    #[test]
    fn confirmation_replies() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("n"));
        assert!(!is_yes(""));
    }
}
