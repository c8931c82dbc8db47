use std::fmt;
use std::path::{Path, PathBuf};

use reqwest::Url;

#[derive(Debug)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidDuration { raw: String },
    InvalidBankUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidDuration { raw } => write!(f, "invalid --duration value: {raw}"),
            ArgsError::InvalidBankUrl { raw } => write!(f, "invalid --bank url: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

/// Where the question pools come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankSource {
    /// The `questions` table of the SQLite database.
    Database,
    File(PathBuf),
    Http(Url),
}

impl BankSource {
    /// `http(s)://` values are URLs; anything else is a file path.
    pub fn parse(raw: &str) -> Result<Self, ArgsError> {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            let url = Url::parse(trimmed).map_err(|_| ArgsError::InvalidBankUrl {
                raw: raw.to_owned(),
            })?;
            return Ok(Self::Http(url));
        }
        Ok(Self::File(PathBuf::from(trimmed)))
    }
}

#[derive(Debug, Clone)]
pub struct Args {
    pub db_url: String,
    pub bank: BankSource,
    pub duration_secs: Option<u32>,
    pub log_filter: String,
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_duration(raw: String) -> Result<u32, ArgsError> {
    match raw.trim().parse::<u32>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ArgsError::InvalidDuration { raw }),
    }
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--db <sqlite_url>] [--bank <path|url>] [--duration <secs>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:quiz.sqlite3");
    eprintln!("  --bank (questions table in the database)");
    eprintln!("  --duration 3000");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_BANK, QUIZ_DURATION_SECS, QUIZ_LOG");
}

impl Args {
    pub fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .map_or_else(|| normalize_sqlite_url("quiz.sqlite3"), |raw| normalize_sqlite_url(&raw));
        let mut bank = match std::env::var("QUIZ_BANK") {
            Ok(raw) if !raw.trim().is_empty() => BankSource::parse(&raw)?,
            _ => BankSource::Database,
        };
        let mut duration_secs = match std::env::var("QUIZ_DURATION_SECS") {
            Ok(raw) => Some(parse_duration(raw)?),
            Err(_) => None,
        };
        let log_filter = std::env::var("QUIZ_LOG").unwrap_or_else(|_| "warn".into());

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(&value);
                }
                "--bank" => {
                    let value = require_value(args, "--bank")?;
                    bank = BankSource::parse(&value)?;
                }
                "--duration" => {
                    let value = require_value(args, "--duration")?;
                    duration_secs = Some(parse_duration(value)?);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            bank,
            duration_secs,
            log_filter,
        })
    }
}

/// Turn `--db` input (a bare path, `sqlite:path` or `sqlite://path`, optionally
/// with `?query`) into an absolute `sqlite://` URL. In-memory URLs pass through.
pub fn normalize_sqlite_url(raw: &str) -> String {
    let raw = raw.trim();
    if raw.contains(":memory:") {
        return raw.to_owned();
    }

    let rest = raw
        .strip_prefix("sqlite://")
        .or_else(|| raw.strip_prefix("sqlite:"))
        .unwrap_or(raw);
    let (path, query) = match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    };
    let path = Path::new(path);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    match query {
        Some(query) => format!("sqlite://{}?{query}", absolute.display()),
        None => format!("sqlite://{}", absolute.display()),
    }
}

/// File behind a `sqlite://` URL; `None` for in-memory or empty URLs.
fn sqlite_file_path(db_url: &str) -> Option<&Path> {
    let rest = db_url.strip_prefix("sqlite://")?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(Path::new(path))
}

/// SQLite will not create a missing file on a plain URL, so create it (and its
/// directory) up front. Existing files are left untouched.
pub fn prepare_sqlite_file(db_url: &str) -> std::io::Result<()> {
    let Some(path) = sqlite_file_path(db_url) else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    Ok(())
}
