use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown section: {0}")]
pub struct SectionParseError(pub String);

/// Topic category a question belongs to.
///
/// Variant order is the canonical order used for drawing and for result tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    ProgramLogic,
    Html,
    Css,
    Js,
    Sql,
    Php,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::ProgramLogic,
        Section::Html,
        Section::Css,
        Section::Js,
        Section::Sql,
        Section::Php,
    ];

    /// Human-readable name shown in results.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Section::ProgramLogic => "Program Logic",
            Section::Html => "HTML",
            Section::Css => "CSS",
            Section::Js => "JavaScript",
            Section::Sql => "SQL",
            Section::Php => "PHP",
        }
    }

    /// Stable key used in question documents and storage rows.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Section::ProgramLogic => "programLogic",
            Section::Html => "html",
            Section::Css => "css",
            Section::Js => "js",
            Section::Sql => "sql",
            Section::Php => "php",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Section {
    type Err = SectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SectionParseError(s.to_owned()))
    }
}
