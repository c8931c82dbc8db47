mod question;
mod section;
mod session;
mod settings;

pub use question::{Question, QuestionError};
pub use section::{Section, SectionParseError};
pub use session::{Direction, SessionState, SessionStateError};
pub use settings::{QuizSettings, SettingsError};
