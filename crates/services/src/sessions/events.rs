use quiz_core::model::Direction;

/// Everything that can happen to a quiz, processed one at a time by `QuizService`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizEvent {
    StartNew,
    Resume,
    /// Option index, 0-based.
    Select(usize),
    Navigate(Direction),
    /// Question index, 0-based.
    JumpTo(usize),
    Submit,
    /// Emitted by a `Countdown`; `generation` identifies the session that started it.
    Tick { generation: u64 },
    Hidden,
    Visible,
    Quit,
}

/// Whether the event loop should keep going after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}
