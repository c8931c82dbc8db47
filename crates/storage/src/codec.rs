//! JSON encoding of the persisted session blob.
//!
//! The blob is self-describing (`questions`, `answers`, `currentIndex`,
//! `timeRemaining`, `startTime`) so a restart rebuilds the exact draw.

use quiz_core::model::SessionState;

use crate::repository::StorageError;

/// # Errors
///
/// Returns `StorageError::Serialization` if the state cannot be encoded.
pub fn encode_state(state: &SessionState) -> Result<String, StorageError> {
    serde_json::to_string(state).map_err(|e| StorageError::Serialization(e.to_string()))
}

/// Decoding re-checks every state invariant, so a tampered or truncated blob is an error.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if the payload is not a valid state.
pub fn decode_state(payload: &str) -> Result<SessionState, StorageError> {
    serde_json::from_str(payload).map_err(|e| StorageError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Direction, Question, Section};
    use quiz_core::time::fixed_now;

    fn sample() -> SessionState {
        let questions = Section::ALL
            .into_iter()
            .map(|s| Question::new(s, format!("{s}?"), vec!["x".into(), "y".into()], 1).unwrap())
            .collect();
        SessionState::new(questions, 3000, fixed_now()).unwrap()
    }

    #[test]
    fn encoded_state_uses_camel_case_fields() {
        let mut state = sample();
        state.select_option(1).unwrap();
        state.navigate(Direction::Next);
        let json = encode_state(&state).unwrap();
        for field in ["questions", "answers", "currentIndex", "timeRemaining", "startTime"] {
            assert!(json.contains(field), "missing {field}");
        }
        assert!(json.contains("[1,null,null,null,null,null]"));
        assert_eq!(decode_state(&json).unwrap(), state);
    }

    #[test]
    fn garbage_payload_is_a_serialization_error() {
        assert!(matches!(
            decode_state("{\"questions\":"),
            Err(StorageError::Serialization(_))
        ));
    }
}
