use async_trait::async_trait;
use quiz_core::model::{Question, Section, SessionState};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::codec::{decode_state, encode_state};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Key-value persistence for the in-progress session blob.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist `state` under `key`, replacing whatever was there.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the state cannot be encoded or written.
    async fn save_state(&self, key: &str, state: &SessionState) -> Result<(), StorageError>;

    /// Load the state saved under `key`, or `None` if nothing is saved.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` for a corrupt blob, or other storage errors.
    async fn load_state(&self, key: &str) -> Result<Option<SessionState>, StorageError>;

    /// Remove the state saved under `key`. Clearing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails.
    async fn clear_state(&self, key: &str) -> Result<(), StorageError>;
}

/// Read-only source of candidate questions, one pool per section.
#[async_trait]
pub trait QuestionBank: Send + Sync {
    /// Every question available for `section`, in storage order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the pool cannot be read.
    async fn section_pool(&self, section: Section) -> Result<Vec<Question>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// States are kept as their encoded JSON text so that loads go through the same
/// decoding path as the persistent backends.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    states: Arc<Mutex<HashMap<String, String>>>,
    pools: Arc<Mutex<HashMap<Section, Vec<Question>>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a question to its section's pool.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_question(&self, question: Question) -> Result<(), StorageError> {
        let mut guard = self
            .pools
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.entry(question.section()).or_default().push(question);
        Ok(())
    }

    /// Store a raw payload under `key`, bypassing encoding.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_raw_state(
        &self,
        key: impl Into<String>,
        payload: impl Into<String>,
    ) -> Result<(), StorageError> {
        let mut guard = self
            .states
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.into(), payload.into());
        Ok(())
    }

    /// The raw payload stored under `key`, if any.
    #[must_use]
    pub fn raw_state(&self, key: &str) -> Option<String> {
        self.states.lock().ok()?.get(key).cloned()
    }
}

#[async_trait]
impl SessionStore for InMemoryRepository {
    async fn save_state(&self, key: &str, state: &SessionState) -> Result<(), StorageError> {
        let payload = encode_state(state)?;
        self.insert_raw_state(key, payload)
    }

    async fn load_state(&self, key: &str) -> Result<Option<SessionState>, StorageError> {
        let payload = {
            let guard = self
                .states
                .lock()
                .map_err(|e| StorageError::Connection(e.to_string()))?;
            guard.get(key).cloned()
        };
        payload.as_deref().map(decode_state).transpose()
    }

    async fn clear_state(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .states
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

#[async_trait]
impl QuestionBank for InMemoryRepository {
    async fn section_pool(&self, section: Section) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .pools
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&section).cloned().unwrap_or_default())
    }
}

/// Aggregates the session store and question bank behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub states: Arc<dyn SessionStore>,
    pub bank: Arc<dyn QuestionBank>,
}

impl Storage {
    /// Same session store, different question source.
    #[must_use]
    pub fn with_bank(mut self, bank: Arc<dyn QuestionBank>) -> Self {
        self.bank = bank;
        self
    }
}
