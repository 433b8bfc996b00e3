//! Save/load for player progress
//!
//! Features:
//! - Storage interface injected into the progress store
//! - Flat JSON document under a fixed key
//! - Additive schema: unknown fields ignored, missing fields defaulted
//! - In-memory backend for native builds and tests

use crate::error::StorageError;
use crate::progress::PlayerProgress;

/// LocalStorage key for the progress record
pub const STORAGE_KEY: &str = "zenith_racer_progress";

/// Where player progress is kept between sessions
pub trait ProgressStorage {
    /// Load the saved record, `Ok(None)` if nothing was saved yet
    fn load(&self) -> Result<Option<PlayerProgress>, StorageError>;

    /// Replace the saved record
    fn save(&mut self, progress: &PlayerProgress) -> Result<(), StorageError>;

    /// Remove the saved record
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// Serialize progress to its stored JSON form
pub fn encode(progress: &PlayerProgress) -> Result<String, StorageError> {
    serde_json::to_string(progress).map_err(StorageError::Encode)
}

/// Parse stored JSON back into progress
pub fn decode(json: &str) -> Result<PlayerProgress, StorageError> {
    serde_json::from_str(json).map_err(StorageError::Decode)
}

/// Keeps the encoded record in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    json: Option<String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a raw stored document (possibly malformed)
    pub fn with_raw(json: impl Into<String>) -> Self {
        Self {
            json: Some(json.into()),
        }
    }

    /// Raw stored document, if any
    pub fn raw(&self) -> Option<&str> {
        self.json.as_deref()
    }
}

impl ProgressStorage for MemoryStorage {
    fn load(&self) -> Result<Option<PlayerProgress>, StorageError> {
        self.json.as_deref().map(decode).transpose()
    }

    fn save(&mut self, progress: &PlayerProgress) -> Result<(), StorageError> {
        self.json = Some(encode(progress)?);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.json = None;
        Ok(())
    }
}
