//! LocalStorage progress backend (WASM only)

use crate::error::StorageError;
use crate::persistence::{ProgressStorage, STORAGE_KEY, decode, encode};
use crate::progress::PlayerProgress;

/// Progress kept in the browser's `window.localStorage`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)
    }
}

fn backend_error(e: wasm_bindgen::JsValue) -> StorageError {
    StorageError::Backend(format!("{:?}", e))
}

impl ProgressStorage for LocalStorage {
    fn load(&self) -> Result<Option<PlayerProgress>, StorageError> {
        let json = Self::storage()?
            .get_item(STORAGE_KEY)
            .map_err(backend_error)?;
        json.as_deref().map(decode).transpose()
    }

    fn save(&mut self, progress: &PlayerProgress) -> Result<(), StorageError> {
        let json = encode(progress)?;
        Self::storage()?
            .set_item(STORAGE_KEY, &json)
            .map_err(backend_error)
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        Self::storage()?
            .remove_item(STORAGE_KEY)
            .map_err(backend_error)
    }
}
