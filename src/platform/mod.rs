//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (key -> game command)
//! - Storage (LocalStorage on web, in-memory elsewhere)

pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod storage;

pub use input::{KeyAction, map_key};
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
