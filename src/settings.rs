//! Player preferences
//!
//! Persisted separately from progress in LocalStorage.

use serde::{Deserialize, Serialize};

/// Which keys steer the car
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ControlScheme {
    Arrows,
    Wasd,
    #[default]
    Both,
}

impl ControlScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlScheme::Arrows => "Arrows",
            ControlScheme::Wasd => "WASD",
            ControlScheme::Both => "Both",
        }
    }

    pub fn arrows(&self) -> bool {
        matches!(self, ControlScheme::Arrows | ControlScheme::Both)
    }

    pub fn wasd(&self) -> bool {
        matches!(self, ControlScheme::Wasd | ControlScheme::Both)
    }
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Steering keys
    pub controls: ControlScheme,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,

    // === Accessibility ===
    /// Skip the boost flash and lane-change easing
    pub reduced_motion: bool,

    /// Abort the race when the tab is hidden instead of pausing it
    pub abort_when_hidden: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            controls: ControlScheme::Both,
            show_fps: false,
            reduced_motion: false,
            abort_when_hidden: true,
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "zenith_racer_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Failed to save settings");
                    return;
                }
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_scheme_keys() {
        assert_eq!(ControlScheme::Wasd.as_str(), "WASD");
        assert!(ControlScheme::Both.arrows() && ControlScheme::Both.wasd());
        assert!(!ControlScheme::Arrows.wasd());
    }

    #[test]
    fn test_settings_json_is_forgiving() {
        let settings: Settings =
            serde_json::from_str(r#"{"controls": "wasd", "volume": 3}"#).unwrap();
        assert_eq!(settings.controls, ControlScheme::Wasd);
        assert!(settings.abort_when_hidden);

        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert!(json.contains("\"showFps\":false"));
    }
}
