//! Player settings and preferences
//!
//! Persisted in LocalStorage. The round controller only ever asks for a save
//! when a round starts; it never waits on the result.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ROUND_SECONDS, MAX_ROUND_SECONDS, MIN_ROUND_SECONDS};
use crate::error::GameError;

/// Player settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Round length in seconds
    pub round_seconds: u32,
    /// Shuffle the deck at round start
    pub shuffle: bool,
    /// Wrap to the first card instead of ending when the deck runs out
    pub loop_deck: bool,

    // === Input channels ===
    /// Tilt the device forward/back to score or pass
    pub tilt_enabled: bool,
    /// Swipe right/left to score or pass
    pub swipe_enabled: bool,

    // === Display ===
    /// Show the hint line under each phrase
    pub show_hints: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            round_seconds: DEFAULT_ROUND_SECONDS,
            shuffle: true,
            loop_deck: false,

            tilt_enabled: false,
            swipe_enabled: true,

            show_hints: true,
        }
    }
}

impl Settings {
    /// Copy with the round length clamped to the supported range
    pub fn sanitized(&self) -> Self {
        Self {
            round_seconds: self.round_seconds.clamp(MIN_ROUND_SECONDS, MAX_ROUND_SECONDS),
            ..self.clone()
        }
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "phrase_party_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
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
            match self.to_json() {
                Ok(json) => {
                    let _ = storage.set_item(Self::STORAGE_KEY, &json);
                    log::info!("Settings saved");
                }
                Err(e) => log::warn!("Settings not saved: {}", e),
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
