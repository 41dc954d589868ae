//! Player settings and preferences
//!
//! Persisted in LocalStorage, separate from gameplay tuning.

use serde::{Deserialize, Serialize};

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Pointer ===
    /// Multiplier on vertical pointer motion (1.0 = tuned default)
    pub pointer_sensitivity: f32,
    /// Moving the pointer up lowers the camera instead of raising it
    pub invert_y: bool,

    // === HUD ===
    /// Show FPS counter
    pub show_fps: bool,
    /// Show the key bindings line
    pub show_controls_hint: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pointer_sensitivity: 1.0,
            invert_y: false,
            show_fps: true,
            show_controls_hint: true,
        }
    }
}

/// Preferences the player can flip from the keyboard while playing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsToggle {
    ShowFps,
    ShowControlsHint,
    InvertY,
}

impl Settings {
    pub const MIN_SENSITIVITY: f32 = 0.1;
    pub const MAX_SENSITIVITY: f32 = 5.0;

    /// Raw pointer motion scaled by the player's preferences
    pub fn scale_pointer_dy(&self, dy: f32) -> f32 {
        let sign = if self.invert_y { -1.0 } else { 1.0 };
        dy * self.effective_sensitivity() * sign
    }

    /// Sensitivity clamped to the supported range (hand-edited storage can hold anything)
    pub fn effective_sensitivity(&self) -> f32 {
        if self.pointer_sensitivity.is_finite() {
            self.pointer_sensitivity
                .clamp(Self::MIN_SENSITIVITY, Self::MAX_SENSITIVITY)
        } else {
            1.0
        }
    }

    /// Flip one preference and return its new value
    pub fn toggle(&mut self, toggle: SettingsToggle) -> bool {
        let flag = match toggle {
            SettingsToggle::ShowFps => &mut self.show_fps,
            SettingsToggle::ShowControlsHint => &mut self.show_controls_hint,
            SettingsToggle::InvertY => &mut self.invert_y,
        };
        *flag = !*flag;
        *flag
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "oval_arena_settings";

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
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Write settings to LocalStorage (WASM only). Failures are logged, not fatal.
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
        else {
            log::warn!("LocalStorage unavailable, settings not saved");
            return;
        };
        match serde_json::to_string(self) {
            Ok(json) => {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("LocalStorage rejected settings");
                } else {
                    log::debug!("Settings saved: {json}");
                }
            }
            Err(e) => log::warn!("Could not serialize settings: {e}"),
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
