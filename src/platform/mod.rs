//! Platform abstraction layer
//!
//! Maps host identifiers (DOM `KeyboardEvent.key` values, mouse buttons) to
//! the simulation's logical inputs.

use crate::settings::SettingsToggle;
use crate::sim::input::Action;

/// Logical action for a DOM key name, if bound
pub fn action_for_key(key: &str) -> Option<Action> {
    match key {
        "w" | "W" | "ArrowUp" => Some(Action::Forward),
        "s" | "S" | "ArrowDown" => Some(Action::Backward),
        "a" | "A" | "ArrowLeft" => Some(Action::TurnLeft),
        "d" | "D" | "ArrowRight" => Some(Action::TurnRight),
        " " => Some(Action::Jump),
        "Shift" => Some(Action::Sprint),
        _ => None,
    }
}

/// Preference flipped by a key press, if bound
pub fn toggle_for_key(key: &str) -> Option<SettingsToggle> {
    match key {
        "f" | "F" => Some(SettingsToggle::ShowFps),
        "h" | "H" => Some(SettingsToggle::ShowControlsHint),
        "i" | "I" => Some(SettingsToggle::InvertY),
        _ => None,
    }
}

/// Whether the browser default for this key should be suppressed (page scroll)
pub fn suppress_default(key: &str) -> bool {
    matches!(key, " " | "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight")
}

/// Controls hint shown in the HUD
pub const CONTROLS_HINT: &str =
    "W/S or Up/Down: move | A/D or Left/Right: turn | Space: jump | Shift: sprint | Click: fire | F/H/I: FPS, hint, invert";
