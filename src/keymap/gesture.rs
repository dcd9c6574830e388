//! Gesture state machine encoded by the injected dance callbacks.
//!
//! The patcher never runs this logic itself; it describes, as data, what the
//! generated `finished` and `reset` callbacks do for each classification so
//! the C text can be rendered from one table.

use crate::config::GestureConfig;
use std::fmt;

/// Classification of a completed key interaction, as reported by the
/// firmware's `dance_step()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    SingleTap,
    SingleHold,
    DoubleTap,
    /// Double tap where the second press is held.
    DoubleSingleTap,
}

impl Gesture {
    pub const ALL: [Gesture; 4] = [
        Gesture::SingleTap,
        Gesture::SingleHold,
        Gesture::DoubleTap,
        Gesture::DoubleSingleTap,
    ];

    /// Label used by the generated keymap's step enum.
    pub fn c_label(self) -> &'static str {
        match self {
            Gesture::SingleTap => "SINGLE_TAP",
            Gesture::SingleHold => "SINGLE_HOLD",
            Gesture::DoubleTap => "DOUBLE_TAP",
            Gesture::DoubleSingleTap => "DOUBLE_SINGLE_TAP",
        }
    }

    /// Actions performed when the dance finishes with this classification.
    pub fn on_finished(self, gesture: &GestureConfig) -> Vec<KeyAction> {
        let held = &gesture.held_key;
        match self {
            Gesture::SingleTap | Gesture::SingleHold => vec![KeyAction::Register(held.clone())],
            Gesture::DoubleTap => gesture
                .double_tap
                .iter()
                .map(|key| KeyAction::Tap(key.clone()))
                .collect(),
            Gesture::DoubleSingleTap => vec![
                KeyAction::Tap(held.clone()),
                KeyAction::Register(held.clone()),
            ],
        }
    }

    /// Actions performed on reset: release whatever `on_finished` left held.
    pub fn on_reset(self, gesture: &GestureConfig) -> Vec<KeyAction> {
        self.on_finished(gesture)
            .into_iter()
            .filter_map(|action| match action {
                KeyAction::Register(key) => Some(KeyAction::Unregister(key)),
                _ => None,
            })
            .collect()
    }
}

/// A single key effect in the generated callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Register(String),
    Unregister(String),
    /// Press and release.
    Tap(String),
}

impl fmt::Display for KeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyAction::Register(key) => write!(f, "register_code16({key});"),
            KeyAction::Unregister(key) => write!(f, "unregister_code16({key});"),
            KeyAction::Tap(key) => write!(f, "tap_code16({key});"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tap_and_hold_register_held_key() {
        let config = GestureConfig::default();
        for gesture in [Gesture::SingleTap, Gesture::SingleHold] {
            assert_eq!(
                gesture.on_finished(&config),
                vec![KeyAction::Register("KC_SPACE".to_string())]
            );
            assert_eq!(
                gesture.on_reset(&config),
                vec![KeyAction::Unregister("KC_SPACE".to_string())]
            );
        }
    }

    #[test]
    fn test_double_tap_emits_discrete_taps() {
        let config = GestureConfig::default();
        assert_eq!(
            Gesture::DoubleTap.on_finished(&config),
            vec![
                KeyAction::Tap("KC_DOT".to_string()),
                KeyAction::Tap("KC_SPACE".to_string()),
            ]
        );
        // Nothing is held, so nothing to release
        assert!(Gesture::DoubleTap.on_reset(&config).is_empty());
    }

    #[test]
    fn test_double_tap_then_hold() {
        let config = GestureConfig::default();
        assert_eq!(
            Gesture::DoubleSingleTap.on_finished(&config),
            vec![
                KeyAction::Tap("KC_SPACE".to_string()),
                KeyAction::Register("KC_SPACE".to_string()),
            ]
        );
        assert_eq!(
            Gesture::DoubleSingleTap.on_reset(&config),
            vec![KeyAction::Unregister("KC_SPACE".to_string())]
        );
    }

    #[test]
    fn test_action_rendering() {
        assert_eq!(
            KeyAction::Register("KC_A".into()).to_string(),
            "register_code16(KC_A);"
        );
        assert_eq!(
            KeyAction::Unregister("KC_A".into()).to_string(),
            "unregister_code16(KC_A);"
        );
        assert_eq!(KeyAction::Tap("KC_A".into()).to_string(), "tap_code16(KC_A);");
    }
}
