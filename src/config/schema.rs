use serde::Deserialize;
use std::fmt;

/// The tap dance injected into a keymap.
///
/// `Default` is the double-tap-space dance on the Moonlander's right thumb.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DanceConfig {
    /// Dance number; names every generated symbol and the state slot.
    pub index: u32,
    pub enum_name: String,
    pub state_type: String,
    pub state_array: String,
    pub actions_table: String,
    pub layer: u32,
    pub layout_macro: String,
    /// Token in the layer's layout block that becomes `TD(DANCE_<index>)`.
    pub target_key: String,
    pub gesture: GestureConfig,
}

impl Default for DanceConfig {
    fn default() -> Self {
        Self {
            index: 5,
            enum_name: "tap_dance_codes".to_string(),
            state_type: "tap".to_string(),
            state_array: "dance_state".to_string(),
            actions_table: "tap_dance_actions".to_string(),
            layer: 0,
            layout_macro: "LAYOUT_moonlander".to_string(),
            target_key: "KC_SPACE".to_string(),
            gesture: GestureConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct GestureConfig {
    /// Key held down by single tap, single hold and double-tap-then-hold.
    pub held_key: String,
    /// Keys tapped in order on a double tap.
    pub double_tap: Vec<String>,
    pub reset_delay_ms: u32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            held_key: "KC_SPACE".to_string(),
            double_tap: vec!["KC_DOT".to_string(), "KC_SPACE".to_string()],
            reset_delay_ms: 10,
        }
    }
}

impl DanceConfig {
    /// Enum constant, e.g. `DANCE_5`.
    pub fn dance_name(&self) -> String {
        format!("DANCE_{}", self.index)
    }

    /// Per-tap callback, e.g. `on_dance_5`.
    pub fn on_each_tap_fn(&self) -> String {
        format!("on_dance_{}", self.index)
    }

    pub fn finished_fn(&self) -> String {
        format!("dance_{}_finished", self.index)
    }

    pub fn reset_fn(&self) -> String {
        format!("dance_{}_reset", self.index)
    }

    /// Minimum length of the state array so that `[index]` is in bounds.
    pub fn required_state_slots(&self) -> u64 {
        u64::from(self.index) + 1
    }

    /// Key code placed in the layout, e.g. `TD(DANCE_5)`.
    pub fn layout_keycode(&self) -> String {
        format!("TD({})", self.dance_name())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        let identifiers: [(&'static str, &str); 7] = [
            ("enum_name", &self.enum_name),
            ("state_type", &self.state_type),
            ("state_array", &self.state_array),
            ("actions_table", &self.actions_table),
            ("layout_macro", &self.layout_macro),
            ("target_key", &self.target_key),
            ("gesture.held_key", &self.gesture.held_key),
        ];
        for (field, value) in identifiers {
            check_identifier(field, value, &mut issues);
        }

        if self.gesture.double_tap.is_empty() {
            issues.push(ValidationIssue::EmptyDoubleTap);
        }
        for key in &self.gesture.double_tap {
            check_identifier("gesture.double_tap", key, &mut issues);
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { issues })
        }
    }
}

fn check_identifier(field: &'static str, value: &str, issues: &mut Vec<ValidationIssue>) {
    if value.trim().is_empty() {
        issues.push(ValidationIssue::MissingField { field });
    } else if !is_c_identifier(value) {
        issues.push(ValidationIssue::InvalidIdentifier {
            field,
            value: value.to_string(),
        });
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_c_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, issue) in self.issues.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    MissingField { field: &'static str },
    InvalidIdentifier { field: &'static str, value: String },
    EmptyDoubleTap,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingField { field } => {
                write!(f, "dance config missing required field '{field}'")
            }
            ValidationIssue::InvalidIdentifier { field, value } => {
                write!(f, "'{field}' is not a valid C identifier: {value:?}")
            }
            ValidationIssue::EmptyDoubleTap => {
                write!(f, "'gesture.double_tap' must list at least one key")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        let config = DanceConfig::default();
        assert_eq!(config.dance_name(), "DANCE_5");
        assert_eq!(config.on_each_tap_fn(), "on_dance_5");
        assert_eq!(config.finished_fn(), "dance_5_finished");
        assert_eq!(config.reset_fn(), "dance_5_reset");
        assert_eq!(config.layout_keycode(), "TD(DANCE_5)");
        assert_eq!(config.required_state_slots(), 6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_is_c_identifier() {
        assert!(is_c_identifier("KC_SPACE"));
        assert!(is_c_identifier("_private1"));
        assert!(!is_c_identifier("1abc"));
        assert!(!is_c_identifier("TD(DANCE_5)"));
        assert!(!is_c_identifier(""));
    }

    #[test]
    fn test_validate_collects_all_issues() {
        let config = DanceConfig {
            enum_name: String::new(),
            target_key: "KC SPACE".to_string(),
            gesture: GestureConfig {
                double_tap: vec![],
                ..GestureConfig::default()
            },
            ..DanceConfig::default()
        };

        let err = config.validate().unwrap_err();
        assert_eq!(err.issues.len(), 3);
        assert!(err
            .issues
            .contains(&ValidationIssue::MissingField { field: "enum_name" }));
        assert!(err.issues.contains(&ValidationIssue::EmptyDoubleTap));

        let message = err.to_string();
        assert!(message.contains("target_key"));
        assert_eq!(message.lines().count(), 3);
    }
}
