//! Search mode selected in the form.
//!
//! The mode decides how resource controls are rendered: `free` asks for node
//! counts as free text, every other mode uses checkboxes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How a control is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    #[default]
    Checkbox,
}

impl InputType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Checkbox => "checkbox",
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of the mode selector.
///
/// Parsing never fails: anything that is not a known mode is kept verbatim as
/// `Other` and takes the checkbox branch everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Mode {
    /// Number of nodes available at a given date
    #[default]
    Date,
    /// Next free slot for a combination of resources
    Free,
    /// Slot with the maximum number of nodes
    Max,
    Other(String),
}

impl Mode {
    /// Modes offered by the selector, in display order
    pub const SELECTABLE: [Mode; 3] = [Mode::Date, Mode::Free, Mode::Max];

    #[must_use]
    pub fn from_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "date" => Mode::Date,
            "free" => Mode::Free,
            "max" => Mode::Max,
            _ => Mode::Other(value.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Mode::Date => "date",
            Mode::Free => "free",
            Mode::Max => "max",
            Mode::Other(value) => value,
        }
    }

    #[must_use]
    pub fn is_free(&self) -> bool {
        matches!(self, Mode::Free)
    }

    /// Input type of every resource control under this mode
    #[must_use]
    pub fn input_type(&self) -> InputType {
        if self.is_free() {
            InputType::Text
        } else {
            InputType::Checkbox
        }
    }

    /// The end date is implied by start + walltime in date mode
    #[must_use]
    pub fn locks_end_date(&self) -> bool {
        matches!(self, Mode::Date)
    }

    /// Next selectable mode (wraps around; unknown modes restart at `date`)
    #[must_use]
    pub fn next(&self) -> Mode {
        match self {
            Mode::Date => Mode::Free,
            Mode::Free => Mode::Max,
            Mode::Max | Mode::Other(_) => Mode::Date,
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Mode::Date => "number of nodes available at a given date",
            Mode::Free => "next free slot for a combination of resources",
            Mode::Max => "time slot where the maximum number of nodes are available",
            Mode::Other(_) => "unrecognized mode",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Mode {
    fn from(value: &str) -> Self {
        Mode::from_value(value)
    }
}

impl From<String> for Mode {
    fn from(value: String) -> Self {
        Mode::from_value(&value)
    }
}

impl From<Mode> for String {
    fn from(mode: Mode) -> Self {
        mode.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_value_known() {
        assert_eq!(Mode::from_value("date"), Mode::Date);
        assert_eq!(Mode::from_value("free"), Mode::Free);
        assert_eq!(Mode::from_value(" MAX "), Mode::Max);
    }

    #[test]
    fn test_mode_from_value_unknown_is_kept() {
        let mode = Mode::from_value("checkbox-like");
        assert_eq!(mode, Mode::Other("checkbox-like".to_string()));
        assert_eq!(mode.as_str(), "checkbox-like");
    }

    #[test]
    fn test_only_free_renders_text() {
        assert_eq!(Mode::Free.input_type(), InputType::Text);
        assert_eq!(Mode::Date.input_type(), InputType::Checkbox);
        assert_eq!(Mode::Max.input_type(), InputType::Checkbox);
        assert_eq!(Mode::from_value("").input_type(), InputType::Checkbox);
    }

    #[test]
    fn test_only_date_locks_end_date() {
        assert!(Mode::Date.locks_end_date());
        assert!(!Mode::Free.locks_end_date());
        assert!(!Mode::Max.locks_end_date());
        assert!(!Mode::from_value("other").locks_end_date());
    }

    #[test]
    fn test_mode_cycle() {
        assert_eq!(Mode::Date.next(), Mode::Free);
        assert_eq!(Mode::Free.next(), Mode::Max);
        assert_eq!(Mode::Max.next(), Mode::Date);
        assert_eq!(Mode::from_value("weird").next(), Mode::Date);
    }

    #[test]
    fn test_mode_serde_as_string() {
        let json = serde_json::to_string(&Mode::Free).unwrap();
        assert_eq!(json, "\"free\"");
        let parsed: Mode = serde_json::from_str("\"later\"").unwrap();
        assert_eq!(parsed, Mode::Other("later".to_string()));
    }
}
