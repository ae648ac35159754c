//! Theme definitions for the TUI
//!
//! Colorblind-safe themes for both dark and light terminals.
//! The default is "dark" but users can configure "light" via config file or env var.

use ratatui::style::Color;

use crate::form::Control;
use crate::models::InputType;

/// Available theme names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
}

impl ThemeName {
    pub fn from_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "light" => ThemeName::Light,
            _ => ThemeName::Dark,
        }
    }
}

/// Color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    // Base colors
    pub fg: Color,
    pub border: Color,
    pub border_focused: Color,

    // Control states
    pub checked: Color,
    pub locked: Color,
    pub text_value: Color,

    // UI elements
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub highlight: Color,

    // Feedback
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Create a dark theme (default)
    pub fn dark() -> Self {
        Self {
            fg: Color::White,
            border: Color::DarkGray,
            border_focused: Color::Cyan,

            checked: Color::Rgb(0, 200, 0),       // Bright green
            locked: Color::DarkGray,
            text_value: Color::Rgb(80, 160, 255), // Light blue

            selected_bg: Color::Rgb(60, 60, 80),
            selected_fg: Color::White,
            header_bg: Color::Rgb(40, 80, 120),
            header_fg: Color::White,
            highlight: Color::Cyan,

            success: Color::Rgb(0, 200, 0),
            warning: Color::Rgb(255, 180, 0),    // Orange (not yellow - better visibility)
            error: Color::Rgb(255, 80, 80),
        }
    }

    /// Create a light theme
    /// Uses darker, more saturated colors for visibility on light backgrounds
    pub fn light() -> Self {
        Self {
            fg: Color::Black,
            border: Color::Rgb(120, 120, 120),
            border_focused: Color::Rgb(0, 100, 180),

            checked: Color::Rgb(0, 140, 0),      // Dark green
            locked: Color::Rgb(150, 150, 150),
            text_value: Color::Rgb(0, 80, 180),  // Dark blue

            selected_bg: Color::Rgb(200, 220, 255),
            selected_fg: Color::Black,
            header_bg: Color::Rgb(180, 200, 230),
            header_fg: Color::Black,
            highlight: Color::Rgb(0, 100, 180),

            success: Color::Rgb(0, 140, 0),
            warning: Color::Rgb(200, 120, 0),
            error: Color::Rgb(200, 0, 0),
        }
    }

    /// Create theme from name string
    pub fn from_name(name: &str) -> Self {
        match ThemeName::from_name(name) {
            ThemeName::Dark => Self::dark(),
            ThemeName::Light => Self::light(),
        }
    }

    /// Foreground color for a control
    pub fn control_color(&self, control: &Control) -> Color {
        if control.disabled {
            self.locked
        } else {
            match control.input_type {
                InputType::Text => self.text_value,
                InputType::Checkbox if control.checked => self.checked,
                InputType::Checkbox => self.fg,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_from_name() {
        assert_eq!(ThemeName::from_name("LIGHT"), ThemeName::Light);
        assert_eq!(ThemeName::from_name("dark"), ThemeName::Dark);

        let light = Theme::from_name("LIGHT");
        assert_eq!(light.fg, Theme::light().fg);
        assert_ne!(light.fg, Theme::dark().fg);

        // Unknown defaults to dark
        let unknown = Theme::from_name("unknown");
        assert_eq!(unknown.fg, Theme::dark().fg);
        assert_eq!(unknown.selected_bg, Theme::dark().selected_bg);
    }

    #[test]
    fn test_control_colors() {
        let theme = Theme::dark();
        let mut control = Control::checkbox("rennes");
        assert_eq!(theme.control_color(&control), theme.fg);

        control.checked = true;
        assert_eq!(theme.control_color(&control), theme.checked);

        control.disabled = true;
        assert_eq!(theme.control_color(&control), theme.locked);

        let text = Control::text("grid5000", "");
        assert_eq!(theme.control_color(&text), theme.text_value);
    }
}
