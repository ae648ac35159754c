//! Reusable UI widgets and helper functions

use ratatui::prelude::*;

use crate::form::Control;
use crate::models::InputType;
use crate::tui::theme::Theme;

/// Create a centered rectangle
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

/// Input widget text: checkbox glyph or the typed value in brackets
pub fn control_glyph(control: &Control) -> String {
    match control.input_type {
        InputType::Checkbox if control.checked => "[x]".to_string(),
        InputType::Checkbox => "[ ]".to_string(),
        InputType::Text => format!("[{:>8}]", control.value),
    }
}

/// Styled input widget followed by the control name
pub fn control_spans(control: &Control, theme: &Theme) -> Vec<Span<'static>> {
    let color = theme.control_color(control);
    let mut spans = vec![
        Span::styled(control_glyph(control), Style::default().fg(color)),
        Span::raw(" "),
        Span::styled(control.name.clone(), Style::default().fg(color)),
    ];
    if control.disabled {
        spans.push(Span::styled(" (locked)", Style::default().fg(theme.locked)));
    }
    spans
}
