//! UI rendering for the TUI
//!
//! This module handles all rendering using ratatui. The rendering is event-driven -
//! we only render when an event triggers a state change, not at a fixed frame rate.

mod form;
mod overlays;
mod widgets;

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::form::FunkCommand;
use crate::tui::app::{App, ModalState};
use crate::tui::theme::Theme;

use form::render_form_view;
use overlays::{render_confirm_dialog, render_help_overlay, render_toast};

/// Render the entire TUI
pub fn render(app: &mut App, theme: &Theme, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: title, form, status bar
    let layout = Layout::vertical([
        Constraint::Length(1), // Title bar
        Constraint::Min(0),    // Form
        Constraint::Length(2), // Status bar
    ])
    .split(area);

    render_title_bar(app, frame, layout[0], theme);
    render_form_view(app, frame, layout[1], theme);
    render_status_bar(app, frame, layout[2], theme);

    if matches!(app.modal, ModalState::Help) {
        render_help_overlay(frame, area, theme);
    } else if let Some(command) = app.modal.pending_command() {
        render_confirm_dialog(command, frame, area, theme);
    }

    // Toast (always on top)
    if let Some(toast) = app.feedback.current_toast() {
        render_toast(toast, frame, area, theme);
    }
}

fn render_title_bar(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let checked = app.form.elements().filter(|c| c.checked).count();
    let title = Line::from(vec![
        Span::styled(" funk ", Style::default().fg(theme.header_fg).bg(theme.header_bg).bold()),
        Span::styled(
            format!(
                " {} sites | mode: {} | {} checked",
                app.form.sites().len(),
                app.form.mode(),
                checked
            ),
            Style::default().fg(theme.border),
        ),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn render_status_bar(app: &App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let layout = Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).split(area);

    // Keybindings line - context-sensitive
    let keybinds = match &app.modal {
        ModalState::Confirm { .. } => " Enter:confirm  y:copy+confirm  Esc:back ",
        ModalState::Help => " Esc:close ",
        ModalState::None if app.is_editing() => {
            " type:edit  Backspace:delete  Ctrl+u:clear  Up/Down:move  Tab:mode  Enter:submit "
        }
        ModalState::None => {
            " j/k:move  Space:toggle  1-3/m:mode  Enter:submit  y:yank  ?:help  q:quit "
        }
    };
    let keybinds_para = Paragraph::new(keybinds).style(Style::default().fg(theme.border));
    frame.render_widget(keybinds_para, layout[0]);

    let mut status_parts = Vec::new();

    // Live preview of the resource list
    match FunkCommand::from_form(&app.form, &app.config.form.job_name) {
        Ok(command) => status_parts.push(Span::styled(
            format!(" -r {}", command.resources),
            Style::default().fg(theme.text_value),
        )),
        Err(e) => status_parts.push(Span::styled(
            format!(" {}", e),
            Style::default().fg(theme.border),
        )),
    }

    // Config warnings display (persistent until fixed)
    if let Some(first) = app.feedback.config_warnings.first() {
        let warning_text = if app.feedback.config_warnings.len() == 1 {
            format!(" | WARN: {}", first)
        } else {
            format!(
                " | WARN: {} (+{} more)",
                first,
                app.feedback.config_warnings.len() - 1
            )
        };
        status_parts.push(Span::styled(warning_text, Style::default().fg(theme.warning)));
    }

    // Error display (temporary, auto-dismisses)
    if let Some(error) = app.current_error() {
        status_parts.push(Span::styled(
            format!(" | ERROR: {} ", error),
            Style::default().fg(theme.error),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(status_parts)), layout[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::test_support::small_form;
    use crate::models::{FunkConfig, Mode};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(app: &mut App) -> String {
        draw_sized(app, 100, 24)
    }

    fn draw_sized(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let theme = Theme::dark();
        terminal.draw(|frame| render(app, &theme, frame)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_status_bar_previews_resources() {
        let mut app = App::new(small_form(Mode::Date), FunkConfig::default(), vec![]);
        assert!(draw(&mut app).contains("No resources selected"));

        app.form.click_grid();
        assert!(draw(&mut app).contains("-r grid5000"));
    }

    #[test]
    fn test_config_warning_shown() {
        let mut app = App::new(
            small_form(Mode::Date),
            FunkConfig::default(),
            vec!["bad theme".to_string(), "bad walltime".to_string()],
        );
        assert!(draw(&mut app).contains("WARN: bad theme (+1 more)"));
    }

    #[test]
    fn test_confirm_dialog_rendered() {
        let mut app = App::new(small_form(Mode::Date), FunkConfig::default(), vec![]);
        app.form.click_grid();
        app.form.click(crate::form::ControlId::Kavlan);
        app.modal = ModalState::Confirm {
            command: FunkCommand::from_form(&app.form, "FUNK").unwrap(),
        };
        let text = draw_sized(&mut app, 100, 40);
        assert!(text.contains("Submit Reservation Search"));
        assert!(text.contains("-r grid5000 -k"));
    }

    #[test]
    fn test_help_overlay_rendered() {
        let mut app = App::new(small_form(Mode::Date), FunkConfig::default(), vec![]);
        app.modal = ModalState::Help;
        assert!(draw(&mut app).contains("Keyboard Shortcuts"));
    }
}
