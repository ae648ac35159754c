//! Overlay and popup rendering
//!
//! Handles rendering of help, submit confirmation and toast notifications.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::form::FunkCommand;
use crate::formatting::truncate_string;
use crate::tui::app::Toast;
use crate::tui::theme::Theme;

use super::widgets::centered_rect;

fn section(title: &'static str, theme: &Theme) -> Line<'static> {
    Line::from(vec![Span::styled(
        title,
        Style::default().fg(theme.highlight).bold(),
    )])
}

pub fn render_help_overlay(frame: &mut Frame, area: Rect, theme: &Theme) {
    let popup_area = centered_rect(65, 80, area);

    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "funk picker - Keyboard Shortcuts",
            Style::default().bold(),
        )]),
        Line::from(""),
        section("Navigation", theme),
        Line::from("  j / Down       Move selection down"),
        Line::from("  k / Up         Move selection up"),
        Line::from("  g / Home       Jump to top"),
        Line::from("  G / End        Jump to bottom"),
        Line::from("  Ctrl+d / PgDn  Page down"),
        Line::from("  Ctrl+u / PgUp  Page up"),
        Line::from("  Mouse click    Select and click a row"),
        Line::from(""),
        section("Selection", theme),
        Line::from("  Space / x      Click the focused checkbox"),
        Line::from("  1 / 2 / 3      Mode date / free / max"),
        Line::from("  m / Tab        Cycle mode"),
        Line::from("  0-9, :, ...    Type into text inputs (free mode, dates)"),
        Line::from("  Backspace      Delete last character"),
        Line::from(""),
        section("Reservation", theme),
        Line::from("  Enter          Build the funk command"),
        Line::from("  y              Copy the command line to clipboard"),
        Line::from(""),
        section("General", theme),
        Line::from("  ?/F1           Show this help"),
        Line::from("  Esc            Close overlay / dismiss error"),
        Line::from("  q / Ctrl+c     Quit without submitting"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press ? or Esc to close this help",
            Style::default().fg(theme.border),
        )]),
    ];

    let help_para = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border_focused))
                .title(" Help "),
        )
        .style(Style::default().fg(theme.fg));

    frame.render_widget(help_para, popup_area);
}

pub fn render_confirm_dialog(command: &FunkCommand, frame: &mut Frame, area: Rect, theme: &Theme) {
    let popup_area = centered_rect(70, 40, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.warning))
        .title(" Submit Reservation Search ");

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let label = |text: &'static str| Span::styled(text, Style::default().fg(theme.border));

    let lines = vec![
        Line::from(vec![label("  Mode:      "), Span::raw(command.mode.to_string())]),
        Line::from(vec![
            label("  Resources: "),
            Span::styled(command.resources.to_string(), Style::default().bold()),
        ]),
        Line::from(vec![label("  Walltime:  "), Span::raw(command.walltime.clone())]),
        Line::from(vec![label("  Start:     "), Span::raw(command.start_date.clone())]),
        Line::from(vec![
            label("  End:       "),
            Span::raw(command.end_date.clone().unwrap_or_else(|| "-".to_string())),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", command.to_command_line()),
            Style::default().fg(theme.text_value),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("  Press "),
            Span::styled("[Enter]", Style::default().fg(theme.warning).bold()),
            Span::raw(" to confirm, "),
            Span::styled("[y]", Style::default().fg(theme.warning).bold()),
            Span::raw(" to copy and confirm, "),
            Span::styled("[Esc]", Style::default().fg(theme.border).bold()),
            Span::raw(" to go back"),
        ]),
    ];

    let para = Paragraph::new(lines)
        .style(Style::default().fg(theme.fg))
        .wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}

pub fn render_toast(toast: &Toast, frame: &mut Frame, area: Rect, theme: &Theme) {
    // Position toast at bottom-right
    let message = truncate_string(&toast.message, 36);
    let toast_width = (message.len() + 4) as u16;
    let toast_area = Rect {
        x: area.width.saturating_sub(toast_width + 2),
        y: area.height.saturating_sub(5),
        width: toast_width,
        height: 3,
    }
    .intersection(area);

    frame.render_widget(Clear, toast_area);

    let border_color = if toast.success {
        theme.success
    } else {
        theme.error
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let para = Paragraph::new(format!(" {} ", message))
        .block(block)
        .style(Style::default().fg(theme.fg))
        .alignment(Alignment::Center);

    frame.render_widget(para, toast_area);
}
