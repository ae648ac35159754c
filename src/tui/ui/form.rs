//! Form view rendering
//!
//! One list line per row: the mode selector, the grid, each site followed by
//! its indented clusters, the time controls, then the reservation options.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::form::ControlId;
use crate::models::Mode;
use crate::tui::app::{App, FormRow};
use crate::tui::theme::Theme;

use super::widgets::control_spans;

pub fn render_form_view(app: &mut App, frame: &mut Frame, area: Rect, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .title(format!(" {} ", app.form.grid().name));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    app.set_viewport_height(inner.height as usize);

    let selected = app.list.selected;
    let lines: Vec<Line> = app
        .rows
        .iter()
        .enumerate()
        .skip(app.list.scroll_offset)
        .take(inner.height as usize)
        .map(|(idx, row)| {
            let line = row_line(app, *row, theme);
            if idx == selected {
                line.style(
                    Style::default()
                        .bg(theme.selected_bg)
                        .fg(theme.selected_fg),
                )
            } else {
                line
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn row_line(app: &App, row: FormRow, theme: &Theme) -> Line<'static> {
    match row {
        FormRow::Mode => mode_line(app.form.mode(), theme),
        FormRow::Control(id) => {
            let Some(control) = app.form.control(id) else {
                return Line::default();
            };
            let indent = match id {
                ControlId::Site(_) => "   ",
                ControlId::Cluster { .. } => "       ",
                _ => " ",
            };
            let mut spans = vec![Span::raw(indent)];
            spans.extend(control_spans(control, theme));
            if let Some(hint) = option_hint(id) {
                spans.push(Span::styled(format!("  {hint}"), Style::default().fg(theme.border)));
            }
            Line::from(spans)
        }
    }
}

fn option_hint(id: ControlId) -> Option<&'static str> {
    match id {
        ControlId::Charter => Some("avoid charter periods (nights and week-ends only)"),
        ControlId::Subnet => Some("e.g. slash_22=1 or rennes:slash_22=1,lyon:slash_19=1"),
        ControlId::Kavlan => Some("ask for a KaVLAN"),
        ControlId::SubmissionOpts => Some("extra oarsub/oargridsub options"),
        ControlId::Autoreservation => Some("reserve the slot automatically"),
        _ => None,
    }
}

fn mode_line(current: &Mode, theme: &Theme) -> Line<'static> {
    let mut spans = vec![Span::styled(
        " Mode: ",
        Style::default().fg(theme.highlight).bold(),
    )];
    for (i, mode) in Mode::SELECTABLE.iter().enumerate() {
        let label = format!("{}:{}", i + 1, mode.as_str());
        if mode == current {
            spans.push(Span::styled(
                format!("<{label}>"),
                Style::default().fg(theme.checked).bold(),
            ));
        } else {
            spans.push(Span::styled(format!(" {label} "), Style::default().fg(theme.fg)));
        }
        spans.push(Span::raw(" "));
    }
    if !Mode::SELECTABLE.contains(current) {
        spans.push(Span::styled(
            format!("<{}>", current.as_str()),
            Style::default().fg(theme.warning),
        ));
    }
    spans.push(Span::styled(
        format!("  {}", current.description()),
        Style::default().fg(theme.border),
    ));
    Line::from(spans)
}
