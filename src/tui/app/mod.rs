//! Application state and core logic for the TUI
//!
//! The picker is a single list of rows: the mode selector, the resource tree,
//! the time controls and the reservation options. Key actions are translated into clicks and text
//! edits on the form, so the cascade handlers run exactly as they would
//! behind the web page.

mod state;

pub use state::{FeedbackState, FormRow, ListState, ModalState, Toast};

use crate::form::{ControlId, Form, FunkCommand};
use crate::models::{FunkConfig, Mode};
use crate::tui::event::{DataEvent, EventResult, InputEvent, KeyAction};

/// Terminal row of the first list entry (title bar + block border)
const CONTENT_TOP: u16 = 2;

/// Main application state
pub struct App {
    // Lifecycle
    pub running: bool,

    pub form: Form,
    pub rows: Vec<FormRow>,
    pub list: ListState,

    pub modal: ModalState,
    pub feedback: FeedbackState,

    pub config: FunkConfig,

    /// Command confirmed by the user, set when the picker exits with a submit
    pub outcome: Option<FunkCommand>,
}

impl App {
    pub fn new(form: Form, config: FunkConfig, config_warnings: Vec<String>) -> Self {
        let rows = std::iter::once(FormRow::Mode)
            .chain(form.resource_ids().into_iter().map(FormRow::Control))
            .chain(ControlId::TIME.into_iter().map(FormRow::Control))
            .chain(ControlId::OPTIONS.into_iter().map(FormRow::Control))
            .collect();

        Self {
            running: true,
            form,
            rows,
            list: ListState::default(),
            modal: ModalState::None,
            feedback: FeedbackState::new(config_warnings),
            config,
            outcome: None,
        }
    }

    /// Update the number of visible list rows after a resize or redraw
    pub fn set_viewport_height(&mut self, height: usize) {
        self.list.visible_count = height;
        self.list.clamp(self.rows.len());
    }

    #[must_use]
    pub fn selected_row(&self) -> Option<FormRow> {
        self.rows.get(self.list.selected).copied()
    }

    /// Whether key presses are typed into the focused control
    #[must_use]
    pub fn is_editing(&self) -> bool {
        if self.modal.is_active() {
            return false;
        }
        self.selected_row()
            .and_then(FormRow::control_id)
            .and_then(|id| self.form.control(id))
            .is_some_and(|c| !c.is_checkbox() && !c.disabled)
    }

    /// Handle an input event
    pub fn handle_input(&mut self, event: InputEvent) -> EventResult {
        match event {
            InputEvent::Key(key_event) => {
                let action = KeyAction::from_key_event(key_event, self.is_editing());
                self.handle_action(action)
            }
            InputEvent::Resize(_, _) => EventResult::Continue,
            InputEvent::Mouse(mouse_event) => {
                let action = KeyAction::from_mouse_event(mouse_event);
                self.handle_action(action)
            }
        }
    }

    /// Handle a timer event
    pub fn handle_data(&mut self, event: DataEvent) -> EventResult {
        match event {
            DataEvent::Tick => {
                if self.feedback.expire() {
                    EventResult::Continue
                } else {
                    EventResult::Unchanged
                }
            }
        }
    }

    fn handle_action(&mut self, action: KeyAction) -> EventResult {
        // Help overlay takes priority
        if matches!(self.modal, ModalState::Help) {
            return match action {
                KeyAction::Escape | KeyAction::ShowHelp | KeyAction::Quit => {
                    self.modal = ModalState::None;
                    EventResult::Continue
                }
                _ => EventResult::Unchanged,
            };
        }

        if matches!(self.modal, ModalState::Confirm { .. }) {
            return self.handle_confirm_action(action);
        }

        if let Some(result) = self.handle_navigation(&action) {
            return result;
        }

        match action {
            KeyAction::Quit => {
                self.running = false;
                EventResult::Quit
            }
            KeyAction::ShowHelp => {
                self.modal = ModalState::Help;
                EventResult::Continue
            }
            KeyAction::Escape => {
                self.feedback.clear_error();
                EventResult::Continue
            }

            KeyAction::Toggle => {
                self.toggle_selected();
                EventResult::Continue
            }
            KeyAction::CycleMode => {
                let next = self.form.mode().next();
                self.change_mode(next);
                EventResult::Continue
            }
            KeyAction::SelectMode(idx) => match Mode::SELECTABLE.get(idx) {
                Some(mode) => {
                    self.change_mode(mode.clone());
                    EventResult::Continue
                }
                None => EventResult::Unchanged,
            },
            KeyAction::Submit => {
                self.submit();
                if self.running {
                    EventResult::Continue
                } else {
                    EventResult::Quit
                }
            }
            KeyAction::Yank => {
                match FunkCommand::from_form(&self.form, &self.config.form.job_name) {
                    Ok(command) => self.yank_command(&command),
                    Err(e) => self.feedback.set_error(e.to_string()),
                }
                EventResult::Continue
            }

            KeyAction::EditChar(c) => self.edit_selected(|value| value.push(c)),
            KeyAction::EditBackspace => self.edit_selected(|value| {
                value.pop();
            }),
            KeyAction::EditClear => self.edit_selected(String::clear),

            KeyAction::MouseClick { row, .. } => {
                if self.handle_mouse_click(row) {
                    EventResult::Continue
                } else {
                    EventResult::Unchanged
                }
            }

            _ => EventResult::Unchanged,
        }
    }

    /// Handle navigation actions (returns Some if action was handled)
    fn handle_navigation(&mut self, action: &KeyAction) -> Option<EventResult> {
        let len = self.rows.len();
        match action {
            KeyAction::MoveUp | KeyAction::MouseScrollUp => self.list.move_up(len),
            KeyAction::MoveDown | KeyAction::MouseScrollDown => self.list.move_down(len),
            KeyAction::MoveToTop => self.list.move_to_top(),
            KeyAction::MoveToBottom => self.list.move_to_bottom(len),
            KeyAction::PageUp => self.list.page_up(len),
            KeyAction::PageDown => self.list.page_down(len),
            _ => return None,
        }
        Some(EventResult::Continue)
    }

    fn handle_confirm_action(&mut self, action: KeyAction) -> EventResult {
        match action {
            KeyAction::Escape | KeyAction::Quit => {
                self.modal = ModalState::None;
                EventResult::Continue
            }
            KeyAction::Submit | KeyAction::Yank => {
                if let ModalState::Confirm { command } = std::mem::take(&mut self.modal) {
                    if action == KeyAction::Yank {
                        self.yank_command(&command);
                    }
                    self.finish(command);
                    EventResult::Quit
                } else {
                    EventResult::Unchanged
                }
            }
            _ => EventResult::Unchanged,
        }
    }

    /// Select the clicked row and click its control
    fn handle_mouse_click(&mut self, row: u16) -> bool {
        if self.modal.is_active() || row < CONTENT_TOP {
            return false;
        }
        let line = (row - CONTENT_TOP) as usize;
        if self.list.visible_count > 0 && line >= self.list.visible_count {
            return false;
        }
        if !self.list.select_visible_line(line, self.rows.len()) {
            return false;
        }
        self.toggle_selected();
        true
    }

    fn change_mode(&mut self, mode: Mode) {
        self.form.on_mode_change(mode);
        self.list.clamp(self.rows.len());
    }

    /// Space on the focused row: cycle the mode selector or click the control
    fn toggle_selected(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        match row {
            FormRow::Mode => {
                let next = self.form.mode().next();
                self.change_mode(next);
            }
            FormRow::Control(id) => {
                let Some(control) = self.form.control(id) else {
                    return;
                };
                if control.disabled {
                    let msg = format!("{} is locked", control.name);
                    self.feedback.set_toast(Toast::failure(msg));
                } else if control.is_checkbox() {
                    self.form.click(id);
                }
            }
        }
    }

    fn edit_selected(&mut self, edit: impl FnOnce(&mut String)) -> EventResult {
        let Some(id) = self.selected_row().and_then(FormRow::control_id) else {
            return EventResult::Unchanged;
        };
        let Some(mut value) = self.form.control(id).map(|c| c.value.clone()) else {
            return EventResult::Unchanged;
        };
        edit(&mut value);
        match self.form.set_value(id, value) {
            Ok(()) => EventResult::Continue,
            Err(e) => {
                self.feedback.set_error(e.to_string());
                EventResult::Continue
            }
        }
    }

    fn submit(&mut self) {
        match FunkCommand::from_form(&self.form, &self.config.form.job_name) {
            Ok(command) => {
                self.feedback.clear_error();
                if self.config.behavior.confirm_submit {
                    self.modal = ModalState::Confirm { command };
                } else {
                    self.finish(command);
                }
            }
            Err(e) => self.feedback.set_error(e.to_string()),
        }
    }

    fn finish(&mut self, command: FunkCommand) {
        tracing::info!(command = %command, "selection confirmed");
        self.outcome = Some(command);
        self.running = false;
    }

    fn yank_command(&mut self, command: &FunkCommand) {
        if !self.config.behavior.copy_to_clipboard {
            self.feedback
                .set_toast(Toast::failure("Clipboard disabled in config".to_string()));
            return;
        }
        let line = command.to_command_line();
        self.feedback.set_toast(match copy_to_clipboard(&line) {
            Ok(()) => Toast::success("Copied command line".to_string()),
            Err(e) => {
                tracing::debug!(error = %e, "clipboard unavailable");
                Toast::failure("Failed to copy (no clipboard)".to_string())
            }
        });
    }

    /// Get the current error message if it should be shown
    #[must_use]
    pub fn current_error(&self) -> Option<&str> {
        self.feedback.current_error()
    }
}

fn copy_to_clipboard(text: &str) -> Result<(), arboard::Error> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::test_support::small_form;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

    fn app(mode: Mode) -> App {
        let mut config = FunkConfig::default();
        config.behavior.copy_to_clipboard = false;
        App::new(small_form(mode), config, vec![])
    }

    fn press(app: &mut App, code: KeyCode) -> EventResult {
        app.handle_input(InputEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn select(app: &mut App, id: ControlId) {
        app.list.selected = app
            .rows
            .iter()
            .position(|r| *r == FormRow::Control(id))
            .unwrap();
    }

    #[test]
    fn test_rows_cover_form() {
        let app = app(Mode::Date);
        // mode + grid + 2 sites + 3 clusters + 3 time controls + 5 options
        assert_eq!(app.rows.len(), 1 + 1 + 2 + 3 + 3 + 5);
        assert_eq!(app.rows[0], FormRow::Mode);
        assert_eq!(app.rows[1], FormRow::Control(ControlId::Grid));
        assert_eq!(app.rows[9], FormRow::Control(ControlId::EndDate));
        assert_eq!(
            *app.rows.last().unwrap(),
            FormRow::Control(ControlId::Autoreservation)
        );
    }

    #[test]
    fn test_space_on_grid_runs_cascade() {
        let mut app = app(Mode::Date);
        select(&mut app, ControlId::Grid);
        press(&mut app, KeyCode::Char(' '));

        assert!(app.form.grid().checked);
        assert!(app.form.sites().iter().all(|s| s.control.checked && s.control.disabled));
        assert!(
            app.form
                .sites()
                .iter()
                .flat_map(|s| &s.clusters)
                .all(|c| c.checked && c.disabled)
        );
    }

    #[test]
    fn test_space_on_locked_control_shows_toast() {
        let mut app = app(Mode::Date);
        select(&mut app, ControlId::Grid);
        press(&mut app, KeyCode::Char(' '));

        select(&mut app, ControlId::Site(1));
        press(&mut app, KeyCode::Char(' '));

        assert!(app.form.sites()[1].control.checked);
        let toast = app.feedback.current_toast().unwrap();
        assert!(!toast.success);
        assert!(toast.message.contains("rennes"));
    }

    #[test]
    fn test_mode_keys() {
        let mut app = app(Mode::Date);
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.form.mode(), &Mode::Free);
        assert!(!app.form.grid().is_checkbox());

        press(&mut app, KeyCode::Char('m'));
        assert_eq!(app.form.mode(), &Mode::Max);

        // space on the mode row cycles as well
        app.list.move_to_top();
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.form.mode(), &Mode::Date);
        assert!(app.form.end_date_picker().disabled);

        assert_eq!(press(&mut app, KeyCode::Char('3')), EventResult::Continue);
        assert_eq!(app.form.mode(), &Mode::Max);
    }

    #[test]
    fn test_editing_free_mode_counts() {
        let mut app = app(Mode::Free);
        select(&mut app, ControlId::Site(1));
        assert!(app.is_editing());

        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.form.sites()[1].control.value, "12");

        // 'q' is text while editing, so the app keeps running
        press(&mut app, KeyCode::Char('q'));
        assert!(app.running);
        assert_eq!(app.form.sites()[1].control.value, "12q");
    }

    #[test]
    fn test_kavlan_stays_a_checkbox_in_free_mode() {
        let mut app = app(Mode::Free);
        select(&mut app, ControlId::Kavlan);
        assert!(!app.is_editing());
        press(&mut app, KeyCode::Char(' '));
        assert!(app.form.kavlan().checked);

        select(&mut app, ControlId::Subnet);
        assert!(app.is_editing());
        for c in "slash_22=1".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.form.subnet().value, "slash_22=1");

        select(&mut app, ControlId::Grid);
        press(&mut app, KeyCode::Char('8'));
        app.config.behavior.confirm_submit = false;
        assert_eq!(press(&mut app, KeyCode::Enter), EventResult::Quit);
        let outcome = app.outcome.unwrap();
        assert!(outcome.kavlan);
        assert_eq!(outcome.subnet.as_deref(), Some("slash_22=1"));
        assert_eq!(outcome.resources.to_string(), "grid5000:8");
    }

    #[test]
    fn test_locked_end_date_is_not_editable() {
        let mut app = app(Mode::Date);
        select(&mut app, ControlId::EndDate);
        assert!(!app.is_editing());

        app.handle_action(KeyAction::EditChar('1'));
        assert!(app.current_error().is_some());
    }

    #[test]
    fn test_submit_without_selection_reports_error() {
        let mut app = app(Mode::Date);
        press(&mut app, KeyCode::Enter);
        assert!(app.running);
        assert!(app.current_error().unwrap().contains("No resources"));
        assert!(!app.modal.is_active());
    }

    #[test]
    fn test_submit_confirm_flow() {
        let mut app = app(Mode::Date);
        select(&mut app, ControlId::Site(1));
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Enter);

        let ModalState::Confirm { command } = &app.modal else {
            panic!("expected the confirmation dialog");
        };
        assert_eq!(command.resources.to_string(), "rennes");

        // escape goes back to the form
        press(&mut app, KeyCode::Esc);
        assert!(!app.modal.is_active());
        assert!(app.running);

        press(&mut app, KeyCode::Enter);
        assert_eq!(press(&mut app, KeyCode::Enter), EventResult::Quit);
        assert!(!app.running);
        assert_eq!(app.outcome.as_ref().unwrap().resources.to_string(), "rennes");
    }

    #[test]
    fn test_submit_without_confirmation() {
        let mut app = app(Mode::Max);
        app.config.behavior.confirm_submit = false;
        select(&mut app, ControlId::Grid);
        press(&mut app, KeyCode::Char('x'));

        assert_eq!(press(&mut app, KeyCode::Enter), EventResult::Quit);
        let outcome = app.outcome.unwrap();
        assert_eq!(outcome.mode, Mode::Max);
        assert_eq!(outcome.resources.to_string(), "grid5000");
    }

    #[test]
    fn test_yank_with_clipboard_disabled() {
        let mut app = app(Mode::Date);
        select(&mut app, ControlId::Site(0));
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('y'));
        let toast = app.feedback.current_toast().unwrap();
        assert!(toast.message.contains("disabled"));
    }

    #[test]
    fn test_help_overlay() {
        let mut app = app(Mode::Date);
        press(&mut app, KeyCode::Char('?'));
        assert!(matches!(app.modal, ModalState::Help));
        assert_eq!(press(&mut app, KeyCode::Char('j')), EventResult::Unchanged);
        press(&mut app, KeyCode::Esc);
        assert!(!app.modal.is_active());
    }

    #[test]
    fn test_mouse_click_selects_and_toggles() {
        let mut app = app(Mode::Date);
        app.set_viewport_height(20);
        // Grid is the second row
        let click = MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 4,
            row: CONTENT_TOP + 1,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(app.handle_input(InputEvent::Mouse(click)), EventResult::Continue);
        assert_eq!(app.list.selected, 1);
        assert!(app.form.grid().checked);

        let header = MouseEvent { row: 0, ..click };
        assert_eq!(app.handle_input(InputEvent::Mouse(header)), EventResult::Unchanged);
    }

    #[test]
    fn test_tick_only_redraws_on_expiry() {
        let mut app = app(Mode::Date);
        assert_eq!(app.handle_data(DataEvent::Tick), EventResult::Unchanged);
    }

    #[test]
    fn test_quit() {
        let mut app = app(Mode::Date);
        assert_eq!(press(&mut app, KeyCode::Char('q')), EventResult::Quit);
        assert!(!app.running);
        assert!(app.outcome.is_none());
    }
}
