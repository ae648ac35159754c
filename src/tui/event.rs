//! Event types for the TUI
//!
//! Two channels feed the event loop:
//! - InputEvent: user input (never dropped)
//! - DataEvent: timer ticks (may be dropped under load)

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};

/// Input events from the terminal (priority channel - never dropped)
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Keyboard input
    Key(KeyEvent),
    /// Mouse input
    Mouse(MouseEvent),
    /// Terminal resize
    Resize(u16, u16),
}

/// Timer events (data channel - may be dropped under load)
#[derive(Debug)]
pub enum DataEvent {
    /// Periodic tick used to expire toasts
    Tick,
}

/// Result of processing an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Continue running, UI needs redraw
    Continue,
    /// Continue running, no UI change needed
    Unchanged,
    /// Quit the application
    Quit,
}

/// Key action mappings for the TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    // Navigation
    MoveUp,
    MoveDown,
    MoveToTop,
    MoveToBottom,
    PageUp,
    PageDown,

    // Form
    Toggle,
    CycleMode,
    SelectMode(usize),
    Submit,
    Yank,

    // UI
    ShowHelp,
    Escape,
    Quit,

    // Text entry (focused control renders as text)
    EditChar(char),
    EditBackspace,
    EditClear,

    // Mouse actions
    MouseClick { row: u16, column: u16 },
    MouseScrollUp,
    MouseScrollDown,

    // Unknown/unhandled
    Unknown,
}

impl KeyAction {
    /// Map a mouse event to an action
    pub fn from_mouse_event(event: MouseEvent) -> Self {
        use crossterm::event::{MouseButton, MouseEventKind};

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => KeyAction::MouseClick {
                row: event.row,
                column: event.column,
            },
            MouseEventKind::ScrollUp => KeyAction::MouseScrollUp,
            MouseEventKind::ScrollDown => KeyAction::MouseScrollDown,
            _ => KeyAction::Unknown,
        }
    }

    /// Map a key event to an action.
    ///
    /// While a text control has focus, printable characters are typed into
    /// it instead of being treated as shortcuts.
    pub fn from_key_event(event: KeyEvent, editing: bool) -> Self {
        let KeyEvent {
            code, modifiers, ..
        } = event;

        if editing {
            return match code {
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
                KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
                    KeyAction::EditClear
                }
                KeyCode::Esc => KeyAction::Escape,
                KeyCode::Enter => KeyAction::Submit,
                KeyCode::Up => KeyAction::MoveUp,
                KeyCode::Down => KeyAction::MoveDown,
                KeyCode::Tab => KeyAction::CycleMode,
                KeyCode::F(1) => KeyAction::ShowHelp,
                KeyCode::Backspace => KeyAction::EditBackspace,
                KeyCode::Char(c) => KeyAction::EditChar(c),
                _ => KeyAction::Unknown,
            };
        }

        match code {
            // Quit
            KeyCode::Char('q') => KeyAction::Quit,

            // Ctrl+ combinations must come before bare character matches
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
            KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => KeyAction::PageDown,
            KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => KeyAction::PageUp,

            // Navigation
            KeyCode::Char('j') | KeyCode::Down => KeyAction::MoveDown,
            KeyCode::Char('k') | KeyCode::Up => KeyAction::MoveUp,
            KeyCode::Char('g') | KeyCode::Home => KeyAction::MoveToTop,
            KeyCode::Char('G') | KeyCode::End => KeyAction::MoveToBottom,
            KeyCode::PageDown => KeyAction::PageDown,
            KeyCode::PageUp => KeyAction::PageUp,

            // Form
            KeyCode::Char(' ') | KeyCode::Char('x') => KeyAction::Toggle,
            KeyCode::Char('m') | KeyCode::Tab => KeyAction::CycleMode,
            KeyCode::Char(c @ '1'..='3') => KeyAction::SelectMode(c as usize - '1' as usize),
            KeyCode::Enter => KeyAction::Submit,
            KeyCode::Char('y') => KeyAction::Yank,

            // Help
            KeyCode::Char('?') | KeyCode::F(1) => KeyAction::ShowHelp,
            KeyCode::Esc => KeyAction::Escape,

            _ => KeyAction::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_action_quit() {
        let event = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(KeyAction::from_key_event(event, false), KeyAction::Quit);
    }

    #[test]
    fn test_key_action_navigation() {
        let event = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        assert_eq!(KeyAction::from_key_event(event, false), KeyAction::MoveDown);

        let event = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::NONE);
        assert_eq!(KeyAction::from_key_event(event, false), KeyAction::MoveUp);
    }

    #[test]
    fn test_key_action_mode_selection() {
        let event = KeyEvent::new(KeyCode::Char('2'), KeyModifiers::NONE);
        assert_eq!(KeyAction::from_key_event(event, false), KeyAction::SelectMode(1));

        let event = KeyEvent::new(KeyCode::Char('m'), KeyModifiers::NONE);
        assert_eq!(KeyAction::from_key_event(event, false), KeyAction::CycleMode);
    }

    #[test]
    fn test_editing_types_characters() {
        // In editing mode, shortcuts become text
        for c in ['q', 'j', '2', ':'] {
            let event = KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
            assert_eq!(KeyAction::from_key_event(event, true), KeyAction::EditChar(c));
        }

        let event = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(KeyAction::from_key_event(event, true), KeyAction::Quit);
    }

    #[test]
    fn test_editing_ctrl_u() {
        // In editing mode, Ctrl+U clears input
        let event = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(KeyAction::from_key_event(event, true), KeyAction::EditClear);

        // In normal mode, Ctrl+U is page up
        assert_eq!(KeyAction::from_key_event(event, false), KeyAction::PageUp);
    }
}
