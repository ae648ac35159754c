//! Application state types for the TUI
//!
//! - Selection and navigation state (ListState)
//! - Modal states (Help, Confirm)
//! - Feedback state for errors, toasts and config warnings

use std::time::{Duration, Instant};

use crate::form::{ControlId, FunkCommand};

// ============================================================================
// Rows
// ============================================================================

/// One line of the form list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormRow {
    /// The mode selector
    Mode,
    Control(ControlId),
}

impl FormRow {
    #[must_use]
    pub fn control_id(self) -> Option<ControlId> {
        match self {
            FormRow::Mode => None,
            FormRow::Control(id) => Some(id),
        }
    }
}

// ============================================================================
// Toast Feedback
// ============================================================================

/// Short-lived notification (clipboard result, locked control, ...)
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub success: bool,
    pub timestamp: Instant,
}

impl Toast {
    pub fn success(message: String) -> Self {
        Self {
            message,
            success: true,
            timestamp: Instant::now(),
        }
    }

    pub fn failure(message: String) -> Self {
        Self {
            message,
            success: false,
            timestamp: Instant::now(),
        }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.timestamp.elapsed() < Duration::from_secs(2)
    }
}

// ============================================================================
// List Navigation State
// ============================================================================

/// List state with selection and scroll tracking
#[derive(Debug, Clone, Default)]
pub struct ListState {
    pub selected: usize,
    pub scroll_offset: usize,
    pub visible_count: usize,
}

impl ListState {
    pub fn clamp(&mut self, list_len: usize) {
        if list_len == 0 {
            self.selected = 0;
            self.scroll_offset = 0;
        } else {
            self.selected = self.selected.min(list_len - 1);
            if self.selected < self.scroll_offset {
                self.scroll_offset = self.selected;
            } else if self.visible_count > 0
                && self.selected >= self.scroll_offset + self.visible_count
            {
                self.scroll_offset = self.selected.saturating_sub(self.visible_count - 1);
            }
        }
    }

    pub fn move_up(&mut self, list_len: usize) {
        if self.selected > 0 {
            self.selected -= 1;
            self.clamp(list_len);
        }
    }

    pub fn move_down(&mut self, list_len: usize) {
        if list_len > 0 && self.selected < list_len - 1 {
            self.selected += 1;
            self.clamp(list_len);
        }
    }

    pub fn move_to_top(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    pub fn move_to_bottom(&mut self, list_len: usize) {
        if list_len > 0 {
            self.selected = list_len - 1;
            if self.visible_count > 0 {
                self.scroll_offset = list_len.saturating_sub(self.visible_count);
            }
        }
    }

    pub fn page_up(&mut self, list_len: usize) {
        let jump = self.visible_count.max(1) / 2;
        self.selected = self.selected.saturating_sub(jump);
        self.clamp(list_len);
    }

    pub fn page_down(&mut self, list_len: usize) {
        let jump = self.visible_count.max(1) / 2;
        self.selected = self.selected.saturating_add(jump);
        self.clamp(list_len);
    }

    /// Select the row shown at `line` (0-based within the visible window)
    pub fn select_visible_line(&mut self, line: usize, list_len: usize) -> bool {
        let target = self.scroll_offset + line;
        if target < list_len {
            self.selected = target;
            self.clamp(list_len);
            true
        } else {
            false
        }
    }
}

// ============================================================================
// Modal State
// ============================================================================

#[derive(Debug, Default)]
pub enum ModalState {
    #[default]
    None,
    Help,
    /// Composed command waiting for confirmation
    Confirm {
        command: FunkCommand,
    },
}

impl ModalState {
    /// Check if any modal is currently active
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, ModalState::None)
    }

    /// Get the pending command if in confirm mode
    #[must_use]
    pub fn pending_command(&self) -> Option<&FunkCommand> {
        match self {
            ModalState::Confirm { command } => Some(command),
            _ => None,
        }
    }
}

// ============================================================================
// Feedback State
// ============================================================================

/// Unified feedback: errors, toasts and config warnings
#[derive(Debug)]
pub struct FeedbackState {
    last_error: Option<(String, Instant)>,
    error_display_duration: Duration,
    pub config_warnings: Vec<String>,
    toast: Option<Toast>,
}

impl FeedbackState {
    /// Create a new FeedbackState with config warnings
    pub fn new(config_warnings: Vec<String>) -> Self {
        Self {
            last_error: None,
            error_display_duration: Duration::from_secs(5),
            config_warnings,
            toast: None,
        }
    }

    /// Set an error message to display
    pub fn set_error(&mut self, msg: String) {
        tracing::debug!(error = %msg, "feedback error");
        self.last_error = Some((msg, Instant::now()));
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Get the current error message if it should be shown
    #[must_use]
    pub fn current_error(&self) -> Option<&str> {
        self.last_error
            .as_ref()
            .filter(|(_, t)| t.elapsed() < self.error_display_duration)
            .map(|(msg, _)| msg.as_str())
    }

    pub fn set_toast(&mut self, toast: Toast) {
        self.toast = Some(toast);
    }

    /// Get current toast if visible
    #[must_use]
    pub fn current_toast(&self) -> Option<&Toast> {
        self.toast.as_ref().filter(|t| t.is_visible())
    }

    /// Drop expired toasts and errors. Returns true if anything was removed.
    pub fn expire(&mut self) -> bool {
        let mut changed = false;
        if self.toast.as_ref().is_some_and(|t| !t.is_visible()) {
            self.toast = None;
            changed = true;
        }
        if self.last_error.is_some() && self.current_error().is_none() {
            self.last_error = None;
            changed = true;
        }
        changed
    }
}
