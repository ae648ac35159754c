//! Terminal User Interface for funk
//!
//! Interactive resource picker built on the selection form:
//! - Mode selector, grid/site/cluster tree and time controls in one list
//! - Dual-channel event architecture (priority input, droppable ticks)
//! - Keyboard and mouse driven, cascade applied on every click

pub mod app;
pub mod event;
pub mod runtime;
pub mod theme;
pub mod ui;

use std::io::{self, IsTerminal, stdout};

use anyhow::{Result, bail};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;

use crate::form::{Form, FunkCommand};
use crate::models::FunkConfig;
use crate::tui::app::App;
use crate::tui::runtime::{create_channels, run_event_loop, spawn_input_task, spawn_tick, TuiRuntime};
use crate::tui::theme::Theme;

/// Terminal capability requirements for TUI mode
#[derive(Debug)]
pub struct TerminalCapabilities {
    pub is_tty: bool,
    pub term_type: String,
    pub supports_alternate_screen: bool,
}

impl TerminalCapabilities {
    /// Detect terminal capabilities
    pub fn detect() -> Self {
        let term_type = std::env::var("TERM").unwrap_or_default();
        Self::from_parts(stdout().is_terminal(), term_type)
    }

    fn from_parts(is_tty: bool, term_type: String) -> Self {
        let supports_alternate_screen = !matches!(term_type.as_str(), "dumb" | "" | "unknown");
        Self {
            is_tty,
            term_type,
            supports_alternate_screen,
        }
    }

    /// Check if terminal is suitable for TUI mode
    pub fn is_suitable(&self) -> bool {
        self.is_tty && self.supports_alternate_screen
    }

    /// Get error message for unsuitable terminal
    pub fn error_message(&self) -> String {
        if !self.is_tty {
            "The picker requires an interactive terminal (stdout is not a TTY).\n\
             Hint: Use 'funk resolve -m <mode> -r <resources>' instead."
                .to_string()
        } else if !self.supports_alternate_screen {
            format!(
                "Terminal type '{}' may not support the picker.\n\
                 Hint: Set TERM to a supported value (e.g., xterm-256color) or use 'funk resolve'.",
                if self.term_type.is_empty() { "(unset)" } else { &self.term_type }
            )
        } else {
            "Unknown terminal capability issue.".to_string()
        }
    }
}

/// Run the picker and return the confirmed command, if any
pub async fn run_tui(
    form: Form,
    config: FunkConfig,
    config_warnings: Vec<String>,
) -> Result<Option<FunkCommand>> {
    let capabilities = TerminalCapabilities::detect();
    if !capabilities.is_suitable() {
        bail!("{}", capabilities.error_message());
    }

    let theme = Theme::from_name(&config.display.theme);
    let mut app = App::new(form, config, config_warnings);

    let mut terminal = setup_terminal()?;

    let (input_tx, input_rx, data_tx, data_rx) = create_channels();

    let mut runtime = TuiRuntime::new();
    runtime.track(spawn_input_task(input_tx, runtime.cancel_token()));
    runtime.track(spawn_tick(data_tx, runtime.cancel_token()));

    let result = run_event_loop(&mut app, input_rx, data_rx, |app| {
        terminal.draw(|frame| ui::render(app, &theme, frame))?;
        Ok(())
    })
    .await;

    runtime.shutdown().await;

    restore_terminal(&mut terminal)?;

    result.map(|()| app.outcome)
}

/// Setup the terminal for TUI mode
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the picker with the tokio runtime (entry point from main)
pub fn run(
    form: Form,
    config: FunkConfig,
    config_warnings: Vec<String>,
) -> Result<Option<FunkCommand>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_tui(form, config, config_warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities() {
        assert!(TerminalCapabilities::from_parts(true, "xterm-256color".to_string()).is_suitable());

        let dumb = TerminalCapabilities::from_parts(true, "dumb".to_string());
        assert!(!dumb.is_suitable());
        assert!(dumb.error_message().contains("dumb"));

        let piped = TerminalCapabilities::from_parts(false, "xterm".to_string());
        assert!(piped.error_message().contains("not a TTY"));
    }
}
