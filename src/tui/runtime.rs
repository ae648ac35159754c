//! Async runtime and task management for the TUI
//!
//! This module implements the dual-channel event-driven architecture:
//! - Input channel (priority): User input events that are never dropped
//! - Data channel: Timer ticks that may be dropped under backpressure
//!
//! The main loop uses `tokio::select!` with bias toward the input channel
//! so ticks never delay a keypress.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::tui::app::App;
use crate::tui::event::{DataEvent, EventResult, InputEvent};

/// Channel capacities
const INPUT_CHANNEL_CAPACITY: usize = 16;
const DATA_CHANNEL_CAPACITY: usize = 8;

/// How often toasts and errors are checked for expiry
const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// TUI runtime managing all background tasks
pub struct TuiRuntime {
    cancel_token: CancellationToken,
    task_handles: Vec<JoinHandle<()>>,
}

impl TuiRuntime {
    /// Create a new TUI runtime
    pub fn new() -> Self {
        Self {
            cancel_token: CancellationToken::new(),
            task_handles: Vec::new(),
        }
    }

    /// Get a clone of the cancellation token for spawning tasks
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Add a task handle to track
    pub fn track(&mut self, handle: JoinHandle<()>) {
        self.task_handles.push(handle);
    }

    /// Signal shutdown and wait for tasks to complete
    pub async fn shutdown(self) {
        self.cancel_token.cancel();

        let shutdown = async {
            for handle in self.task_handles {
                let _ = handle.await;
            }
        };

        tokio::select! {
            _ = shutdown => {}
            _ = tokio::time::sleep(Duration::from_secs(2)) => {
                tracing::debug!("background tasks did not stop in time");
            }
        }
    }
}

impl Default for TuiRuntime {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn the input event reader task
pub fn spawn_input_task(tx: mpsc::Sender<InputEvent>, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut reader = EventStream::new();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                maybe_event = reader.next() => {
                    match maybe_event {
                        Some(Ok(event)) => {
                            let input_event = match event {
                                Event::Key(key) => Some(InputEvent::Key(key)),
                                Event::Mouse(mouse) => Some(InputEvent::Mouse(mouse)),
                                Event::Resize(w, h) => Some(InputEvent::Resize(w, h)),
                                _ => None,
                            };

                            if let Some(evt) = input_event
                                && tx.send(evt).await.is_err()
                            {
                                break; // Receiver dropped
                            }
                        }
                        Some(Err(e)) => {
                            let is_fatal = matches!(
                                e.kind(),
                                std::io::ErrorKind::BrokenPipe
                                    | std::io::ErrorKind::ConnectionReset
                                    | std::io::ErrorKind::UnexpectedEof
                            );

                            if is_fatal {
                                tracing::info!("Terminal disconnected: {:?}", e);
                                break;
                            } else {
                                tracing::warn!("Terminal event read error: {:?}", e);
                            }
                        }
                        None => break,
                    }
                }
            }
        }
    })
}

/// Spawn the expiry tick task
pub fn spawn_tick(tx: mpsc::Sender<DataEvent>, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_INTERVAL);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {
                    // A full channel already holds a pending tick
                    let _ = tx.try_send(DataEvent::Tick);
                }
            }
        }
    })
}

/// Run the main TUI event loop until the app stops running
pub async fn run_event_loop(
    app: &mut App,
    mut input_rx: mpsc::Receiver<InputEvent>,
    mut data_rx: mpsc::Receiver<DataEvent>,
    mut render_fn: impl FnMut(&mut App) -> Result<()>,
) -> Result<()> {
    let mut needs_render = true;

    loop {
        if needs_render {
            render_fn(app)?;
            needs_render = false;
        }

        if !app.running {
            break;
        }

        tokio::select! {
            biased;

            Some(input) = input_rx.recv() => {
                match app.handle_input(input) {
                    EventResult::Continue => needs_render = true,
                    EventResult::Unchanged => {}
                    EventResult::Quit => break,
                }
            }

            Some(data) = data_rx.recv() => {
                match app.handle_data(data) {
                    EventResult::Continue => needs_render = true,
                    EventResult::Unchanged => {}
                    EventResult::Quit => break,
                }
            }

            else => break,
        }
    }

    Ok(())
}

/// Create the dual channels for the TUI
pub fn create_channels() -> (
    mpsc::Sender<InputEvent>,
    mpsc::Receiver<InputEvent>,
    mpsc::Sender<DataEvent>,
    mpsc::Receiver<DataEvent>,
) {
    let (input_tx, input_rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
    let (data_tx, data_rx) = mpsc::channel(DATA_CHANNEL_CAPACITY);
    (input_tx, input_rx, data_tx, data_rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::test_support::small_form;
    use crate::models::{FunkConfig, Mode};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[tokio::test]
    async fn test_event_loop_stops_on_quit() {
        let mut app = App::new(small_form(Mode::Date), FunkConfig::default(), vec![]);
        let (input_tx, input_rx, _data_tx, data_rx) = create_channels();

        input_tx.send(key(KeyCode::Down)).await.unwrap();
        input_tx.send(key(KeyCode::Char('q'))).await.unwrap();

        let mut renders = 0;
        run_event_loop(&mut app, input_rx, data_rx, |_| {
            renders += 1;
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(renders, 2);
        assert_eq!(app.list.selected, 1);
        assert!(app.outcome.is_none());
    }

    #[tokio::test]
    async fn test_event_loop_ends_when_channels_close() {
        let mut app = App::new(small_form(Mode::Date), FunkConfig::default(), vec![]);
        let (input_tx, input_rx, data_tx, data_rx) = create_channels();
        drop(input_tx);
        drop(data_tx);

        run_event_loop(&mut app, input_rx, data_rx, |_| Ok(()))
            .await
            .unwrap();
        assert!(app.running);
    }

    #[tokio::test]
    async fn test_runtime_shutdown_stops_tick() {
        let mut runtime = TuiRuntime::new();
        let (_input_tx, _input_rx, data_tx, mut data_rx) = create_channels();
        runtime.track(spawn_tick(data_tx, runtime.cancel_token()));

        assert!(matches!(data_rx.recv().await, Some(DataEvent::Tick)));
        runtime.shutdown().await;
    }
}
