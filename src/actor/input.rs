//! Input Actor: Dedicated thread for polling terminal events.
//!
//! This actor runs in its own thread and uses crossterm's event polling
//! to capture resize events and Ctrl-C without blocking the event loop.
//! Everything else the terminal reports is dropped here.

use super::messages::InputEvent;
use crate::error::{Error, Result};
use crossbeam_channel::Sender;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::warn;

const THREAD_NAME: &str = "applyboard-input";

/// Consecutive poll/read failures before the input thread gives up.
const MAX_CONSECUTIVE_ERRORS: u32 = 16;

/// Input actor that polls terminal events.
#[derive(Debug)]
pub struct InputActor {
    /// Handle to the input thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl InputActor {
    /// Spawn the input actor thread.
    ///
    /// `poll_timeout` bounds how long a shutdown request can go unnoticed.
    pub fn spawn(sender: Sender<InputEvent>, poll_timeout: Duration) -> Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || {
                Self::run_loop(&sender, &shutdown_clone, poll_timeout, poll_terminal);
            })
            .map_err(|source| Error::Spawn {
                name: THREAD_NAME,
                source,
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the input thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the input thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main input polling loop.
    ///
    /// `next_event` waits up to the poll timeout for one terminal event.
    /// After an error the loop sleeps for the poll timeout; after
    /// [`MAX_CONSECUTIVE_ERRORS`] errors in a row it gives up and reports
    /// `Shutdown`.
    fn run_loop<F>(
        sender: &Sender<InputEvent>,
        shutdown: &AtomicBool,
        poll_timeout: Duration,
        mut next_event: F,
    ) where
        F: FnMut(Duration) -> io::Result<Option<Event>>,
    {
        let mut failures = 0;
        loop {
            if shutdown.load(Ordering::Relaxed) {
                let _ = sender.send(InputEvent::Shutdown);
                break;
            }

            match next_event(poll_timeout) {
                Ok(event) => {
                    failures = 0;
                    if let Some(input_event) = event.as_ref().and_then(convert_event) {
                        if sender.send(input_event).is_err() {
                            // Receiver dropped, exit
                            break;
                        }
                    }
                }
                Err(e) => {
                    failures += 1;
                    if sender.send(InputEvent::Error(e.to_string())).is_err() {
                        break;
                    }
                    if failures >= MAX_CONSECUTIVE_ERRORS {
                        warn!(failures, "terminal input keeps failing; stopping input thread");
                        let _ = sender.send(InputEvent::Shutdown);
                        break;
                    }
                    thread::sleep(poll_timeout);
                }
            }
        }
    }
}

/// Poll crossterm for one event.
fn poll_terminal(timeout: Duration) -> io::Result<Option<Event>> {
    if event::poll(timeout)? {
        event::read().map(Some)
    } else {
        Ok(None)
    }
}

/// Convert a crossterm event to our `InputEvent`.
fn convert_event(event: &Event) -> Option<InputEvent> {
    match event {
        Event::Resize(width, height) => Some(InputEvent::Resize {
            width: *width,
            height: *height,
        }),
        Event::Key(key)
            if key.kind == KeyEventKind::Press
                && key.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(key.code, KeyCode::Char('c' | 'C')) =>
        {
            Some(InputEvent::Interrupt)
        }
        _ => None,
    }
}

impl Drop for InputActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
