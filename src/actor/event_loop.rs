//! Event Loop: the single thread that draws.
//!
//! The loop owns the terminal and the display. It waits on three sources:
//!
//! - shutdown (the handle was shut down or dropped)
//! - a pending redraw request from the scheduler
//! - terminal events from the input actor (resize, Ctrl-C)
//!
//! A redraw takes one snapshot from the aggregator, pushes it into the
//! panels, and issues one draw call. Since only this thread draws, draws
//! are serialized without a lock around the terminal. The aggregator lock
//! is released before the draw starts.

use super::input::InputActor;
use super::messages::{InputEvent, LoopStats};
use super::scheduler::{RedrawHandle, RedrawScheduler};
use crate::config::DashboardConfig;
use crate::display::Display;
use crate::error::{Error, Result};
use crate::state::StateAggregator;
use crate::terminal::TerminalBackend;
use crossbeam_channel::{bounded, never, select, Receiver, Sender, TryRecvError};
use ratatui::Terminal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, warn};

const THREAD_NAME: &str = "applyboard-render";

/// Capacity of the terminal event channel.
const INPUT_CAPACITY: usize = 64;

/// State shared between hook callers and the event loop.
#[derive(Debug, Clone)]
pub struct Shared {
    /// Operation partition.
    pub state: Arc<StateAggregator>,
    /// Redraw request line.
    pub redraw: RedrawHandle,
    /// Set when the user pressed Ctrl-C.
    pub interrupted: Arc<AtomicBool>,
}

/// The render thread's state.
struct EventLoop<T: TerminalBackend> {
    terminal: T,
    display: Display<T::Backend>,
    shared: Shared,
    scheduler: RedrawScheduler,
    input_actor: Option<InputActor>,
    stats: LoopStats,
    released: bool,
}

/// Handle to a running event loop.
#[derive(Debug)]
pub struct EventLoopHandle {
    handle: Option<JoinHandle<Result<LoopStats>>>,
    shutdown: Option<Sender<()>>,
}

impl EventLoopHandle {
    /// Start the event loop on an already acquired terminal.
    ///
    /// On failure the terminal is released and the input actor stopped
    /// before returning.
    pub fn spawn<T: TerminalBackend>(
        mut terminal: T,
        mut tty: Terminal<T::Backend>,
        config: &DashboardConfig,
        shared: Shared,
        scheduler: RedrawScheduler,
    ) -> Result<Self> {
        let (input_tx, input_rx) = bounded(INPUT_CAPACITY);
        let input_actor = match terminal.spawn_input(input_tx, config.input_poll_timeout) {
            Ok(actor) => actor,
            Err(err) => {
                let _ = terminal.release(&mut tty);
                return Err(err);
            }
        };

        let (shutdown_tx, shutdown_rx) = bounded(1);
        let event_loop = EventLoop::new(terminal, tty, config, shared, scheduler, input_actor);

        // If the spawn fails the closure is dropped, and the loop's Drop
        // tears it down.
        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || event_loop.run(&shutdown_rx, input_rx))
            .map_err(|source| Error::Spawn {
                name: THREAD_NAME,
                source,
            })?;

        Ok(Self {
            handle: Some(handle),
            shutdown: Some(shutdown_tx),
        })
    }

    /// Whether the loop thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stop the loop, wait for it to release the terminal, and return its
    /// counters.
    pub fn shutdown(mut self) -> Result<LoopStats> {
        self.stop()
    }

    fn stop(&mut self) -> Result<LoopStats> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.try_send(());
        }
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| Error::EventLoopPanicked)?,
            None => Err(Error::NotRunning),
        }
    }
}

impl Drop for EventLoopHandle {
    fn drop(&mut self) {
        if self.handle.is_some() {
            if let Err(err) = self.stop() {
                warn!(error = %err, "event loop exited with an error");
            }
        }
    }
}

fn is_signaled(shutdown: &Receiver<()>) -> bool {
    !matches!(shutdown.try_recv(), Err(TryRecvError::Empty))
}

impl<T: TerminalBackend> EventLoop<T> {
    fn new(
        terminal: T,
        tty: Terminal<T::Backend>,
        config: &DashboardConfig,
        shared: Shared,
        scheduler: RedrawScheduler,
        input_actor: Option<InputActor>,
    ) -> Self {
        Self {
            terminal,
            display: Display::new(tty, config),
            shared,
            scheduler,
            input_actor,
            stats: LoopStats::default(),
            released: false,
        }
    }

    fn run(mut self, shutdown: &Receiver<()>, input: Receiver<InputEvent>) -> Result<LoopStats> {
        let result = self.serve(shutdown, input);
        if let Err(err) = &result {
            error!(error = %err, "event loop stopped");
        }
        let released = self.teardown();

        self.stats.redraw_requests = self.scheduler.requested();
        self.stats.coalesced = self.scheduler.coalesced();
        debug!(stats = ?self.stats, "event loop finished");

        let stats = self.stats;
        result.and(released).map(|()| stats)
    }

    fn serve(&mut self, shutdown: &Receiver<()>, mut input: Receiver<InputEvent>) -> Result<()> {
        let (width, height) = self.display.size()?;
        self.display.recalc_geometry(width, height);
        self.shared.redraw.request();

        let requests = self.scheduler.receiver().clone();
        loop {
            if is_signaled(shutdown) {
                return Ok(());
            }

            let mut input_closed = false;
            select! {
                recv(shutdown) -> _ => return Ok(()),
                recv(requests) -> msg => {
                    if msg.is_ok() && !is_signaled(shutdown) {
                        self.redraw()?;
                    }
                }
                recv(input) -> event => match event {
                    Ok(InputEvent::Shutdown) | Err(_) => input_closed = true,
                    Ok(event) => self.handle_input(event)?,
                }
            }

            if input_closed {
                debug!("input source closed");
                input = never();
            }
        }
    }

    fn redraw(&mut self) -> Result<()> {
        // The snapshot below covers anything requested up to this point.
        self.scheduler.take_pending();
        let snapshot = self.shared.state.snapshot();
        self.display.apply_snapshot(snapshot);
        self.display.draw()?;
        self.terminal.presented(self.display.terminal());
        self.stats.draws += 1;
        Ok(())
    }

    fn handle_input(&mut self, event: InputEvent) -> Result<()> {
        match event {
            InputEvent::Resize { width, height } => {
                debug!(width, height, "terminal resized");
                self.terminal
                    .resize(self.display.terminal_mut(), width, height)?;
                self.display.recalc_geometry(width, height);
                self.stats.resizes += 1;
                self.shared.redraw.request();
            }
            InputEvent::Interrupt => {
                warn!("interrupt requested from the dashboard");
                self.shared.interrupted.store(true, Ordering::Release);
            }
            InputEvent::Error(message) => {
                warn!(%message, "terminal input error");
            }
            InputEvent::Shutdown => {}
        }
        Ok(())
    }

    /// Stop the input actor and release the terminal. Runs once.
    fn teardown(&mut self) -> Result<()> {
        if let Some(actor) = self.input_actor.take() {
            actor.join();
        }
        if self.released {
            return Ok(());
        }
        self.released = true;
        self.terminal.release(self.display.terminal_mut())
    }
}

impl<T: TerminalBackend> Drop for EventLoop<T> {
    fn drop(&mut self) {
        if let Err(err) = self.teardown() {
            warn!(error = %err, "failed to release terminal");
        }
    }
}
