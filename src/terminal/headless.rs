//! In-memory terminal for tests and CI rendering.
//!
//! [`HeadlessTerminal`] draws into ratatui's `TestBackend`. A cloneable
//! [`HeadlessProbe`] stays with the caller and observes what the event loop
//! does with it: frames, draw count, acquire/release count. It can also
//! inject resize and interrupt events as if the terminal produced them.

use super::TerminalBackend;
use crate::actor::{InputActor, InputEvent};
use crate::error::{Error, Result};
use crossbeam_channel::Sender;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::Terminal;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct ProbeState {
    frame: Option<Vec<String>>,
    draws: u64,
    acquires: u64,
    releases: u64,
    events: Option<Sender<InputEvent>>,
}

#[derive(Debug, Default)]
struct ProbeShared {
    state: Mutex<ProbeState>,
    changed: Condvar,
}

/// Observer handle for a [`HeadlessTerminal`].
#[derive(Debug, Clone, Default)]
pub struct HeadlessProbe {
    shared: Arc<ProbeShared>,
}

impl HeadlessProbe {
    fn lock(&self) -> MutexGuard<'_, ProbeState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn update(&self, f: impl FnOnce(&mut ProbeState)) {
        f(&mut self.lock());
        self.shared.changed.notify_all();
    }

    /// Number of completed draws.
    pub fn draws(&self) -> u64 {
        self.lock().draws
    }

    /// Number of successful acquisitions.
    pub fn acquires(&self) -> u64 {
        self.lock().acquires
    }

    /// Number of releases.
    pub fn releases(&self) -> u64 {
        self.lock().releases
    }

    /// Rows of the most recently drawn frame.
    pub fn frame(&self) -> Option<Vec<String>> {
        self.lock().frame.clone()
    }

    /// The most recent frame as one newline-joined string.
    pub fn frame_text(&self) -> String {
        self.frame().map(|rows| rows.join("\n")).unwrap_or_default()
    }

    /// Deliver an event as if the terminal produced it.
    ///
    /// Returns `false` if no event loop is listening.
    pub fn send(&self, event: InputEvent) -> bool {
        let events = self.lock().events.clone();
        events.is_some_and(|tx| tx.send(event).is_ok())
    }

    /// Simulate a terminal resize.
    pub fn resize(&self, width: u16, height: u16) -> bool {
        self.send(InputEvent::Resize { width, height })
    }

    /// Block until `done` holds for the probe state or `timeout` elapses.
    fn wait(&self, timeout: Duration, done: impl Fn(&ProbeState) -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock();
        while !done(&state) {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            state = match self.shared.changed.wait_timeout(state, deadline - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
        true
    }

    /// Wait until at least `count` draws have completed.
    pub fn wait_for_draws(&self, count: u64, timeout: Duration) -> bool {
        self.wait(timeout, |state| state.draws >= count)
    }

    /// Wait until the latest frame satisfies `matches`.
    pub fn wait_for_frame(&self, timeout: Duration, matches: impl Fn(&[String]) -> bool) -> bool {
        self.wait(timeout, |state| state.frame.as_deref().is_some_and(&matches))
    }

    /// Wait until the latest frame contains `needle`.
    pub fn wait_for_text(&self, needle: &str, timeout: Duration) -> bool {
        self.wait_for_frame(timeout, |rows| rows.iter().any(|row| row.contains(needle)))
    }
}

/// A terminal that renders into memory.
#[derive(Debug)]
pub struct HeadlessTerminal {
    width: u16,
    height: u16,
    available: bool,
    probe: HeadlessProbe,
}

impl HeadlessTerminal {
    /// A `width` x `height` in-memory terminal.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            available: true,
            probe: HeadlessProbe::default(),
        }
    }

    /// A terminal whose acquisition always fails, like a non-TTY stdout.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new(0, 0)
        }
    }

    /// Observer for this terminal. Take it before handing the terminal off.
    pub fn probe(&self) -> HeadlessProbe {
        self.probe.clone()
    }
}

/// Text rows of a rendered buffer.
pub(crate) fn buffer_rows(buffer: &Buffer) -> Vec<String> {
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .map(|x| buffer[(x, y)].symbol())
                .collect()
        })
        .collect()
}

impl TerminalBackend for HeadlessTerminal {
    type Backend = TestBackend;

    fn acquire(&mut self) -> Result<Terminal<Self::Backend>> {
        if !self.available {
            return Err(Error::NotATerminal);
        }
        let terminal = Terminal::new(TestBackend::new(self.width, self.height))?;
        self.probe.update(|state| state.acquires += 1);
        Ok(terminal)
    }

    fn release(&mut self, _terminal: &mut Terminal<Self::Backend>) -> Result<()> {
        self.probe.update(|state| {
            state.releases += 1;
            state.events = None;
        });
        Ok(())
    }

    fn spawn_input(
        &mut self,
        events: Sender<InputEvent>,
        _poll_timeout: Duration,
    ) -> Result<Option<InputActor>> {
        self.probe.update(|state| state.events = Some(events));
        Ok(None)
    }

    fn resize(
        &mut self,
        terminal: &mut Terminal<Self::Backend>,
        width: u16,
        height: u16,
    ) -> Result<()> {
        self.width = width;
        self.height = height;
        terminal.backend_mut().resize(width, height);
        Ok(())
    }

    fn presented(&mut self, terminal: &Terminal<Self::Backend>) {
        let rows = buffer_rows(terminal.backend().buffer());
        self.probe.update(|state| {
            state.frame = Some(rows);
            state.draws += 1;
        });
    }
}
