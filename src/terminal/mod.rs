//! Terminal: exclusive acquisition and release of the drawing surface.
//!
//! A [`TerminalBackend`] is handed to the dashboard at construction and
//! acquired on `init`. From then on the event loop thread owns it: only
//! that thread draws, resizes, or releases it.

mod tty;
mod headless;

pub use tty::CrosstermTerminal;
pub use headless::{HeadlessProbe, HeadlessTerminal};
#[cfg(test)]
pub(crate) use headless::buffer_rows;

use crate::actor::{InputActor, InputEvent};
use crate::error::Result;
use crossbeam_channel::Sender;
use ratatui::backend::Backend;
use ratatui::Terminal;
use std::time::Duration;

/// A source of terminals the dashboard can take exclusive control of.
pub trait TerminalBackend: Send + 'static {
    /// The ratatui backend draws go through.
    type Backend: Backend + Send + 'static;

    /// Take exclusive control of the terminal.
    ///
    /// Fails with a setup error if the terminal is unavailable.
    fn acquire(&mut self) -> Result<Terminal<Self::Backend>>;

    /// Give the terminal back. Called exactly once per successful acquire.
    fn release(&mut self, terminal: &mut Terminal<Self::Backend>) -> Result<()>;

    /// Start delivering terminal events to `events`.
    ///
    /// Returns the actor polling for them, if a thread was spawned.
    fn spawn_input(
        &mut self,
        events: Sender<InputEvent>,
        poll_timeout: Duration,
    ) -> Result<Option<InputActor>>;

    /// Adjust the backend to a new size reported by a resize event.
    fn resize(
        &mut self,
        _terminal: &mut Terminal<Self::Backend>,
        _width: u16,
        _height: u16,
    ) -> Result<()> {
        Ok(())
    }

    /// Called after every completed draw.
    fn presented(&mut self, _terminal: &Terminal<Self::Backend>) {}
}
