//! Real terminal backed by crossterm.

use super::TerminalBackend;
use crate::actor::{InputActor, InputEvent};
use crate::error::{Error, Result};
use crossbeam_channel::Sender;
use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, IsTerminal, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, warn};

/// Set while some session has raw mode on. Raw mode is process-wide.
static CLAIMED: AtomicBool = AtomicBool::new(false);

/// The process's controlling terminal, driven through stdout.
#[derive(Debug)]
pub struct CrosstermTerminal {
    alternate_screen: bool,
    /// Whether this instance holds the claim and has modified terminal state.
    held: bool,
}

impl CrosstermTerminal {
    /// Create an unacquired handle.
    pub const fn new(alternate_screen: bool) -> Self {
        Self {
            alternate_screen,
            held: false,
        }
    }

    fn enter(&self) -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        if self.alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }
        execute!(stdout, cursor::Hide)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.clear()?;
        Ok(terminal)
    }

    /// Restore cooked mode and give up the claim. Idempotent.
    fn restore(&mut self) -> io::Result<()> {
        if !self.held {
            return Ok(());
        }
        self.held = false;

        let mut stdout = io::stdout();
        let _ = execute!(stdout, cursor::Show);
        if self.alternate_screen {
            let _ = execute!(stdout, LeaveAlternateScreen);
        }
        let result = terminal::disable_raw_mode();
        CLAIMED.store(false, Ordering::Release);
        result
    }
}

impl TerminalBackend for CrosstermTerminal {
    type Backend = CrosstermBackend<Stdout>;

    fn acquire(&mut self) -> Result<Terminal<Self::Backend>> {
        if !io::stdout().is_terminal() {
            return Err(Error::NotATerminal);
        }
        if CLAIMED.swap(true, Ordering::AcqRel) {
            return Err(Error::BackendBusy);
        }
        self.held = true;

        match self.enter() {
            Ok(terminal) => {
                debug!(alternate_screen = self.alternate_screen, "terminal acquired");
                Ok(terminal)
            }
            Err(err) => {
                let _ = self.restore();
                Err(Error::Terminal(err))
            }
        }
    }

    fn release(&mut self, terminal: &mut Terminal<Self::Backend>) -> Result<()> {
        let _ = terminal.show_cursor();
        self.restore()?;
        debug!("terminal released");
        Ok(())
    }

    fn spawn_input(
        &mut self,
        events: Sender<InputEvent>,
        poll_timeout: Duration,
    ) -> Result<Option<InputActor>> {
        InputActor::spawn(events, poll_timeout).map(Some)
    }
}

impl Drop for CrosstermTerminal {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            warn!(error = %err, "failed to restore terminal on drop");
        }
    }
}
