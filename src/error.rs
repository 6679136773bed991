//! Error types for the dashboard.

use std::io;

/// Everything that can go wrong while setting up, running, or tearing down
/// the dashboard.
///
/// Setup failures (see [`Error::is_setup_failure`]) mean the interactive
/// view is unavailable and the caller should report through a plain text
/// hook instead. The dashboard never reports operation failures through
/// this type: those show up as entries in the errored panel.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Stdout is not attached to a terminal.
    #[error("stdout is not a terminal; use a non-interactive hook instead")]
    NotATerminal,

    /// Another session in this process already owns the terminal.
    #[error("terminal backend is already owned by another dashboard session")]
    BackendBusy,

    /// Raw mode, alternate screen, or a draw call failed.
    #[error("terminal backend failure: {0}")]
    Terminal(#[source] io::Error),

    /// The event loop or input thread could not be spawned.
    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        /// Thread name that failed to start.
        name: &'static str,
        /// The underlying OS error.
        #[source]
        source: io::Error,
    },

    /// `init` was called on a hook that is already running or closed.
    #[error("dashboard hook was already initialized")]
    AlreadyInitialized,

    /// `close` was called on a hook with no running event loop.
    #[error("dashboard hook is not running")]
    NotRunning,

    /// The event loop thread panicked before it could release the terminal.
    #[error("dashboard event loop panicked")]
    EventLoopPanicked,
}

impl Error {
    /// Whether this error means the terminal could not be acquired.
    pub const fn is_setup_failure(&self) -> bool {
        matches!(self, Self::NotATerminal | Self::BackendBusy | Self::Terminal(_))
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Terminal(err)
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
