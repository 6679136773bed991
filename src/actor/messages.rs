//! Message types for actor communication.

/// Events from the input thread to the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Terminal was resized.
    Resize {
        /// New width in columns.
        width: u16,
        /// New height in rows.
        height: u16,
    },

    /// Ctrl-C was pressed. Raw mode swallows the signal, so it arrives here.
    Interrupt,

    /// Input thread encountered an error.
    Error(String),

    /// Input thread is shutting down.
    Shutdown,
}

/// Counters reported by the event loop when it exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Completed draw calls.
    pub draws: u64,
    /// Resize events handled.
    pub resizes: u64,
    /// Redraw requests issued by callers, including coalesced ones.
    pub redraw_requests: u64,
    /// Redraw requests merged into one already pending.
    pub coalesced: u64,
}
