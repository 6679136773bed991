//! Actor Model: Message-passing concurrency for the dashboard.
//!
//! This module implements a small actor system using crossbeam channels:
//! - **Input Actor**: Polls terminal events, forwards resize and Ctrl-C
//! - **Redraw Scheduler**: Depth-one request line, merges bursts
//! - **Event Loop**: Owns the terminal, the only place draws happen
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   begin/end    ┌──────────────┐
//! │ Hook callers │ ─────────────▶ │  Aggregator  │
//! │  (N threads) │                └──────────────┘
//! └──────────────┘                       ▲ snapshot
//!        │ request()                     │
//!        ▼                        ┌──────────────┐
//! ┌──────────────┐   ()  (cap 1)  │              │
//! │  Scheduler   │ ─────────────▶ │  Event Loop  │ ──▶ terminal
//! └──────────────┘                │              │
//! ┌──────────────┐   InputEvent   │              │
//! │ Input Thread │ ─────────────▶ │              │
//! └──────────────┘                └──────────────┘
//! ```

mod event_loop;
mod input;
mod messages;
mod scheduler;

pub use event_loop::{EventLoopHandle, Shared};
pub use input::InputActor;
pub use messages::{InputEvent, LoopStats};
pub use scheduler::{redraw_channel, RedrawHandle, RedrawScheduler};
