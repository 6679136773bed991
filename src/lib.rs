//! # Applyboard
//!
//! A live terminal dashboard for infrastructure apply runs.
//!
//! An orchestration engine applies many resource changes in parallel and
//! reports each one through a [`Hook`]. Applyboard collects those reports
//! into three panels (active, completed, errored) and keeps them on screen
//! while the run progresses, under any amount of concurrent callers and
//! terminal resizes.
//!
//! ## Core Concepts
//!
//! - **Aggregator**: one mutex-guarded partition of ids; reads are sorted snapshots
//! - **Coalescing redraws**: a depth-one request line merges update bursts
//! - **Actor model**: a dedicated event loop thread is the only place draws happen
//! - **Swappable terminal**: the backend is passed in, so tests render headless
//!
//! ## Example
//!
//! ```rust,ignore
//! use applyboard::{DashboardConfig, FancyHook, HeadlessTerminal, Hook, UiHook};
//! use applyboard::{InstanceDiff, InstanceInfo, PostApply, PreApply};
//!
//! let mut hook = FancyHook::new(HeadlessTerminal::new(80, 24), DashboardConfig::default());
//! hook.init()?;
//!
//! let info = InstanceInfo::new("aws_instance.web");
//! let diff = InstanceDiff::default();
//! hook.pre_apply(&PreApply { info: &info, state: None, diff: &diff })?;
//! hook.post_apply(&PostApply { info: &info, state: None, error: None })?;
//!
//! hook.close()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod config;
pub mod display;
pub mod error;
pub mod hook;
pub mod state;
pub mod terminal;

// Re-exports for convenience
pub use actor::{InputEvent, LoopStats};
pub use config::{DashboardConfig, PanelTheme, PanelTitles};
pub use display::{Display, PanelGeometry};
pub use error::{Error, Result};
pub use hook::{
    open_ui_hook, ApplyError, FancyHook, Hook, HookAction, InstanceDiff, InstanceInfo,
    InstanceState, NilHook, PlainHook, PostApply, PreApply, PreDiff, PreProvision, PreRefresh,
    ProvisionOutput, UiHook,
};
pub use state::{OperationKind, Phase, Snapshot, StateAggregator};
pub use terminal::{CrosstermTerminal, HeadlessProbe, HeadlessTerminal, TerminalBackend};
