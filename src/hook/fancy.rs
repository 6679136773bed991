//! Fancy Hook: the live dashboard.
//!
//! Tracks `pre_apply`/`post_apply` in the shared aggregator and asks the
//! event loop for a redraw after each change. Every other callback is
//! delegated to a base hook (by default [`NilHook`]).
//!
//! Callbacks never hold the aggregator lock while requesting a redraw, and
//! requesting a redraw never blocks, so a caller can't deadlock against
//! the event loop taking a snapshot.

use super::{
    Hook, HookAction, NilHook, PostApply, PreApply, PreDiff, PreProvision, PreRefresh,
    ProvisionOutput, UiHook,
};
use crate::actor::{redraw_channel, EventLoopHandle, LoopStats, RedrawScheduler, Shared};
use crate::config::DashboardConfig;
use crate::error::{Error, Result};
use crate::state::{OperationKind, Snapshot, StateAggregator};
use crate::terminal::TerminalBackend;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

enum Lifecycle<T> {
    /// Constructed, terminal not yet acquired.
    Ready {
        terminal: T,
        scheduler: RedrawScheduler,
    },
    /// Event loop running and owning the terminal.
    Running(EventLoopHandle),
    /// Shut down, or failed past the point of recovery.
    Closed,
}

/// Interactive dashboard hook.
///
/// `T` supplies the terminal; `H` receives the callbacks this hook does
/// not handle itself.
pub struct FancyHook<T, H = NilHook> {
    base: H,
    config: DashboardConfig,
    shared: Shared,
    lifecycle: Mutex<Lifecycle<T>>,
}

impl<T: TerminalBackend> FancyHook<T> {
    /// Create a dashboard that will draw on `terminal` once initialized.
    pub fn new(terminal: T, config: DashboardConfig) -> Self {
        Self::with_base(terminal, config, NilHook)
    }
}

impl<T: TerminalBackend, H: Hook> FancyHook<T, H> {
    /// Create a dashboard that forwards unhandled callbacks to `base`.
    pub fn with_base(terminal: T, config: DashboardConfig, base: H) -> Self {
        let (redraw, scheduler) = redraw_channel();
        Self {
            base,
            config,
            shared: Shared {
                state: Arc::new(StateAggregator::new()),
                redraw,
                interrupted: Arc::new(AtomicBool::new(false)),
            },
            lifecycle: Mutex::new(Lifecycle::Ready {
                terminal,
                scheduler,
            }),
        }
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle<T> {
        self.lifecycle
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Stop the event loop, release the terminal, and return the loop's
    /// counters.
    pub fn shutdown(&mut self) -> Result<LoopStats> {
        match std::mem::replace(self.lifecycle_mut(), Lifecycle::Closed) {
            Lifecycle::Running(handle) => {
                let stats = handle.shutdown()?;
                debug!(draws = stats.draws, coalesced = stats.coalesced, "dashboard closed");
                Ok(stats)
            }
            other => {
                *self.lifecycle_mut() = other;
                Err(Error::NotRunning)
            }
        }
    }

    /// Whether the event loop is running.
    pub fn is_running(&self) -> bool {
        let lifecycle = self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner);
        matches!(&*lifecycle, Lifecycle::Running(handle) if !handle.is_finished())
    }

    /// The shared operation state.
    pub fn state(&self) -> &StateAggregator {
        &self.shared.state
    }

    /// A consistent copy of what the dashboard shows.
    pub fn snapshot(&self) -> Snapshot {
        self.shared.state.snapshot()
    }

    /// Whether the user pressed Ctrl-C in the dashboard.
    ///
    /// The hook keeps returning `Continue`; acting on this is up to the
    /// caller.
    pub fn interrupt_requested(&self) -> bool {
        self.shared.interrupted.load(Ordering::Acquire)
    }

    /// The hook receiving delegated callbacks.
    pub const fn base(&self) -> &H {
        &self.base
    }
}

impl<T: TerminalBackend, H: Hook> Hook for FancyHook<T, H> {
    fn pre_apply(&self, ctx: &PreApply<'_>) -> Result<HookAction> {
        let id = ctx.info.human_id();
        let kind = OperationKind::classify(ctx.state, ctx.diff);
        self.shared.state.begin(&id, kind.status_text());
        self.shared.redraw.request();
        Ok(HookAction::Continue)
    }

    fn post_apply(&self, ctx: &PostApply<'_>) -> Result<HookAction> {
        let id = ctx.info.human_id();
        self.shared.state.end(&id, ctx.error.is_some());
        self.shared.redraw.request();
        Ok(HookAction::Continue)
    }

    fn pre_diff(&self, ctx: &PreDiff<'_>) -> Result<HookAction> {
        self.base.pre_diff(ctx)
    }

    fn pre_refresh(&self, ctx: &PreRefresh<'_>) -> Result<HookAction> {
        self.base.pre_refresh(ctx)
    }

    fn pre_provision(&self, ctx: &PreProvision<'_>) -> Result<HookAction> {
        self.base.pre_provision(ctx)
    }

    fn provision_output(&self, ctx: &ProvisionOutput<'_>) {
        self.base.provision_output(ctx);
    }
}

impl<T: TerminalBackend, H: Hook> UiHook for FancyHook<T, H> {
    fn init(&mut self) -> Result<()> {
        match std::mem::replace(self.lifecycle_mut(), Lifecycle::Closed) {
            Lifecycle::Ready {
                mut terminal,
                scheduler,
            } => {
                let tty = match terminal.acquire() {
                    Ok(tty) => tty,
                    Err(err) => {
                        *self.lifecycle_mut() = Lifecycle::Ready {
                            terminal,
                            scheduler,
                        };
                        return Err(err);
                    }
                };

                self.shared.state.reset();
                self.shared.interrupted.store(false, Ordering::Release);
                let handle = EventLoopHandle::spawn(
                    terminal,
                    tty,
                    &self.config,
                    self.shared.clone(),
                    scheduler,
                )?;
                *self.lifecycle_mut() = Lifecycle::Running(handle);
                debug!("dashboard initialized");
                Ok(())
            }
            other => {
                *self.lifecycle_mut() = other;
                Err(Error::AlreadyInitialized)
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        self.shutdown().map(drop)
    }
}
