//! Hook contract: lifecycle callbacks the orchestration engine invokes.
//!
//! The engine calls these from many worker threads at once. For a given
//! instance, `pre_apply` happens before the matching `post_apply`; calls
//! for different instances carry no ordering at all.
//!
//! [`Hook`] provides a `Continue` default for every callback, so an
//! implementation only overrides what it cares about. [`NilHook`] is the
//! do-nothing implementation other hooks delegate to.

mod context;
mod fancy;
mod plain;

pub use context::{
    ApplyError, InstanceDiff, InstanceInfo, InstanceState, PostApply, PreApply, PreDiff,
    PreProvision, PreRefresh, ProvisionOutput,
};
pub use fancy::FancyHook;
pub use plain::PlainHook;

use crate::config::DashboardConfig;
use crate::error::Result;
use crate::terminal::CrosstermTerminal;
use tracing::{info, warn};

/// What the engine should do after a callback returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HookAction {
    /// Keep going.
    #[default]
    Continue,
    /// Stop the walk. The dashboard never returns this.
    Halt,
}

/// Lifecycle callbacks for one apply run.
pub trait Hook: Send + Sync {
    /// A change is about to be applied.
    fn pre_apply(&self, _ctx: &PreApply<'_>) -> Result<HookAction> {
        Ok(HookAction::Continue)
    }

    /// A change was applied, successfully or not.
    fn post_apply(&self, _ctx: &PostApply<'_>) -> Result<HookAction> {
        Ok(HookAction::Continue)
    }

    /// An instance is about to be diffed.
    fn pre_diff(&self, _ctx: &PreDiff<'_>) -> Result<HookAction> {
        Ok(HookAction::Continue)
    }

    /// An instance is about to be refreshed.
    fn pre_refresh(&self, _ctx: &PreRefresh<'_>) -> Result<HookAction> {
        Ok(HookAction::Continue)
    }

    /// A provisioner is about to run.
    fn pre_provision(&self, _ctx: &PreProvision<'_>) -> Result<HookAction> {
        Ok(HookAction::Continue)
    }

    /// A provisioner produced output.
    fn provision_output(&self, _ctx: &ProvisionOutput<'_>) {}
}

/// Hook that does nothing and always continues.
#[derive(Debug, Clone, Copy, Default)]
pub struct NilHook;

impl Hook for NilHook {}

/// A hook that owns a user interface.
///
/// `init` is called exactly once before any callback and `close` exactly
/// once after the last one.
pub trait UiHook: Hook {
    /// Set up the interface.
    fn init(&mut self) -> Result<()>;

    /// Tear the interface down.
    fn close(&mut self) -> Result<()>;
}

/// Open the interactive dashboard on the real terminal, or a plain text
/// hook on stderr when the terminal cannot be acquired.
///
/// The returned hook is already initialized.
pub fn open_ui_hook(config: DashboardConfig) -> Result<Box<dyn UiHook>> {
    let terminal = CrosstermTerminal::new(config.alternate_screen);
    let mut fancy = FancyHook::new(terminal, config);
    match fancy.init() {
        Ok(()) => {
            info!("interactive dashboard started");
            Ok(Box::new(fancy))
        }
        Err(err) if err.is_setup_failure() => {
            warn!(error = %err, "dashboard unavailable; falling back to plain output");
            let mut plain = PlainHook::new(std::io::stderr());
            plain.init()?;
            Ok(Box::new(plain))
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nil_hook_continues() {
        let hook = NilHook;
        let info = InstanceInfo::new("aws_instance.web");
        let diff = InstanceDiff::default();

        let pre = PreApply {
            info: &info,
            state: None,
            diff: &diff,
        };
        assert_eq!(hook.pre_apply(&pre).unwrap(), HookAction::Continue);

        let post = PostApply {
            info: &info,
            state: None,
            error: None,
        };
        assert_eq!(hook.post_apply(&post).unwrap(), HookAction::Continue);

        let refresh = PreRefresh {
            info: &info,
            state: None,
        };
        assert_eq!(hook.pre_refresh(&refresh).unwrap(), HookAction::Continue);

        let provision = PreProvision {
            info: &info,
            provisioner: "remote-exec",
        };
        assert_eq!(hook.pre_provision(&provision).unwrap(), HookAction::Continue);
        hook.provision_output(&ProvisionOutput {
            info: &info,
            provisioner: "remote-exec",
            message: "hello",
        });
    }

    #[test]
    fn test_hook_action_default() {
        assert_eq!(HookAction::default(), HookAction::Continue);
    }
}
