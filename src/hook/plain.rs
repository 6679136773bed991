//! Plain Hook: line-per-event reporting for non-interactive output.
//!
//! Used when the terminal cannot be acquired (piped output, CI, or another
//! session already owns it).

use super::{Hook, HookAction, PostApply, PreApply, UiHook};
use crate::error::Result;
use crate::state::OperationKind;
use std::io::Write;
use std::sync::Mutex;
use tracing::warn;

/// Writes one line per apply event to `W`.
#[derive(Debug)]
pub struct PlainHook<W> {
    out: Mutex<W>,
}

impl<W: Write + Send> PlainHook<W> {
    /// Create a hook writing to `out`.
    pub const fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn line(&self, text: &str) {
        let mut out = self
            .out
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Err(err) = writeln!(out, "{text}").and_then(|()| out.flush()) {
            warn!(error = %err, "failed to write apply progress");
        }
    }
}

impl<W: Write + Send> Hook for PlainHook<W> {
    fn pre_apply(&self, ctx: &PreApply<'_>) -> Result<HookAction> {
        let kind = OperationKind::classify(ctx.state, ctx.diff);
        self.line(&format!("{}: {kind}", ctx.info.human_id()));
        Ok(HookAction::Continue)
    }

    fn post_apply(&self, ctx: &PostApply<'_>) -> Result<HookAction> {
        let id = ctx.info.human_id();
        match ctx.error {
            Some(err) => self.line(&format!("{id}: Error: {err}")),
            None => self.line(&format!("{id}: Complete")),
        }
        Ok(HookAction::Continue)
    }
}

impl<W: Write + Send> UiHook for PlainHook<W> {
    fn init(&mut self) -> Result<()> {
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let mut out = self
            .out
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        out.flush()?;
        Ok(())
    }
}
