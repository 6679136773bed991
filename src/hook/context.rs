//! Typed values the orchestration engine hands to each callback.

use std::collections::BTreeMap;
use std::error::Error as StdError;

/// Identity of one resource instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct InstanceInfo {
    /// Resource address within its module, e.g. `aws_instance.web`.
    pub id: String,
    /// Module names from the root down, excluding the root itself.
    pub module_path: Vec<String>,
}

impl InstanceInfo {
    /// Instance in the root module.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            module_path: Vec::new(),
        }
    }

    /// Instance nested under the given module path.
    #[must_use]
    pub fn in_module<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.module_path = path.into_iter().map(Into::into).collect();
        self
    }

    /// Human readable address, unique within an apply run.
    ///
    /// Root resources render as their bare id; nested ones are prefixed
    /// with `module.<name>.` for every level.
    pub fn human_id(&self) -> String {
        let mut out = String::new();
        for module in &self.module_path {
            out.push_str("module.");
            out.push_str(module);
            out.push('.');
        }
        out.push_str(&self.id);
        out
    }
}

/// Known remote state of an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceState {
    /// Remote id. Empty when the resource has not been created.
    pub id: String,
    /// Flattened attributes.
    pub attributes: BTreeMap<String, String>,
}

impl InstanceState {
    /// State with the given remote id and no attributes.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Whether the resource does not exist remotely yet.
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }
}

/// The pending change for an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstanceDiff {
    /// The instance is being destroyed.
    pub destroy: bool,
}

impl InstanceDiff {
    /// A destructive diff.
    pub const fn destroy() -> Self {
        Self { destroy: true }
    }
}

/// Error reported by the engine for a failed apply.
pub type ApplyError = dyn StdError + Send + Sync + 'static;

/// Context for [`Hook::pre_apply`](super::Hook::pre_apply).
#[derive(Debug, Clone, Copy)]
pub struct PreApply<'a> {
    /// The instance about to change.
    pub info: &'a InstanceInfo,
    /// Current remote state; `None` if the resource was never created.
    pub state: Option<&'a InstanceState>,
    /// The change about to be applied.
    pub diff: &'a InstanceDiff,
}

/// Context for [`Hook::post_apply`](super::Hook::post_apply).
#[derive(Debug, Clone, Copy)]
pub struct PostApply<'a> {
    /// The instance that changed.
    pub info: &'a InstanceInfo,
    /// Resulting remote state, if any.
    pub state: Option<&'a InstanceState>,
    /// The apply error, if the change failed.
    pub error: Option<&'a ApplyError>,
}

/// Context for [`Hook::pre_diff`](super::Hook::pre_diff).
#[derive(Debug, Clone, Copy)]
pub struct PreDiff<'a> {
    /// The instance being diffed.
    pub info: &'a InstanceInfo,
    /// Current remote state.
    pub state: Option<&'a InstanceState>,
}

/// Context for [`Hook::pre_refresh`](super::Hook::pre_refresh).
#[derive(Debug, Clone, Copy)]
pub struct PreRefresh<'a> {
    /// The instance being refreshed.
    pub info: &'a InstanceInfo,
    /// Last known remote state.
    pub state: Option<&'a InstanceState>,
}

/// Context for [`Hook::pre_provision`](super::Hook::pre_provision).
#[derive(Debug, Clone, Copy)]
pub struct PreProvision<'a> {
    /// The instance being provisioned.
    pub info: &'a InstanceInfo,
    /// Provisioner name.
    pub provisioner: &'a str,
}

/// Context for [`Hook::provision_output`](super::Hook::provision_output).
#[derive(Debug, Clone, Copy)]
pub struct ProvisionOutput<'a> {
    /// The instance being provisioned.
    pub info: &'a InstanceInfo,
    /// Provisioner name.
    pub provisioner: &'a str,
    /// One chunk of provisioner output.
    pub message: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_id_root() {
        assert_eq!(InstanceInfo::new("aws_instance.web").human_id(), "aws_instance.web");
    }

    #[test]
    fn test_human_id_nested() {
        let info = InstanceInfo::new("aws_instance.web").in_module(["network", "edge"]);
        assert_eq!(info.human_id(), "module.network.module.edge.aws_instance.web");
    }

    #[test]
    fn test_state_empty() {
        assert!(InstanceState::default().is_empty());
        assert!(!InstanceState::new("i-abc").is_empty());
    }
}
