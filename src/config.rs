//! Dashboard configuration.

use ratatui::style::Color;
use std::time::Duration;
use tracing::debug;

/// Env var that disables the alternate screen when set to a falsy value.
pub const ENV_ALT_SCREEN: &str = "APPLYBOARD_ALT_SCREEN";

/// Env var that overrides the input poll timeout, in milliseconds.
pub const ENV_POLL_MS: &str = "APPLYBOARD_POLL_MS";

/// Border titles of the three panels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelTitles {
    /// Title of the in-flight operations panel.
    pub active: String,
    /// Title of the finished operations panel.
    pub completed: String,
    /// Title of the failed operations panel.
    pub errored: String,
}

impl Default for PanelTitles {
    fn default() -> Self {
        Self {
            active: "Active Resources".to_string(),
            completed: "Completed Resources".to_string(),
            errored: "Errored Resources".to_string(),
        }
    }
}

/// Colors used when drawing the panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelTheme {
    /// Border color shared by all panels.
    pub border: Color,
    /// Item color in the active panel.
    pub active: Color,
    /// Item color in the completed panel.
    pub completed: Color,
    /// Item color in the errored panel.
    pub errored: Color,
}

impl Default for PanelTheme {
    fn default() -> Self {
        Self {
            border: Color::Cyan,
            active: Color::Yellow,
            completed: Color::Green,
            errored: Color::Red,
        }
    }
}

/// Configuration for the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// How long the input thread waits for a terminal event before
    /// re-checking its shutdown flag.
    pub input_poll_timeout: Duration,
    /// Whether to draw on the alternate screen buffer.
    pub alternate_screen: bool,
    /// Panel titles.
    pub titles: PanelTitles,
    /// Panel colors.
    pub theme: PanelTheme,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            input_poll_timeout: Duration::from_millis(10),
            alternate_screen: true,
            titles: PanelTitles::default(),
            theme: PanelTheme::default(),
        }
    }
}

impl DashboardConfig {
    /// Default configuration with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up through `lookup`.
    ///
    /// Unparseable values are ignored.
    #[must_use]
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(ENV_ALT_SCREEN) {
            match parse_flag(&raw) {
                Some(enabled) => self.alternate_screen = enabled,
                None => debug!(key = ENV_ALT_SCREEN, value = %raw, "ignoring unparseable flag"),
            }
        }

        if let Some(raw) = lookup(ENV_POLL_MS) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => self.input_poll_timeout = Duration::from_millis(ms.clamp(1, 1000)),
                Err(_) => debug!(key = ENV_POLL_MS, value = %raw, "ignoring unparseable duration"),
            }
        }

        self
    }

    /// Set the input poll timeout.
    #[must_use]
    pub const fn with_input_poll_timeout(mut self, timeout: Duration) -> Self {
        self.input_poll_timeout = timeout;
        self
    }

    /// Enable or disable the alternate screen.
    #[must_use]
    pub const fn with_alternate_screen(mut self, enabled: bool) -> Self {
        self.alternate_screen = enabled;
        self
    }

    /// Replace the panel titles.
    #[must_use]
    pub fn with_titles(mut self, titles: PanelTitles) -> Self {
        self.titles = titles;
        self
    }

    /// Replace the panel colors.
    #[must_use]
    pub const fn with_theme(mut self, theme: PanelTheme) -> Self {
        self.theme = theme;
        self
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::default();
        assert_eq!(config.input_poll_timeout, Duration::from_millis(10));
        assert!(config.alternate_screen);
        assert_eq!(config.titles.active, "Active Resources");
        assert_eq!(config.titles.completed, "Completed Resources");
        assert_eq!(config.titles.errored, "Errored Resources");
    }

    #[test]
    fn test_env_overrides() {
        let config = DashboardConfig::default()
            .with_env_overrides(lookup(&[(ENV_ALT_SCREEN, "off"), (ENV_POLL_MS, "25")]));
        assert!(!config.alternate_screen);
        assert_eq!(config.input_poll_timeout, Duration::from_millis(25));
    }

    #[test]
    fn test_env_poll_is_clamped() {
        let config =
            DashboardConfig::default().with_env_overrides(lookup(&[(ENV_POLL_MS, "0")]));
        assert_eq!(config.input_poll_timeout, Duration::from_millis(1));

        let config =
            DashboardConfig::default().with_env_overrides(lookup(&[(ENV_POLL_MS, "99999")]));
        assert_eq!(config.input_poll_timeout, Duration::from_millis(1000));
    }

    #[test]
    fn test_env_garbage_is_ignored() {
        let config = DashboardConfig::default()
            .with_env_overrides(lookup(&[(ENV_ALT_SCREEN, "maybe"), (ENV_POLL_MS, "soon")]));
        assert!(config.alternate_screen);
        assert_eq!(config.input_poll_timeout, Duration::from_millis(10));
    }
}
