//! Display: the three list panels, their geometry, and the draw call.
//!
//! Everything here runs on the event loop thread only, so nothing is
//! synchronized. The display never reads shared state directly; the loop
//! hands it a [`Snapshot`].

mod geometry;
mod panel;

pub use geometry::PanelGeometry;
pub use panel::{ListPanel, Panel};

use crate::config::DashboardConfig;
use crate::state::Snapshot;
use ratatui::backend::Backend;
use ratatui::Terminal;
use std::io;
use tracing::trace;

/// Owns the terminal and the panels drawn onto it.
#[derive(Debug)]
pub struct Display<B: Backend> {
    terminal: Terminal<B>,
    geometry: PanelGeometry,
    active: ListPanel,
    completed: ListPanel,
    errored: ListPanel,
}

impl<B: Backend> Display<B> {
    /// Build the panels described by `config` on top of `terminal`.
    pub fn new(terminal: Terminal<B>, config: &DashboardConfig) -> Self {
        let theme = config.theme;
        Self {
            terminal,
            geometry: PanelGeometry::default(),
            active: ListPanel::new(config.titles.active.clone(), theme.border, theme.active),
            completed: ListPanel::new(
                config.titles.completed.clone(),
                theme.border,
                theme.completed,
            ),
            errored: ListPanel::new(config.titles.errored.clone(), theme.border, theme.errored),
        }
    }

    /// Replace the panel contents.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        let Snapshot {
            active,
            completed,
            errored,
        } = snapshot;
        self.active.set_items(active);
        self.completed.set_items(completed);
        self.errored.set_items(errored);
    }

    /// Lay the panels out for a `width` x `height` terminal.
    pub fn recalc_geometry(&mut self, width: u16, height: u16) {
        self.geometry = PanelGeometry::compute(width, height);
        self.active.set_bounds(self.geometry.active);
        self.errored.set_bounds(self.geometry.errored);
        self.completed.set_bounds(self.geometry.completed);
    }

    /// Current panel geometry.
    pub const fn geometry(&self) -> PanelGeometry {
        self.geometry
    }

    /// Whether any panel changed since the last draw.
    pub fn is_stale(&self) -> bool {
        self.panels().iter().any(|panel| panel.needs_redraw())
    }

    /// Render one frame.
    pub fn draw(&mut self) -> io::Result<()> {
        trace!(stale = self.is_stale(), "drawing dashboard");
        let panels = [&self.active, &self.errored, &self.completed];
        self.terminal.draw(|frame| {
            let buffer = frame.buffer_mut();
            for panel in panels {
                panel.render(buffer);
            }
        })?;

        self.active.clear_redraw();
        self.errored.clear_redraw();
        self.completed.clear_redraw();
        Ok(())
    }

    /// Current size of the underlying terminal.
    pub fn size(&self) -> io::Result<(u16, u16)> {
        let size = self.terminal.size()?;
        Ok((size.width, size.height))
    }

    /// The terminal being drawn on.
    pub const fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Mutable access to the terminal being drawn on.
    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    /// The panels in draw order.
    pub fn panels(&self) -> [&ListPanel; 3] {
        [&self.active, &self.errored, &self.completed]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::buffer_rows;
    use ratatui::backend::TestBackend;

    fn display(width: u16, height: u16) -> Display<TestBackend> {
        let terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let mut display = Display::new(terminal, &DashboardConfig::default());
        display.recalc_geometry(width, height);
        display
    }

    fn rows(display: &Display<TestBackend>) -> Vec<String> {
        buffer_rows(display.terminal().backend().buffer())
    }

    #[test]
    fn test_draw_lays_out_three_panels() {
        let mut display = display(80, 12);
        display.apply_snapshot(Snapshot {
            active: vec!["aws_instance.web: Creating...".to_string()],
            completed: vec!["aws_vpc.main".to_string()],
            errored: vec!["aws_eip.ip".to_string()],
        });
        display.draw().unwrap();

        let rows = rows(&display);
        assert!(rows[0].starts_with("┌Active Resources"));
        assert!(rows[0].contains("┌Completed Resources"));
        assert!(rows[1].contains("aws_instance.web: Creating..."));
        assert!(rows[1].contains("aws_vpc.main"));
        assert!(rows[6].starts_with("┌Errored Resources"));
        assert!(rows[7].contains("aws_eip.ip"));
    }

    #[test]
    fn test_recalc_geometry() {
        let mut display = display(80, 24);
        display.recalc_geometry(80, 40);
        let geometry = display.geometry();
        assert_eq!(geometry.active.height, 20);
        assert_eq!(geometry.errored.height, 20);
        assert_eq!(geometry.completed.height, 40);
        assert_eq!(display.panels()[1].bounds(), geometry.errored);
    }

    #[test]
    fn test_draw_clears_staleness() {
        let mut display = display(40, 10);
        assert!(display.is_stale());
        display.draw().unwrap();
        assert!(!display.is_stale());

        display.apply_snapshot(Snapshot {
            completed: vec!["x".to_string()],
            ..Snapshot::default()
        });
        assert!(display.is_stale());
    }

    #[test]
    fn test_same_snapshot_same_frame() {
        let snapshot = Snapshot {
            active: vec!["b: Modifying...".to_string()],
            completed: vec!["a".to_string(), "c".to_string()],
            errored: Vec::new(),
        };
        let mut display = display(50, 10);
        display.apply_snapshot(snapshot.clone());
        display.draw().unwrap();
        let first = rows(&display);

        display.apply_snapshot(snapshot);
        display.draw().unwrap();
        assert_eq!(rows(&display), first);
    }

    #[test]
    fn test_geometry_larger_than_terminal_does_not_panic() {
        let mut display = display(40, 10);
        display.recalc_geometry(200, 100);
        display.draw().unwrap();
        assert_eq!(display.size().unwrap(), (40, 10));
    }
}
