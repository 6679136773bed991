//! Panel trait and the bordered list panel.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, List, ListItem, Widget};

/// A region of the dashboard that renders itself into a buffer.
///
/// Panels are positioned by the display on resize and redrawn whenever
/// their content changes.
pub trait Panel {
    /// Get the current bounds of this panel.
    fn bounds(&self) -> Rect;

    /// Set the bounds of this panel.
    ///
    /// Called when the layout changes (e.g., terminal resize).
    fn set_bounds(&mut self, bounds: Rect);

    /// Render this panel into the given buffer, inside its bounds.
    fn render(&self, buffer: &mut Buffer);

    /// Check if this panel needs to be redrawn.
    fn needs_redraw(&self) -> bool;

    /// Clear the redraw flag after rendering.
    fn clear_redraw(&mut self);
}

/// A bordered, titled list of text rows.
#[derive(Debug, Clone)]
pub struct ListPanel {
    title: String,
    items: Vec<String>,
    bounds: Rect,
    border: Color,
    item: Color,
    dirty: bool,
}

impl ListPanel {
    /// Create an empty panel.
    pub fn new(title: impl Into<String>, border: Color, item: Color) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
            bounds: Rect::default(),
            border,
            item,
            dirty: true,
        }
    }

    /// Replace the rows.
    pub fn set_items(&mut self, items: Vec<String>) {
        if self.items != items {
            self.items = items;
            self.dirty = true;
        }
    }

    /// Current rows.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Border title.
    pub fn title(&self) -> &str {
        &self.title
    }
}

impl Panel for ListPanel {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn set_bounds(&mut self, bounds: Rect) {
        if self.bounds != bounds {
            self.bounds = bounds;
            self.dirty = true;
        }
    }

    fn render(&self, buffer: &mut Buffer) {
        let area = self.bounds.intersection(buffer.area);
        if area.is_empty() {
            return;
        }

        let block = Block::bordered()
            .border_style(Style::default().fg(self.border))
            .title(self.title.as_str())
            .title_top(Line::from(self.items.len().to_string()).right_aligned());

        let items: Vec<ListItem<'_>> = self
            .items
            .iter()
            .map(|item| ListItem::new(item.as_str()))
            .collect();

        Widget::render(
            List::new(items)
                .block(block)
                .style(Style::default().fg(self.item)),
            area,
            buffer,
        );
    }

    fn needs_redraw(&self) -> bool {
        self.dirty
    }

    fn clear_redraw(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::buffer_rows;

    #[test]
    fn test_set_items_marks_dirty() {
        let mut panel = ListPanel::new("Active Resources", Color::Cyan, Color::Yellow);
        panel.clear_redraw();

        panel.set_items(vec!["a: Creating...".to_string()]);
        assert!(panel.needs_redraw());
        panel.clear_redraw();

        panel.set_items(vec!["a: Creating...".to_string()]);
        assert!(!panel.needs_redraw());
    }

    #[test]
    fn test_render_inside_bounds() {
        let mut panel = ListPanel::new("Done", Color::Cyan, Color::Green);
        panel.set_bounds(Rect::new(0, 0, 20, 4));
        panel.set_items(vec!["alpha".to_string(), "beta".to_string()]);

        let mut buffer = Buffer::empty(Rect::new(0, 0, 24, 5));
        panel.render(&mut buffer);
        let rows = buffer_rows(&buffer);

        assert!(rows[0].starts_with("┌Done"));
        assert!(rows[0][..rows[0].len() - 4].ends_with("2┐"));
        assert!(rows[1].starts_with("│alpha"));
        assert!(rows[2].starts_with("│beta"));
        assert!(rows[3].starts_with("└"));
        assert_eq!(rows[4].trim(), "");
    }

    #[test]
    fn test_render_outside_buffer_is_clipped() {
        let mut panel = ListPanel::new("Errored", Color::Cyan, Color::Red);
        panel.set_bounds(Rect::new(0, 10, 20, 10));
        let mut buffer = Buffer::empty(Rect::new(0, 0, 20, 5));
        panel.render(&mut buffer);
        assert!(buffer_rows(&buffer).iter().all(|row| row.trim().is_empty()));
    }
}
