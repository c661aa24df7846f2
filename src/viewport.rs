use lazy_pager::ScrollableHost;

use crate::config::LayoutKind;

/// Scroll position of the list or grid body.
///
/// Slots are the items followed by at most one indicator slot. In grid
/// layout items fill `columns` cells per row and the indicator takes a row
/// of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    pub layout: LayoutKind,
    pub cursor: usize,
    pub offset: usize,
    columns: usize,
    rows: usize,
    items: usize,
    slots: usize,
}

impl Viewport {
    pub fn new(layout: LayoutKind, columns: usize) -> Self {
        Self {
            layout,
            cursor: 0,
            offset: 0,
            columns: columns.max(1),
            rows: 0,
            items: 0,
            slots: 0,
        }
    }

    /// Cells per row for the active layout.
    pub fn columns(&self) -> usize {
        match self.layout {
            LayoutKind::List => 1,
            LayoutKind::Grid => self.columns,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn set_rows(&mut self, rows: usize) {
        self.rows = rows;
        self.follow_cursor();
    }

    /// Takes the current item and slot counts of the surface.
    pub fn sync(&mut self, items: usize, slots: usize) {
        self.items = items;
        self.slots = slots;
        self.cursor = self.cursor.min(slots.saturating_sub(1));
        self.follow_cursor();
    }

    pub fn toggle_layout(&mut self) {
        self.layout = match self.layout {
            LayoutKind::List => LayoutKind::Grid,
            LayoutKind::Grid => LayoutKind::List,
        };
        self.follow_cursor();
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.offset = 0;
        self.items = 0;
        self.slots = 0;
    }

    pub fn scroll_down(&mut self, steps: usize) {
        if self.slots == 0 {
            return;
        }
        let target = if self.cursor >= self.items {
            self.cursor
        } else {
            self.cursor.saturating_add(steps.saturating_mul(self.columns()))
        };
        // Stepping past the last item row lands on the indicator, if any.
        self.cursor = if target >= self.items && self.slots > self.items {
            self.items
        } else {
            target.min(self.items.saturating_sub(1))
        };
        self.follow_cursor();
    }

    pub fn scroll_up(&mut self, steps: usize) {
        let columns = self.columns();
        let stride = steps.saturating_mul(columns);
        self.cursor = if self.cursor >= self.items {
            // Off the indicator onto the last item first.
            self.items
                .saturating_sub(1)
                .saturating_sub(stride.saturating_sub(columns))
        } else {
            self.cursor.saturating_sub(stride)
        };
        self.follow_cursor();
    }

    pub fn go_to_top(&mut self) {
        self.cursor = 0;
        self.follow_cursor();
    }

    pub fn go_to_bottom(&mut self) {
        self.cursor = self.slots.saturating_sub(1);
        self.follow_cursor();
    }

    /// Row a slot sits on.
    pub fn row_of(&self, slot: usize) -> usize {
        if slot < self.items {
            slot / self.columns()
        } else {
            self.item_rows()
        }
    }

    pub fn total_rows(&self) -> usize {
        self.item_rows() + usize::from(self.slots > self.items)
    }

    fn item_rows(&self) -> usize {
        self.items.div_ceil(self.columns())
    }

    fn follow_cursor(&mut self) {
        let row = self.row_of(self.cursor);
        if row < self.offset {
            self.offset = row;
        } else if self.rows > 0 && row >= self.offset + self.rows {
            self.offset = row + 1 - self.rows;
        }
        let max_offset = self.total_rows().saturating_sub(self.rows.max(1));
        self.offset = self.offset.min(max_offset);
    }
}

impl ScrollableHost for Viewport {
    fn last_visible_index(&self) -> Option<usize> {
        if self.slots == 0 || self.rows == 0 {
            return None;
        }

        let last_row = (self.offset + self.rows).min(self.total_rows()) - 1;
        if self.slots > self.items && last_row == self.item_rows() {
            return Some(self.items);
        }
        Some(((last_row + 1) * self.columns()).min(self.items) - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(rows: usize, items: usize, slots: usize) -> Viewport {
        let mut view = Viewport::new(LayoutKind::List, 3);
        view.set_rows(rows);
        view.sync(items, slots);
        view
    }

    #[test]
    fn nothing_visible_before_layout() {
        let mut view = Viewport::new(LayoutKind::List, 1);
        view.sync(10, 10);
        assert_eq!(view.last_visible_index(), None);

        let view = list(5, 0, 0);
        assert_eq!(view.last_visible_index(), None);
    }

    #[test]
    fn list_reports_bottom_row() {
        let mut view = list(4, 10, 10);
        assert_eq!(view.last_visible_index(), Some(3));

        view.scroll_down(6);
        assert_eq!(view.cursor, 6);
        assert_eq!(view.offset, 3);
        assert_eq!(view.last_visible_index(), Some(6));

        view.go_to_bottom();
        assert_eq!(view.last_visible_index(), Some(9));
    }

    #[test]
    fn short_list_shows_everything() {
        let view = list(20, 5, 6);
        assert_eq!(view.last_visible_index(), Some(5));
        assert_eq!(view.total_rows(), 6);
    }

    #[test]
    fn cursor_reaches_indicator_slot() {
        let mut view = list(3, 5, 6);
        view.scroll_down(10);
        assert_eq!(view.cursor, 5);
        assert_eq!(view.last_visible_index(), Some(5));

        view.scroll_up(1);
        assert_eq!(view.cursor, 4);
    }

    #[test]
    fn grid_counts_cells_per_row() {
        let mut view = Viewport::new(LayoutKind::Grid, 3);
        view.set_rows(2);
        view.sync(10, 11);
        assert_eq!(view.total_rows(), 5);
        assert_eq!(view.last_visible_index(), Some(5));

        view.scroll_down(3);
        assert_eq!(view.cursor, 9);
        assert_eq!(view.row_of(9), 3);
        assert_eq!(view.last_visible_index(), Some(9));

        view.scroll_down(1);
        assert_eq!(view.cursor, 10);
        assert_eq!(view.last_visible_index(), Some(10));
    }

    #[test]
    fn toggle_keeps_cursor_visible() {
        let mut view = Viewport::new(LayoutKind::Grid, 4);
        view.set_rows(2);
        view.sync(12, 12);
        view.go_to_bottom();
        view.toggle_layout();
        assert_eq!(view.layout, LayoutKind::List);
        assert_eq!(view.offset, 10);
        assert_eq!(view.last_visible_index(), Some(11));
    }

    #[test]
    fn sync_clamps_cursor_after_refresh() {
        let mut view = list(3, 10, 10);
        view.go_to_bottom();
        view.sync(0, 0);
        assert_eq!(view.cursor, 0);
        assert_eq!(view.offset, 0);
    }
}
