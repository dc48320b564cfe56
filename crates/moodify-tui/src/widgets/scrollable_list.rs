//! Cursor and scroll state for a list that may show a subset of its items.

pub struct ScrollableList<T> {
    items: Vec<T>,
    /// Indices into `items` currently shown, in display order.
    shown: Vec<usize>,
    pub selected: usize,
    pub scroll_offset: usize,
}

impl<T> ScrollableList<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            shown: Vec::new(),
            selected: 0,
            scroll_offset: 0,
        }
    }

    /// Replace the items and show all of them. The cursor keeps its row,
    /// clamped to the new length.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.shown = (0..self.items.len()).collect();
        self.clamp();
    }

    /// Show only the items matching `pred`, keeping the cursor on the same
    /// item when it survives.
    pub fn show_where(&mut self, pred: impl Fn(&T) -> bool) {
        let current = self.shown.get(self.selected).copied();
        self.shown = (0..self.items.len()).filter(|&i| pred(&self.items[i])).collect();
        self.selected = current
            .and_then(|prev| self.shown.iter().position(|&i| i == prev))
            .unwrap_or(0);
        self.scroll_offset = 0;
    }

    fn clamp(&mut self) {
        self.selected = self.selected.min(self.shown.len().saturating_sub(1));
    }

    pub fn select_up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    pub fn select_down(&mut self, n: usize) {
        self.selected = self.selected.saturating_add(n);
        self.clamp();
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.shown.len().saturating_sub(1);
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.shown.get(self.selected).map(|&i| &self.items[i])
    }

    /// Move the cursor to the first shown item matching `pred`.
    pub fn select_where(&mut self, pred: impl Fn(&T) -> bool) -> bool {
        let Some(pos) = self.shown.iter().position(|&i| pred(&self.items[i])) else {
            return false;
        };
        self.selected = pos;
        true
    }

    /// Items in the `height` rows starting at `scroll_offset`.
    pub fn window(&self, height: usize) -> impl Iterator<Item = &T> + '_ {
        self.shown
            .iter()
            .skip(self.scroll_offset)
            .take(height)
            .map(|&i| &self.items[i])
    }

    pub fn ensure_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + height {
            self.scroll_offset = self.selected + 1 - height;
        }
    }

    /// Select the item drawn at `row`; false when the row is empty.
    pub fn handle_click(&mut self, row: usize) -> bool {
        let target = self.scroll_offset + row;
        if target >= self.shown.len() {
            return false;
        }
        self.selected = target;
        true
    }

    pub fn len(&self) -> usize {
        self.shown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shown.is_empty()
    }

    pub fn selected_in_view(&self, height: usize) -> usize {
        self.selected
            .saturating_sub(self.scroll_offset)
            .min(height.saturating_sub(1))
    }
}

impl<T> Default for ScrollableList<T> {
    fn default() -> Self {
        Self::new()
    }
}
