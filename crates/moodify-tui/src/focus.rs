//! FocusRing: keyboard focus cycling between the panes of a view.

use crate::action::ComponentId;

pub struct FocusRing {
    items: Vec<ComponentId>,
    current: usize,
}

impl FocusRing {
    pub fn new(items: Vec<ComponentId>) -> Self {
        Self { items, current: 0 }
    }

    pub fn current(&self) -> Option<ComponentId> {
        self.items.get(self.current).copied()
    }

    pub fn next(&mut self) -> Option<ComponentId> {
        if self.items.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.items.len();
        self.current()
    }

    pub fn prev(&mut self) -> Option<ComponentId> {
        if self.items.is_empty() {
            return None;
        }
        self.current = if self.current == 0 {
            self.items.len() - 1
        } else {
            self.current - 1
        };
        self.current()
    }

    pub fn set(&mut self, id: ComponentId) {
        if let Some(pos) = self.items.iter().position(|&x| x == id) {
            self.current = pos;
        }
    }

    /// Focus the `n`th pane; out-of-range slots are ignored.
    pub fn set_nth(&mut self, n: usize) {
        if n < self.items.len() {
            self.current = n;
        }
    }

    pub fn is_focused(&self, id: ComponentId) -> bool {
        self.current() == Some(id)
    }

    /// Replace the ring contents, keeping the focused id when it survives.
    pub fn set_items(&mut self, items: Vec<ComponentId>) {
        let old = self.current();
        self.items = items;
        self.current = old
            .and_then(|id| self.items.iter().position(|&x| x == id))
            .unwrap_or(0);
    }
}

impl Default for FocusRing {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycles_both_ways() {
        let mut ring = FocusRing::new(vec![ComponentId::SongSearch, ComponentId::Favorites]);
        assert_eq!(ring.next(), Some(ComponentId::Favorites));
        assert_eq!(ring.next(), Some(ComponentId::SongSearch));
        assert_eq!(ring.prev(), Some(ComponentId::Favorites));
        assert!(ring.is_focused(ComponentId::Favorites));
        ring.set_nth(0);
        assert!(ring.is_focused(ComponentId::SongSearch));
        ring.set_nth(5);
        assert!(ring.is_focused(ComponentId::SongSearch));
    }

    #[test]
    fn test_set_items_keeps_surviving_focus() {
        let mut ring = FocusRing::new(vec![ComponentId::SongSearch, ComponentId::Favorites]);
        ring.set(ComponentId::Favorites);
        ring.set_items(vec![ComponentId::Favorites]);
        assert_eq!(ring.current(), Some(ComponentId::Favorites));
        ring.set_items(vec![ComponentId::MoodList]);
        assert_eq!(ring.current(), Some(ComponentId::MoodList));
        assert_eq!(FocusRing::default().next(), None);
    }
}
