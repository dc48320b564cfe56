//! ViewManager: which screen is showing and its per-view focus ring.
//!
//! MoodSelect: mood list only.
//! MoodDetail: song search (left) + favorites of the open mood (right).

use crate::action::{ComponentId, View};
use crate::focus::FocusRing;

pub struct ViewManager {
    pub view: View,
    pub show_help: bool,
    pub show_keys_bar: bool,
    pub focus: FocusRing,
}

impl ViewManager {
    pub fn new() -> Self {
        let mut vm = Self {
            view: View::MoodSelect,
            show_help: false,
            show_keys_bar: true,
            focus: FocusRing::default(),
        };
        vm.rebuild_focus_ring();
        vm
    }

    fn rebuild_focus_ring(&mut self) {
        let items = match self.view {
            View::MoodSelect => vec![ComponentId::MoodList],
            View::MoodDetail(_) => vec![ComponentId::SongSearch, ComponentId::Favorites],
        };
        self.focus.set_items(items);
    }

    pub fn set_view(&mut self, view: View) {
        if self.view != view {
            self.view = view;
            self.rebuild_focus_ring();
        }
    }

    pub fn focused(&self) -> Option<ComponentId> {
        self.focus.current()
    }

    pub fn focus_next(&mut self) -> Option<ComponentId> {
        self.focus.next()
    }

    pub fn focus_prev(&mut self) -> Option<ComponentId> {
        self.focus.prev()
    }

    pub fn focus_nth(&mut self, n: usize) {
        self.focus.set_nth(n);
    }

    pub fn focus_set(&mut self, id: ComponentId) {
        self.focus.set(id);
    }
}

impl Default for ViewManager {
    fn default() -> Self {
        Self::new()
    }
}
