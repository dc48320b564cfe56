pub mod filter_input;
pub mod pane_chrome;
pub mod scrollable_list;
pub mod status_bar;
pub mod text;
pub mod toast;
