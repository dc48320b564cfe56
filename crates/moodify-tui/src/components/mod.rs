pub mod favorites;
pub mod header;
pub mod help_overlay;
pub mod mood_list;
pub mod song_search;
