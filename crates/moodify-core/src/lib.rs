pub mod config;
pub mod coordinator;
pub mod debounce;
pub mod error;
pub mod kv;
pub mod models;
pub mod platform;
pub mod search;
pub mod store;
