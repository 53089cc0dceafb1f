pub mod catalog;
pub mod config;
pub mod contract;
pub mod filter;
pub mod hotkey;
pub mod logging;
pub mod model;
pub mod progress;
pub mod runtime;
pub mod search_focus;
pub mod session;
