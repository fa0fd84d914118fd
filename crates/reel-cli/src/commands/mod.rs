pub mod add;
pub mod check;
pub mod common;
pub mod completions;
pub mod config;
pub mod list;
pub mod remove;
pub mod sync;
pub mod toggle;
