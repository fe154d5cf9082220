//! Subcommands of the `smartcab` binary

pub mod compare;
pub mod evaluate;
pub mod grid_search;
pub mod summarize;
pub mod train;
