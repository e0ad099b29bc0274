//! CLI library components for pain survey harmonisation.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
