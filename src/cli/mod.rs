//! CLI interface and argument parsing
//!
//! This module handles command-line parsing, shell completion and the console
//! rendering of run events.

pub mod app;
pub mod reporter;

// Re-export main types
pub use app::*;
pub use reporter::*;
