//! Shell-backed task bodies
//!
//! This module covers what the tasks of a config file need at run time: the
//! shared context, interpolation, conditions and command execution.

pub mod command;
pub mod context;
pub mod interpolate;
pub mod task;
pub mod when;

// Re-export main types
pub use command::*;
pub use context::*;
pub use interpolate::*;
pub use task::*;
pub use when::*;
