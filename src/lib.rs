//! Tasklane - a dependency-ordered task runner
//!
//! Tasks are registered by name with the tasks they depend on, an optional
//! condition and a body. Running a set of tasks resolves a plan that places
//! every dependency before its dependents, then executes the plan in order
//! against a shared context and collects a [`runner::RunReport`].
//!
//! The [`shell`] and [`config`] modules build a registry from a `tasklane.yml`
//! file whose task bodies launch commands; [`cli`] is the front end for that.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod shell;

// Re-export commonly used types
pub use error::{Result, TasklaneError};
pub use runner::{Outcome, Registry, RunOptions, RunReport, TaskMeta};

/// Current version of Tasklane
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
