//! Dependency-ordered task runner
//!
//! Tasks are registered in a [`Registry`], ordered by the planner into a plan in
//! which every task follows its dependencies, then executed sequentially against
//! a caller-supplied context.

pub mod event;
pub mod executor;
pub mod outcome;
pub mod plan;
pub mod registry;
pub mod report;

// Re-export main types
pub use event::*;
pub use executor::*;
pub use outcome::*;
pub use registry::*;
pub use report::*;
