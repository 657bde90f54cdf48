//! Command handlers for the citeline CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod ask;
pub mod normalize;
mod output;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use normalize::NormalizeCommand;
