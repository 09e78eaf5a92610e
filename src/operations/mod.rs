//! Operations module
//!
//! The commands behind each CLI subcommand. Each one works on an already
//! loaded `ShellConfig` and returns the text to print.

pub mod endpoint;
pub mod environment;
pub mod project;
pub mod resolve;

pub use endpoint::*;
pub use environment::*;
pub use project::*;
pub use resolve::*;
