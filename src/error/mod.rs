//! Error handling module
//!
//! Defines the error kinds raised while resolving and persisting configuration

pub mod types;

pub use types::*;
