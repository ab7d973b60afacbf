//! Error handling module
//!
//! Defines the flat error taxonomy surfaced to the command line

pub mod types;

pub use types::*;
