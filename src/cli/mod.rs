//! Command-line interface module
//!
//! Handles argument parsing and the mapping onto a generation request

pub mod args;

pub use args::*;
