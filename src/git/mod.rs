//! Git operations module
//!
//! Handles GitHub URL validation and temporary repository clones

pub mod clone;
pub mod github;

pub use clone::*;
pub use github::*;
