//! Operations module
//!
//! Coordinates the clone, subdirectory and generator steps of a request

pub mod generate;
pub mod invoke;
pub mod plan;

pub use generate::*;
pub use invoke::*;
pub use plan::*;
