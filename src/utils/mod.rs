//! Utility helpers for paths and the process environment

pub mod path;
pub mod path_env;
