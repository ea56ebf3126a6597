//! CLI command implementations.

pub mod common;
pub mod level;
pub mod measure;
pub mod profiles;
