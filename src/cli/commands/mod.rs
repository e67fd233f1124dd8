//! CLI command implementations

pub mod completions;
pub mod run;
pub mod steps;
pub mod validate;
