//! Command implementations for the KCL CLI

pub mod clean;
pub mod completions;
pub mod module;
pub mod registry;
pub mod run;
pub mod version;
