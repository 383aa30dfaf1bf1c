//! CLI command implementations

pub mod check;
pub mod compile;
pub mod convert;
pub mod examples;
pub mod workflow;
