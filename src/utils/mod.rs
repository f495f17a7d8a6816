//! Small pure helpers used across the pipeline

pub mod filters;
pub mod time;
