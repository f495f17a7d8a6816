//! Configuration and data model shared by every pipeline stage

pub mod config;
pub mod models;
