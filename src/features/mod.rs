//! The summarization pipeline, one module per stage

pub mod collect;
pub mod handler;
pub mod render;
pub mod resolve;
pub mod summarize;
pub mod transcript;

// Re-exports for the Discord layer
pub use collect::{HistoryCursor, HistorySource};
pub use handler::{CommandHandler, HandlerSettings};
