pub mod config;
pub mod database;
pub mod embeddings;
pub mod errors;
pub mod formatters;
pub mod logging;
pub mod models;
pub mod rag;
pub mod search;

#[cfg(test)]
mod config_tests;

pub use config::AppConfig;
pub use errors::*;
pub use models::BuildContextOptions;
pub use models::Citation;
pub use models::ContextBundle;
pub use rag::ContextAggregator;
