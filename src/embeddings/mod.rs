//! Query embedding generation
//!
//! The aggregator only needs text → vector, expressed by [`EmbeddingProvider`].
//! [`EmbeddingClient`] implements it over HTTP for OpenAI-compatible and Ollama
//! endpoints.
//!
//! # Examples
//!
//! ```rust,no_run
//! use taxrag::config::AppConfig;
//! use taxrag::embeddings::EmbeddingClient;
//! use taxrag::embeddings::EmbeddingProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let client = EmbeddingClient::from_app_config(&config)?;
//!
//!     let embedding = client.embed("Umsatzsteuer Vorauszahlung").await?;
//!     println!("Generated embedding with {} dimensions", embedding.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;

use async_trait::async_trait;

pub use client::EmbeddingBackend;
pub use client::EmbeddingClient;

use crate::errors::Result;

/// Turns text into a fixed-length vector
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
