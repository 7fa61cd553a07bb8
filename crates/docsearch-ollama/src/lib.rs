//! docsearch-ollama
//!
//! Thin clients over a locally hosted Ollama instance: one for the
//! embedding model, one for answer generation. Both models are external
//! collaborators consumed through the `Embedder` / `LanguageModel`
//! traits; nothing here interprets model output. A deterministic
//! hashing embedder is included for tests and offline runs.

pub mod client;
pub mod embedder;
pub mod generator;
pub mod hashing;

pub use client::{GenerationOptions, OllamaClient, DEFAULT_BASE_URL};
pub use embedder::OllamaEmbedder;
pub use generator::OllamaGenerator;
pub use hashing::HashEmbedder;

use std::sync::Arc;

use docsearch_core::traits::Embedder;
use tracing::info;

/// Pick the embedder: the Ollama-backed one, or the hashing stand-in
/// when `APP_USE_FAKE_EMBEDDINGS` is set (tests, offline development).
pub fn default_embedder(
    client: OllamaClient,
    model: &str,
    dim: usize,
) -> Arc<dyn Embedder> {
    let use_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if use_fake {
        info!("using hashing embedder (APP_USE_FAKE_EMBEDDINGS set)");
        return Arc::new(HashEmbedder::new(dim));
    }
    Arc::new(OllamaEmbedder::new(client, model, dim))
}
