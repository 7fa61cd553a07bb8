//! Seams to the external models. The embedding model and the language
//! model are consumed as black boxes behind these traits; the concrete
//! Ollama-backed implementations live in `docsearch-ollama`.

use async_trait::async_trait;

/// Maps text to a fixed-length vector. Implementations must return one
/// vector of `dim()` floats per input text, in input order.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    async fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Maps a prompt to generated text.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}
