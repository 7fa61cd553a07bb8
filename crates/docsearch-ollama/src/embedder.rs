use anyhow::{anyhow, Result};
use async_trait::async_trait;

use docsearch_core::traits::Embedder;

use crate::client::OllamaClient;

/// Embedder backed by an Ollama embedding model. Vectors are
/// L2-normalized so L2 distance and cosine similarity rank identically.
pub struct OllamaEmbedder {
    client: OllamaClient,
    model: String,
    dim: usize,
}

impl OllamaEmbedder {
    pub fn new(client: OllamaClient, model: impl Into<String>, dim: usize) -> Self {
        Self {
            client,
            model: model.into(),
            dim,
        }
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let mut embeddings = self.client.embed(&self.model, texts).await?;
        for embedding in &mut embeddings {
            if embedding.len() != self.dim {
                return Err(anyhow!(
                    "model '{}' returned {}-dim vectors, expected {}",
                    self.model,
                    embedding.len(),
                    self.dim
                ));
            }
            normalize(embedding);
        }
        Ok(embeddings)
    }
}

pub(crate) fn normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt().max(1e-6);
    for x in v {
        *x /= norm;
    }
}
