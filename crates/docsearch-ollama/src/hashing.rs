use std::hash::{Hash, Hasher};

use anyhow::Result;
use async_trait::async_trait;
use twox_hash::XxHash64;

use docsearch_core::traits::Embedder;

use crate::embedder::normalize;

/// Deterministic token-hashing embedder. Not a real embedding model:
/// it only guarantees that identical texts map to identical unit
/// vectors and that token overlap raises similarity, which is all the
/// tests and offline smoke runs need.
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    fn embed_one(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        normalize(&mut v);
        v
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn identical_texts_embed_identically() {
        let embedder = HashEmbedder::new(64);
        let batch = vec!["연차휴가 규정".to_string(), "연차휴가 규정".to_string()];
        let out = embedder.embed_batch(&batch).await.expect("embed");
        assert_eq!(out[0], out[1]);
        assert_eq!(out[0].len(), 64);
    }

    #[tokio::test]
    async fn vectors_are_unit_length() {
        let embedder = HashEmbedder::new(32);
        let out = embedder
            .embed_batch(&["제15조 (정의) 용어의 뜻".to_string()])
            .await
            .expect("embed");
        let norm: f32 = out[0].iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4);
    }

    #[tokio::test]
    async fn shared_tokens_raise_similarity() {
        let embedder = HashEmbedder::new(128);
        let out = embedder
            .embed_batch(&[
                "연차휴가 일수 규정".to_string(),
                "연차휴가 사용 절차".to_string(),
                "출장 여비 지급".to_string(),
            ])
            .await
            .expect("embed");
        let dot = |a: &[f32], b: &[f32]| a.iter().zip(b).map(|(x, y)| x * y).sum::<f32>();
        assert!(dot(&out[0], &out[1]) > dot(&out[0], &out[2]));
    }
}
