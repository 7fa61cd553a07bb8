use anyhow::Result;
use async_trait::async_trait;

use docsearch_core::traits::LanguageModel;

use crate::client::{GenerationOptions, OllamaClient};

/// Answer synthesis through an Ollama chat model.
pub struct OllamaGenerator {
    client: OllamaClient,
    model: String,
    options: GenerationOptions,
}

impl OllamaGenerator {
    pub fn new(client: OllamaClient, model: impl Into<String>, options: GenerationOptions) -> Self {
        Self {
            client,
            model: model.into(),
            options,
        }
    }
}

#[async_trait]
impl LanguageModel for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.client
            .generate(&self.model, prompt, &self.options)
            .await
    }
}
