use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Sampling parameters forwarded verbatim to `/api/generate`.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub num_predict: u32,
    pub top_p: f32,
    pub repeat_penalty: f32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            num_predict: 512,
            top_p: 0.9,
            repeat_penalty: 1.1,
        }
    }
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: &'a GenerationOptions,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// HTTP client for a local Ollama server. No retries anywhere; a
/// failed call propagates to the engine, which turns it into a
/// user-facing error message.
pub struct OllamaClient {
    base_url: String,
    http: reqwest::Client,
}

impl OllamaClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    pub async fn embed(&self, model: &str, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/api/embed", self.base_url);
        let request = EmbedRequest {
            model,
            input: texts,
        };
        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("embedding request to {url} failed"))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Ollama embed returned {status}: {body}"));
        }
        let parsed: EmbedResponse = response
            .json()
            .await
            .context("invalid embed response body")?;
        if parsed.embeddings.len() != texts.len() {
            return Err(anyhow!(
                "embed count mismatch: sent {}, received {}",
                texts.len(),
                parsed.embeddings.len()
            ));
        }
        debug!(model, count = texts.len(), "embedded batch");
        Ok(parsed.embeddings)
    }

    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
            options,
        };
        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("generation request to {url} failed"))?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Ollama generate returned {status}: {body}"));
        }
        let parsed: GenerateResponse = response
            .json()
            .await
            .context("invalid generate response body")?;
        debug!(model, chars = parsed.response.chars().count(), "generated answer");
        Ok(parsed.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_request_serializes_options_inline() {
        let options = GenerationOptions::default();
        let request = GenerateRequest {
            model: "qwen2.5:3b",
            prompt: "질문",
            stream: false,
            options: &options,
        };
        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["stream"], serde_json::json!(false));
        assert_eq!(value["options"]["num_predict"], serde_json::json!(512));
        // f32 -> f64 widening is inexact; compare with a tolerance
        let penalty = value["options"]["repeat_penalty"].as_f64().expect("penalty");
        assert!((penalty - 1.1).abs() < 1e-6);
    }

    #[test]
    fn embed_response_parses() {
        let body = r#"{"model":"bge-m3","embeddings":[[0.1,0.2],[0.3,0.4]]}"#;
        let parsed: EmbedResponse = serde_json::from_str(body).expect("parse");
        assert_eq!(parsed.embeddings.len(), 2);
    }
}
