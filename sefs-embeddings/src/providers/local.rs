use async_trait::async_trait;
use sefs_core::errors::{ProviderError, SefsResult};
use serde_json::json;

use super::RawProvider;

/// Talks to a local Ollama-compatible embedding/chat host. The local
/// provider's output dimension isn't knowable ahead of time — it depends on
/// whatever model is pulled on the host — so `known_dim` always returns
/// `None` and the engine learns it from the first successful embed call.
pub struct LocalProvider {
    client: reqwest::Client,
    host: String,
    embed_model: String,
    llm_model: String,
}

impl LocalProvider {
    pub fn new(host: impl Into<String>, embed_model: impl Into<String>, llm_model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            host: host.into(),
            embed_model: embed_model.into(),
            llm_model: llm_model.into(),
        }
    }
}

#[async_trait]
impl RawProvider for LocalProvider {
    async fn embed_raw(&self, text: &str) -> SefsResult<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.host.trim_end_matches('/'));
        let resp = self
            .client
            .post(&url)
            .json(&json!({ "model": self.embed_model, "prompt": text }))
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed {
                provider: "local".to_string(),
                reason: e.to_string(),
            })?;
        if !resp.status().is_success() {
            return Err(ProviderError::RequestFailed {
                provider: "local".to_string(),
                reason: format!("status {}", resp.status()),
            }
            .into());
        }
        let body: serde_json::Value = resp.json().await.map_err(|e| ProviderError::RequestFailed {
            provider: "local".to_string(),
            reason: e.to_string(),
        })?;
        let embedding = body
            .get("embedding")
            .and_then(|v| v.as_array())
            .ok_or_else(|| ProviderError::RequestFailed {
                provider: "local".to_string(),
                reason: "response missing `embedding` array".to_string(),
            })?
            .iter()
            .filter_map(|v| v.as_f64())
            .map(|v| v as f32)
            .collect();
        Ok(embedding)
    }

    async fn summarize_raw(&self, text: &str) -> SefsResult<String> {
        let url = format!("{}/api/generate", self.host.trim_end_matches('/'));
        let prompt = format!(
            "Summarize the following text in one or two sentences:\n\n{text}"
        );
        let resp = self
            .client
            .post(&url)
            .json(&json!({ "model": self.llm_model, "prompt": prompt, "stream": false }))
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed {
                provider: "local".to_string(),
                reason: e.to_string(),
            })?;
        if !resp.status().is_success() {
            return Err(ProviderError::RequestFailed {
                provider: "local".to_string(),
                reason: format!("status {}", resp.status()),
            }
            .into());
        }
        let body: serde_json::Value = resp.json().await.map_err(|e| ProviderError::RequestFailed {
            provider: "local".to_string(),
            reason: e.to_string(),
        })?;
        body.get("response")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                ProviderError::RequestFailed {
                    provider: "local".to_string(),
                    reason: "response missing `response` field".to_string(),
                }
                .into()
            })
    }

    fn model_tag(&self) -> String {
        format!("local/{}", self.embed_model)
    }

    fn known_dim(&self) -> Option<usize> {
        None
    }
}
