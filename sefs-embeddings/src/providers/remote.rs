use async_trait::async_trait;
use sefs_core::errors::{ProviderError, SefsResult};
use serde_json::json;

use super::RawProvider;

/// Small table of known remote embedding models → output dimension, so the
/// engine can pick `expected_dim()` without a network round trip.
fn known_dim_for_model(model: &str) -> Option<usize> {
    match model {
        "text-embedding-3-small" => Some(1536),
        "text-embedding-3-large" => Some(3072),
        "text-embedding-ada-002" => Some(1536),
        _ => None,
    }
}

/// Talks to a hosted OpenAI-compatible embeddings/chat API.
pub struct RemoteProvider {
    client: reqwest::Client,
    api_key: String,
    embed_model: String,
    llm_model: String,
    base_url: String,
}

impl RemoteProvider {
    pub fn new(api_key: impl Into<String>, embed_model: impl Into<String>, llm_model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            embed_model: embed_model.into(),
            llm_model: llm_model.into(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }
}

#[async_trait]
impl RawProvider for RemoteProvider {
    async fn embed_raw(&self, text: &str) -> SefsResult<Vec<f32>> {
        if self.api_key.is_empty() {
            return Err(ProviderError::MissingCredentials {
                provider: "remote".to_string(),
            }
            .into());
        }
        let resp = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({ "model": self.embed_model, "input": text }))
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed {
                provider: "remote".to_string(),
                reason: e.to_string(),
            })?;
        if !resp.status().is_success() {
            return Err(ProviderError::RequestFailed {
                provider: "remote".to_string(),
                reason: format!("status {}", resp.status()),
            }
            .into());
        }
        let body: serde_json::Value = resp.json().await.map_err(|e| ProviderError::RequestFailed {
            provider: "remote".to_string(),
            reason: e.to_string(),
        })?;
        let embedding = body
            .get("data")
            .and_then(|v| v.as_array())
            .and_then(|arr| arr.first())
            .and_then(|first| first.get("embedding"))
            .and_then(|v| v.as_array())
            .ok_or_else(|| ProviderError::RequestFailed {
                provider: "remote".to_string(),
                reason: "response missing data[0].embedding".to_string(),
            })?
            .iter()
            .filter_map(|v| v.as_f64())
            .map(|v| v as f32)
            .collect();
        Ok(embedding)
    }

    async fn summarize_raw(&self, text: &str) -> SefsResult<String> {
        if self.api_key.is_empty() {
            return Err(ProviderError::MissingCredentials {
                provider: "remote".to_string(),
            }
            .into());
        }
        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.llm_model,
                "messages": [
                    {"role": "system", "content": "Summarize the user's text in one or two sentences."},
                    {"role": "user", "content": text},
                ],
            }))
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed {
                provider: "remote".to_string(),
                reason: e.to_string(),
            })?;
        if !resp.status().is_success() {
            return Err(ProviderError::RequestFailed {
                provider: "remote".to_string(),
                reason: format!("status {}", resp.status()),
            }
            .into());
        }
        let body: serde_json::Value = resp.json().await.map_err(|e| ProviderError::RequestFailed {
            provider: "remote".to_string(),
            reason: e.to_string(),
        })?;
        body.get("choices")
            .and_then(|v| v.as_array())
            .and_then(|arr| arr.first())
            .and_then(|first| first.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| {
                ProviderError::RequestFailed {
                    provider: "remote".to_string(),
                    reason: "response missing choices[0].message.content".to_string(),
                }
                .into()
            })
    }

    fn model_tag(&self) -> String {
        format!("remote/{}", self.embed_model)
    }

    fn known_dim(&self) -> Option<usize> {
        Some(known_dim_for_model(&self.embed_model).unwrap_or(1536))
    }
}
