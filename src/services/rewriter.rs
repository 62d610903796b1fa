use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::utils::config::RewriteConfig;
use crate::utils::error::RewriteError;

pub const RULE_BASED_LABEL: &str = "rule-based";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 160,
            temperature: 0.7,
            top_p: 0.9,
        }
    }
}

/// Out-of-process text generation. Output is untrusted and must be
/// censored again by the caller.
#[async_trait]
pub trait TextRewriter: Send + Sync {
    fn model_id(&self) -> &str;

    async fn rewrite(&self, prompt: &str, params: &GenerationParams)
    -> Result<String, RewriteError>;
}

/// Talks to a text-generation-inference style `POST` endpoint.
pub struct HttpRewriter {
    client: Client,
    endpoint: Url,
    model_id: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    inputs: &'a str,
    parameters: GenerateParameters,
}

#[derive(Serialize)]
struct GenerateParameters {
    max_new_tokens: u32,
    temperature: f32,
    top_p: f32,
    do_sample: bool,
}

#[derive(Deserialize)]
struct Generation {
    generated_text: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GenerateResponse {
    Single(Generation),
    Batch(Vec<Generation>),
}

impl GenerateResponse {
    fn into_text(self) -> Option<String> {
        match self {
            GenerateResponse::Single(generation) => Some(generation.generated_text),
            GenerateResponse::Batch(generations) => generations
                .into_iter()
                .next()
                .map(|generation| generation.generated_text),
        }
    }
}

impl HttpRewriter {
    pub fn new(
        endpoint: &str,
        model_id: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RewriteError> {
        let endpoint = Url::parse(endpoint).map_err(|_| RewriteError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
        })?;
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            endpoint,
            model_id: model_id.into(),
            timeout,
        })
    }

    fn map_transport(&self, err: reqwest::Error) -> RewriteError {
        if err.is_timeout() {
            RewriteError::Timeout {
                millis: self.timeout.as_millis(),
            }
        } else {
            RewriteError::Http(err)
        }
    }
}

#[async_trait]
impl TextRewriter for HttpRewriter {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn rewrite(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<String, RewriteError> {
        let request = GenerateRequest {
            model: &self.model_id,
            inputs: prompt,
            parameters: GenerateParameters {
                max_new_tokens: params.max_new_tokens,
                temperature: params.temperature,
                top_p: params.top_p,
                do_sample: true,
            },
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RewriteError::Status {
                status: status.as_u16(),
            });
        }

        let body: GenerateResponse = response.json().await.map_err(|e| self.map_transport(e))?;

        body.into_text()
            .filter(|text| !text.trim().is_empty())
            .ok_or(RewriteError::EmptyOutput)
    }
}

/// Whether replies go through the rewrite service. Decided once at startup.
#[derive(Clone)]
pub enum RewriteCapability {
    Available(Arc<dyn TextRewriter>),
    Unavailable { reason: String },
}

impl RewriteCapability {
    pub fn from_config(config: &RewriteConfig) -> Self {
        if !config.enabled {
            return RewriteCapability::Unavailable {
                reason: "rewrite disabled by configuration".to_string(),
            };
        }

        let Some(endpoint) = config.endpoint.as_deref() else {
            return RewriteCapability::Unavailable {
                reason: "no rewrite endpoint configured".to_string(),
            };
        };

        match HttpRewriter::new(endpoint, config.model_id.clone(), config.timeout) {
            Ok(rewriter) => {
                tracing::info!(
                    "Rewrite service configured: model={}, endpoint={}",
                    config.model_id,
                    endpoint
                );
                RewriteCapability::Available(Arc::new(rewriter))
            }
            Err(e) => {
                tracing::warn!("Failed to initialize rewrite service: {}. Using rule-based replies", e);
                RewriteCapability::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Model identifier for the health endpoint.
    pub fn model_label(&self) -> &str {
        match self {
            RewriteCapability::Available(rewriter) => rewriter.model_id(),
            RewriteCapability::Unavailable { .. } => RULE_BASED_LABEL,
        }
    }
}
