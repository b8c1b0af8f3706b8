//! Ollama-compatible text generation client

use super::service::CoachTextGenerator;
use crate::config::CoachConfig;
use crate::error::GeneratorError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::future::Future;

const PROMPT_PREAMBLE: &str = "You are a cognitive intelligence coach. You are systemic, calm, intelligent, and slightly mysterious. You provide grounded, analytical insights — never robotic. Respond with exactly 4 sections, each on a new line prefixed with the label:

INSIGHT: (2-3 sentences about the user's current cognitive state)
PROTECTION: (1 concrete strategy to protect cognitive capacity)
OPTIMIZATION: (1 performance optimization recommendation)
RISK: (1 risk warning if applicable, or \"none\" if no risk detected)";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Client for a local `/api/generate` endpoint
#[derive(Debug, Clone)]
pub struct OllamaGenerator {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaGenerator {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    pub fn from_config(config: &CoachConfig) -> Self {
        Self::new(&config.endpoint, &config.model)
    }

    async fn generate(&self, context: &str) -> Result<String, GeneratorError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt: format!("{}\n\n{}", PROMPT_PREAMBLE, context),
            stream: false,
        };

        let response = self
            .client
            .post(format!("{}/api/generate", self.endpoint))
            .json(&request)
            .send()
            .await
            .map_err(|e| GeneratorError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeneratorError::Api(format!("HTTP {}", status)));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GeneratorError::Parse(e.to_string()))?;

        tracing::debug!(bytes = body.response.len(), "received generated coaching text");
        Ok(body.response)
    }
}

impl CoachTextGenerator for OllamaGenerator {
    fn try_generate(
        &self,
        context: &str,
    ) -> impl Future<Output = Result<String, GeneratorError>> + Send {
        self.generate(context)
    }
}
