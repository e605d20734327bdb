use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

use crate::{config::GeneratorConfig, errors::AppError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const MAX_NEW_TOKENS: u32 = 500;
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// The service answered with a non-success status.
    #[error("generator returned {status}")]
    Upstream { status: u16, message: Option<String> },
    /// No usable response reached us.
    #[error("generator unreachable: {0}")]
    Transport(String),
    #[error("generator returned no text")]
    Empty,
}

impl From<GenerationError> for AppError {
    fn from(e: GenerationError) -> Self {
        match e {
            GenerationError::Upstream { status, message } => AppError::Upstream {
                status,
                message: message
                    .unwrap_or_else(|| "Failed to fetch template suggestions".into()),
            },
            GenerationError::Transport(_) => AppError::Upstream {
                status: 502,
                message: "No response from text generation API".into(),
            },
            GenerationError::Empty => AppError::Upstream {
                status: 500,
                message: "No suggestions generated".into(),
            },
        }
    }
}

/// Prompt in, generated text out. Exactly one attempt per call.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

pub fn build_prompt(website_type: &str, industry: &str) -> String {
    format!(
        "Provide a list of 5 website template suggestions for a user who wants to create a \
         {website_type} website in the {industry} industry. For each template, include the \
         following details:\n\n\
         1. Template Name\n\
         2. Description\n\
         3. Key Features\n\
         4. Recommended Use Cases\n\n\
         Format the response in a clear and organized manner."
    )
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
}

#[derive(Debug, Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

#[derive(Debug, Deserialize)]
struct InferenceError {
    error: String,
}

fn first_generated_text(outputs: Vec<GeneratedText>) -> Option<String> {
    outputs
        .into_iter()
        .next()
        .map(|o| o.generated_text.trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Client for a Hugging Face style inference endpoint.
#[derive(Clone)]
pub struct HuggingFaceGenerator {
    client: reqwest::Client,
    api_url: String,
    api_token: Option<String>,
}

impl HuggingFaceGenerator {
    pub fn new(cfg: &GeneratorConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("build generator http client")?;
        Ok(Self {
            client,
            api_url: cfg.api_url.clone(),
            api_token: cfg.api_token.clone(),
        })
    }
}

impl std::fmt::Debug for HuggingFaceGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceGenerator")
            .field("api_url", &self.api_url)
            .field("api_token", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl TextGenerator for HuggingFaceGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let mut req = self.client.post(&self.api_url).json(&InferenceRequest {
            inputs: prompt,
            parameters: InferenceParameters {
                max_new_tokens: MAX_NEW_TOKENS,
                temperature: TEMPERATURE,
            },
        });
        if let Some(token) = &self.api_token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(|e| {
            error!(error = %e, "generator request failed");
            GenerationError::Transport(e.to_string())
        })?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.json::<InferenceError>().await.ok().map(|e| e.error);
            error!(status = %status, message = ?message, "generator error response");
            return Err(GenerationError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let outputs: Vec<GeneratedText> = resp.json().await.map_err(|e| {
            error!(error = %e, "generator response not understood");
            GenerationError::Transport(e.to_string())
        })?;
        debug!(count = outputs.len(), "generator responded");
        first_generated_text(outputs).ok_or(GenerationError::Empty)
    }
}
