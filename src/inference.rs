//! The inference module sends prompts to a text-generation backend.
//!
//! Two backends are provided: [`OllamaClient`] talks to an Ollama-compatible
//! `/api/generate` endpoint directly, [`ChatClient`] wraps any chat provider
//! from the `llm` crate. [`generate_text`] and [`generate_raw`] are what
//! pipelines call: they never fail and substitute a descriptive string for
//! any error.

use std::str::FromStr;

use anyhow::{Context, anyhow};
use llm::builder::{LLMBackend, LLMBuilder};
use llm::chat::{ChatMessage, ChatProvider, ChatResponse};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::OllamaConfig;
use crate::constants::{NO_RESPONSE, THINK_STRIPPER};

static THINK_STRIPPER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(THINK_STRIPPER).expect("Failed to compile THINK_STRIPPER regex"));

/// Failure to obtain generated text.
#[derive(Debug, Error)]
pub enum InferenceError {
    /// Network failure, timeout or non-2xx status from the endpoint.
    #[error("Error calling Ollama API: {0}")]
    Transport(#[from] reqwest::Error),
    /// The endpoint answered with a body that is not the expected envelope.
    #[error("Error: Invalid response from Ollama")]
    InvalidResponse(#[source] serde_json::Error),
    /// An `llm` crate backend reported an error.
    #[error("Error calling LLM provider: {0}")]
    Provider(String),
}

/// A text-generation backend.
#[allow(async_fn_in_trait)]
pub trait Generate {
    /// Generates a completion for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns an [`InferenceError`] when the backend cannot be reached or
    /// answers with something unusable.
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

/// Client for a non-streaming Ollama `/api/generate` endpoint.
#[derive(Clone, Debug)]
pub struct OllamaClient {
    client: Client,
    endpoint: Url,
    model: String,
}

impl OllamaClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialised.
    pub fn new(config: OllamaConfig) -> Result<Self, InferenceError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
            model: config.model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl Generate for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        debug!(
            "Sending {} chars to {} ({})",
            prompt.len(),
            self.endpoint,
            self.model
        );

        let body = self
            .client
            .post(self.endpoint.clone())
            .json(&GenerateRequest {
                model: &self.model,
                prompt,
                stream: false,
            })
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let envelope: GenerateResponse =
            serde_json::from_str(&body).map_err(InferenceError::InvalidResponse)?;

        Ok(envelope.response.unwrap_or_else(|| NO_RESPONSE.to_string()))
    }
}

/// Client for any chat backend supported by the `llm` crate.
pub struct ChatClient {
    model: Box<dyn ChatProvider>,
}

impl ChatClient {
    pub fn new(model: Box<dyn ChatProvider>) -> Self {
        Self { model }
    }

    /// Builds a client from a model URL such as `openai://gpt-4o-mini` or
    /// `ollama://llama3.2:latest`: the scheme names the backend, the host (plus
    /// an optional user part, joined by `:`) names the model.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL, the backend name or the model name is
    /// invalid, or the backend cannot be built.
    pub fn from_model_url(model: &str, api_key: Option<String>) -> anyhow::Result<Self> {
        let model_url = Url::parse(model).map_err(|e| anyhow!("Invalid model URL: {}", e))?;
        let llm_builder = LLMBuilder::new()
            .backend(
                LLMBackend::from_str(model_url.scheme())
                    .map_err(|e| anyhow!("Invalid LLM backend: {}", e))?,
            )
            .model(
                [
                    model_url
                        .host_str()
                        .context("Specify model name as host URL.")?,
                    model_url.username(),
                ]
                .iter()
                .filter(|x| !x.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join(":"),
            );

        let llm_builder = match api_key {
            Some(api_key) => llm_builder.api_key(api_key),
            None => llm_builder,
        };

        let model: Box<dyn ChatProvider> = llm_builder
            .build()
            .map_err(|e| anyhow!("Failed to build LLM model: {}", e))?;

        Ok(Self::new(model))
    }
}

impl Generate for ChatClient {
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        let messages = vec![ChatMessage::user().content(prompt).build()];

        let response = self
            .model
            .chat(&messages)
            .await
            .map_err(|err| InferenceError::Provider(err.to_string()))?;

        Ok(response.text().unwrap_or_else(|| NO_RESPONSE.to_string()))
    }
}

/// Backend selected at startup.
pub enum Inference {
    Ollama(OllamaClient),
    Chat(ChatClient),
}

impl Generate for Inference {
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        match self {
            Inference::Ollama(client) => client.generate(prompt).await,
            Inference::Chat(client) => client.generate(prompt).await,
        }
    }
}

/// Generates text for `prompt` exactly as the backend returned it, substituting
/// the error description on failure.
pub async fn generate_raw<G: Generate>(generator: &G, prompt: &str) -> String {
    match generator.generate(prompt).await {
        Ok(text) => text,
        Err(err) => {
            warn!("{err}");
            err.to_string()
        }
    }
}

/// Like [`generate_raw`], with reasoning blocks (`<think>...</think>`) and
/// surrounding whitespace removed.
pub async fn generate_text<G: Generate>(generator: &G, prompt: &str) -> String {
    strip_reasoning(&generate_raw(generator, prompt).await)
}

/// Removes `<think>` blocks and surrounding whitespace from model output.
pub fn strip_reasoning(text: &str) -> String {
    THINK_STRIPPER_REGEX
        .replace_all(text, "")
        .to_string()
        .trim()
        .to_owned()
}
