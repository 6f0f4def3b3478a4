//! Runtime configuration, resolved once at process start and passed down explicitly.

use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

use crate::constants::{
    DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL, INFERENCE_TIMEOUT_SECS, MAX_ARTICLE_CHARS,
    MAX_ARTICLES, MAX_CLASSIFIED_LINKS, OLLAMA_MODEL_ENV_NAME, OLLAMA_URL_ENV_NAME,
};

/// Settings for an Ollama-compatible `/api/generate` endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OllamaConfig {
    /// Full URL of the generate endpoint.
    pub endpoint: Url,
    /// Model identifier sent with every request.
    pub model: String,
    /// Upper bound for a single generate call.
    pub timeout: Duration,
}

impl OllamaConfig {
    /// Reads the configuration from process environment, falling back to defaults
    /// for unset variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint variable holds an invalid URL.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`OllamaConfig::from_env`] with a custom variable source.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint value is not a valid URL.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup(OLLAMA_URL_ENV_NAME)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
        let model = lookup(OLLAMA_MODEL_ENV_NAME)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string());

        Ok(Self {
            endpoint: Url::parse(&endpoint)
                .with_context(|| format!("Invalid {OLLAMA_URL_ENV_NAME}: {endpoint}"))?,
            model,
            timeout: Duration::from_secs(INFERENCE_TIMEOUT_SECS),
        })
    }
}

/// Resource caps applied by the digest pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DigestLimits {
    /// Links submitted to the model for classification.
    pub max_links: usize,
    /// Characters of article text submitted for summarization.
    pub max_chars: usize,
    /// Classified links fetched and summarized per run.
    pub max_articles: usize,
}

impl Default for DigestLimits {
    fn default() -> Self {
        Self {
            max_links: MAX_CLASSIFIED_LINKS,
            max_chars: MAX_ARTICLE_CHARS,
            max_articles: MAX_ARTICLES,
        }
    }
}
