use std::collections::HashMap;
use std::time::Duration;

use linkdigest::constants::{
    DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL, OLLAMA_MODEL_ENV_NAME, OLLAMA_URL_ENV_NAME,
};
use linkdigest::{DigestLimits, OllamaConfig};
use spectral::prelude::*;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();
    move |name: &str| vars.get(name).cloned()
}

#[test]
fn unset_variables_fall_back_to_defaults() {
    let config = OllamaConfig::from_lookup(lookup(&[])).expect("Expected default config.");

    assert_that(&config.endpoint.as_str()).is_equal_to(DEFAULT_OLLAMA_URL);
    assert_that(&config.model.as_str()).is_equal_to(DEFAULT_OLLAMA_MODEL);
    assert_that(&config.timeout).is_equal_to(Duration::from_secs(30));
}

#[test]
fn variables_override_defaults() {
    let config = OllamaConfig::from_lookup(lookup(&[
        (OLLAMA_URL_ENV_NAME, "http://gpu-box:11434/api/generate"),
        (OLLAMA_MODEL_ENV_NAME, "qwen2.5:7b"),
    ]))
    .expect("Expected config.");

    assert_that(&config.endpoint.as_str()).is_equal_to("http://gpu-box:11434/api/generate");
    assert_that(&config.model.as_str()).is_equal_to("qwen2.5:7b");
}

#[test]
fn blank_variables_count_as_unset() {
    let config = OllamaConfig::from_lookup(lookup(&[
        (OLLAMA_URL_ENV_NAME, "  "),
        (OLLAMA_MODEL_ENV_NAME, ""),
    ]))
    .expect("Expected default config.");

    assert_that(&config.endpoint.as_str()).is_equal_to(DEFAULT_OLLAMA_URL);
    assert_that(&config.model.as_str()).is_equal_to(DEFAULT_OLLAMA_MODEL);
}

#[test]
fn invalid_endpoint_is_rejected() {
    let result = OllamaConfig::from_lookup(lookup(&[(OLLAMA_URL_ENV_NAME, "not a url")]));

    assert!(result.is_err());
}

#[test]
fn default_limits_match_resource_caps() {
    assert_that(&DigestLimits::default()).is_equal_to(DigestLimits {
        max_links: 100,
        max_chars: 3000,
        max_articles: 3,
    });
}
