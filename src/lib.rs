//! The linkdigest library fetches web pages, lets an LLM pick the AI news links
//! among them and summarizes the picked articles into a markdown report.

pub mod classify;
pub mod config;
pub mod constants;
pub mod digest;
pub mod fetch;
pub mod inference;
pub mod page;
pub mod prompt;

pub use classify::{ClassifiedLink, parse_classification, strip_fences};
pub use config::{DigestLimits, OllamaConfig};
pub use digest::{DigestContext, DigestOutcome, chat, extract_ai_news, run_digest, summarize_site};
pub use fetch::{Fetch, FetchError, PageFetcher};
pub use inference::{
    ChatClient, Generate, Inference, InferenceError, OllamaClient, generate_raw,
    generate_text,
};
pub use page::Page;
