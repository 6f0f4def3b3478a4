pub const OLLAMA_URL_ENV_NAME: &str = "OLLAMA_URL";
pub const OLLAMA_MODEL_ENV_NAME: &str = "OLLAMA_MODEL";
pub const MODEL_API_KEY_ENV_NAME: &str = "LINKDIGEST_MODEL_API_KEY";

pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2:latest";
pub const DEFAULT_SEED_URL: &str = "https://bair.berkeley.edu/blog/";

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36";

pub const FETCH_TIMEOUT_SECS: u64 = 10;
pub const INFERENCE_TIMEOUT_SECS: u64 = 30;

pub const MAX_CLASSIFIED_LINKS: usize = 100;
pub const MAX_ARTICLE_CHARS: usize = 3000;
pub const MAX_ARTICLES: usize = 3;
pub const RAW_EXCERPT_CHARS: usize = 200;

pub const NO_TITLE: &str = "No title found";
pub const FETCH_ERROR_TITLE: &str = "Error fetching page";
pub const NO_RESPONSE: &str = "No response generated";

pub const NO_LINKS_MESSAGE: &str = "No links found on the webpage.";
pub const NO_RELEVANT_LINKS_MESSAGE: &str = "No relevant AI news links found on this page.";
pub const REPORT_HEADING: &str = "# AI News Summary\n";

pub const CHAT_SYSTEM_MESSAGE: &str = "You are a helpful assistant";

pub(crate) const THINK_STRIPPER: &str = r"<think>[\s\S]*</think>\s*";
