#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::pin::Pin;

use linkdigest::{Fetch, FetchError, Generate, InferenceError};
use llm::{
    chat::{ChatMessage, ChatProvider, ChatResponse, Tool},
    error::LLMError,
};
use reqwest::StatusCode;

/// Generates one test per case, each running `response` through a stubbed
/// chat backend and comparing the cleaned output with `result`.
#[macro_export]
macro_rules! assert_responses {
    (
        $(
            $test_name:ident : response => $response:expr, result => $result:expr
        ),+ $(,)?
    ) => {
        $(
            #[tokio::test]
            async fn $test_name() {
                let client = linkdigest::ChatClient::new(Box::new(StubLlmProvider::new(
                    $response.to_owned(),
                )));
                let result = linkdigest::generate_text(&client, "").await;

                assert_that(&result).is_equal_to($result.to_owned());
            }
        )+
    }
}

/// Generates one test per case checking what `strip_fences` keeps of `raw`.
#[macro_export]
macro_rules! assert_fences {
    (
        $(
            $test_name:ident : raw => $raw:expr, stripped => $stripped:expr
        ),+ $(,)?
    ) => {
        $(
            #[test]
            fn $test_name() {
                assert_that(&linkdigest::strip_fences($raw)).is_equal_to($stripped);
            }
        )+
    }
}

/// Serves canned HTML per URL and records every requested URL.
#[derive(Default)]
pub(crate) struct StubFetcher {
    pages: HashMap<String, String>,
    pub requested: RefCell<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl Fetch for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requested.borrow_mut().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: StatusCode::NOT_FOUND,
            })
    }
}

pub(crate) const STUB_SUMMARY: &str = "Stub summary.";

/// Answers prompts from a queue, then with [`STUB_SUMMARY`], recording prompts.
#[derive(Default)]
pub(crate) struct StubGenerator {
    responses: RefCell<VecDeque<Result<String, InferenceError>>>,
    pub prompts: RefCell<Vec<String>>,
}

impl StubGenerator {
    pub fn new(responses: Vec<Result<String, InferenceError>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn answering(response: &str) -> Self {
        Self::new(vec![Ok(response.to_string())])
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().clone()
    }
}

impl Generate for StubGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(STUB_SUMMARY.to_string()))
    }
}

/// Minimal HTML page with a title, a paragraph and the given anchors.
pub(crate) fn html_page(title: &str, body: &str, hrefs: &[&str]) -> String {
    let anchors = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{href}">link</a>"#))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "<html><head><title>{title}</title></head><body><p>{body}</p>\n{anchors}</body></html>"
    )
}

/// Chat answer carrying a fixed text.
#[derive(Debug)]
struct StubChatResponse(String);

impl ChatResponse for StubChatResponse {
    fn text(&self) -> Option<String> {
        Some(self.0.clone())
    }

    fn tool_calls(&self) -> Option<Vec<llm::ToolCall>> {
        None
    }

    fn thinking(&self) -> Option<String> {
        None
    }

    fn usage(&self) -> Option<llm::chat::Usage> {
        None
    }
}

impl std::fmt::Display for StubChatResponse {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.0)
    }
}

type ChatFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Box<dyn ChatResponse>, LLMError>> + Send + 'a>>;

/// `llm` chat backend that answers every conversation with the same text.
pub(crate) struct StubLlmProvider {
    answer: String,
}

impl StubLlmProvider {
    pub fn new(answer: String) -> Self {
        StubLlmProvider { answer }
    }
}

// Signatures spell out what `#[async_trait]` expands to.
impl ChatProvider for StubLlmProvider {
    fn chat<'life0, 'life1, 'async_trait>(
        &'life0 self,
        _messages: &'life1 [ChatMessage],
    ) -> ChatFuture<'async_trait>
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        let answer = self.answer.clone();
        Box::pin(async move { Ok(Box::new(StubChatResponse(answer)) as Box<dyn ChatResponse>) })
    }

    fn chat_with_tools<'life0, 'life1, 'life2, 'async_trait>(
        &'life0 self,
        messages: &'life1 [ChatMessage],
        _tools: Option<&'life2 [Tool]>,
    ) -> ChatFuture<'async_trait>
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        'life2: 'async_trait,
        Self: 'async_trait,
    {
        self.chat(messages)
    }
}
