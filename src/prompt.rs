//! Prompt construction. Every function here is a pure string builder.

use crate::constants::CHAT_SYSTEM_MESSAGE;
use crate::page::Page;

const LINK_CLASSIFICATION_PREAMBLE: &str = r#"You are provided with a list of links found on a webpage.
Identify only links that are relevant to artificial intelligence news, such as new research, product announcements, or industry developments.
Respond with valid JSON in this exact format:
{
    "links": [
        {"type": "News", "url": "https://example.com/news/new-model-release/"},
        {"type": "Research", "url": "https://example.com/research/open-weights-reasoning-model/"}
    ]
}"#;

const ARTICLE_SUMMARY_PREAMBLE: &str = "You are an AI news summarizer that creates concise summaries of artificial intelligence news articles. \
Focus on key information: what happened, which companies/technologies are involved, and why it matters. \
Use neutral language and include only factual information from the article.";

const SITE_SUMMARY_PREAMBLE: &str = "You are an assistant that analyzes the contents of a website \
and provides a short summary, ignoring text that might be navigation related. \
Respond in markdown.";

/// Asks the model to pick AI-news links out of the first `max_links` links of `page`.
pub fn build_link_classification_prompt(page: &Page, max_links: usize) -> String {
    let links = page
        .links
        .iter()
        .take(max_links)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{LINK_CLASSIFICATION_PREAMBLE}\n\n\
         Here is the list of links from {}.\n\
         Please identify only links that contain artificial intelligence news:\n\
         {links}",
        page.url
    )
}

/// Asks for a 3-5 sentence summary of the article, embedding at most
/// `max_chars` characters of its text.
pub fn build_summary_prompt(article: &Page, max_chars: usize) -> String {
    let text = truncate_chars(&article.text, max_chars);

    format!(
        "{ARTICLE_SUMMARY_PREAMBLE}\n\n\
         Summarize this AI news article in 3-5 sentences:\n\
         Title: {}\n\n\
         Content: {text}",
        article.title
    )
}

/// Asks for a short markdown summary of a whole website.
pub fn build_site_summary_prompt(page: &Page) -> String {
    format!(
        "{SITE_SUMMARY_PREAMBLE}\n\n\
         The contents of this website is as follows; please provide a short summary of this website in markdown. \
         If it includes news or announcements, then summarize these too.\n\n\
         {}",
        page.contents()
    )
}

/// Wraps a single user message in a minimal conversation frame.
pub fn build_chat_prompt(message: &str) -> String {
    format!("{CHAT_SYSTEM_MESSAGE}\n\nUser: {message}\nAssistant:")
}

/// Returns the first `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => text.get(..index).unwrap_or(text),
        None => text,
    }
}
