//! The page module turns fetched HTML into a [`Page`]: title, visible text and
//! absolute links.

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

use crate::constants::{FETCH_ERROR_TITLE, NO_TITLE};
use crate::fetch::Fetch;

static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("title").expect("Failed to parse title selector"));
static BODY_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body").expect("Failed to parse body selector"));
static BODY_TAG_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<body[\s>/]").expect("Failed to compile body tag regex"));
static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("Failed to parse anchor selector"));

/// Elements whose content never counts as visible text.
const NOISE_ELEMENTS: [&str; 4] = ["script", "style", "img", "input"];

/// A fetched and parsed web resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    /// Address the page was requested from.
    pub url: String,
    /// Document title or a sentinel.
    pub title: String,
    /// Visible body text, one text node per line. Empty when the source has
    /// no `<body>` tag.
    pub text: String,
    /// Absolute anchor targets in document order, duplicates kept.
    pub links: Vec<String>,
}

impl Page {
    /// Parses an HTML document fetched from `base_url`. Never fails: anything
    /// missing from the document becomes an empty or sentinel field.
    pub fn parse(html: &str, base_url: &str) -> Self {
        let document = Html::parse_document(html);

        Self {
            url: base_url.to_string(),
            title: parse_title(&document),
            text: if BODY_TAG_REGEX.is_match(html) {
                parse_text(&document)
            } else {
                String::new()
            },
            links: parse_links(&document, base_url),
        }
    }

    /// Page in the fetch-failure state.
    pub fn failed(url: &str) -> Self {
        Self {
            url: url.to_string(),
            title: FETCH_ERROR_TITLE.to_string(),
            text: String::new(),
            links: Vec::new(),
        }
    }

    /// Fetches and parses `url`. A fetch failure is logged and yields
    /// [`Page::failed`] instead of an error.
    pub async fn load<F: Fetch>(fetcher: &F, url: &str) -> Self {
        match fetcher.fetch(url).await {
            Ok(html) => Self::parse(&html, url),
            Err(err) => {
                warn!("Error fetching {url}: {err}");
                Self::failed(url)
            }
        }
    }

    /// Title and text rendered as a prompt-ready block.
    pub fn contents(&self) -> String {
        format!(
            "Webpage Title:\n{}\nWebpage Contents:\n{}\n\n",
            self.title, self.text
        )
    }
}

fn parse_title(document: &Html) -> String {
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|title| title.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string())
}

fn parse_text(document: &Html) -> String {
    let Some(body) = document.select(&BODY_SELECTOR).next() else {
        return String::new();
    };

    let mut lines = Vec::new();
    collect_text(body, &mut lines);
    lines.join("\n").trim().to_string()
}

fn collect_text<'a>(element: ElementRef<'a>, lines: &mut Vec<&'a str>) {
    for child in element.children() {
        if let Some(child_element) = ElementRef::wrap(child) {
            if !NOISE_ELEMENTS.contains(&child_element.value().name()) {
                collect_text(child_element, lines);
            }
        } else if let Node::Text(text) = child.value() {
            let text = text.trim();
            if !text.is_empty() {
                lines.push(text);
            }
        }
    }
}

fn parse_links(document: &Html, base_url: &str) -> Vec<String> {
    let base = Url::parse(base_url).ok();

    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter(|href| !href.is_empty())
        .filter_map(|href| resolve_link(base.as_ref(), href))
        .collect()
}

/// Resolves `href` against the page URL unless it is already absolute http(s).
fn resolve_link(base: Option<&Url>, href: &str) -> Option<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }

    let resolved = match base {
        Some(base) => base.join(href),
        None => Url::parse(href),
    };

    match resolved {
        Ok(url) => Some(url.to_string()),
        Err(err) => {
            debug!("Skipping unresolvable link {href}: {err}");
            None
        }
    }
}
