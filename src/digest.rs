//! The digest module runs the AI news pipeline: fetch a seed page, let the
//! model pick the relevant links, then fetch and summarize a bounded number of
//! them one after another.

use std::fmt;

use log::info;

use crate::classify::{ClassifyError, parse_classification};
use crate::config::DigestLimits;
use crate::constants::{
    NO_LINKS_MESSAGE, NO_RELEVANT_LINKS_MESSAGE, RAW_EXCERPT_CHARS, REPORT_HEADING,
};
use crate::fetch::Fetch;
use crate::inference::{Generate, generate_raw, generate_text, strip_reasoning};
use crate::page::Page;
use crate::prompt::{
    build_chat_prompt, build_link_classification_prompt, build_site_summary_prompt,
    build_summary_prompt, truncate_chars,
};

/// Collaborators and caps shared by all pipeline runs.
pub struct DigestContext<'a, F, G> {
    /// Page source for the seed page and every selected article.
    pub fetcher: &'a F,
    /// Backend used for classification and summaries.
    pub generator: &'a G,
    pub limits: DigestLimits,
}

/// One summarized article of a report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArticleSummary {
    pub title: String,
    pub url: String,
    pub summary: String,
}

/// Terminal state of a digest run. Its `Display` form is the text shown to users.
#[derive(Debug)]
pub enum DigestOutcome {
    /// The seed page had no links (or could not be fetched).
    NoLinks,
    /// The model answered with an empty link list.
    NoRelevantLinks,
    /// The model's answer could not be decoded. `raw` is the answer untouched.
    ParseFailure { error: ClassifyError, raw: String },
    /// Summaries in classification order.
    Report(Vec<ArticleSummary>),
}

impl fmt::Display for DigestOutcome {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DigestOutcome::NoLinks => write!(formatter, "{NO_LINKS_MESSAGE}"),
            DigestOutcome::NoRelevantLinks => write!(formatter, "{NO_RELEVANT_LINKS_MESSAGE}"),
            DigestOutcome::ParseFailure { error, raw } => write!(
                formatter,
                "Error parsing AI response: {error}\n\nRaw response: {}...",
                truncate_chars(raw, RAW_EXCERPT_CHARS)
            ),
            DigestOutcome::Report(articles) => write!(formatter, "{}", render_report(articles)),
        }
    }
}

/// Renders the markdown report: a heading, then per article a title heading,
/// the URL line, the summary and a separator.
pub fn render_report(articles: &[ArticleSummary]) -> String {
    let mut lines = vec![REPORT_HEADING.to_string()];

    for article in articles {
        lines.push(format!("## {}", article.title));
        lines.push(format!("**URL**: {}\n", article.url));
        lines.push(article.summary.clone());
        lines.push("\n---\n".to_string());
    }

    lines.join("\n")
}

/// Runs the pipeline against `url`.
pub async fn run_digest<F: Fetch, G: Generate>(
    ctx: &DigestContext<'_, F, G>,
    url: &str,
) -> DigestOutcome {
    info!("Fetching webpage: {url}");
    let seed = Page::load(ctx.fetcher, url).await;
    if seed.links.is_empty() {
        return DigestOutcome::NoLinks;
    }

    info!("Identifying AI news links...");
    let prompt = build_link_classification_prompt(&seed, ctx.limits.max_links);
    let raw = generate_raw(ctx.generator, &prompt).await;

    let links = match parse_classification(&strip_reasoning(&raw)) {
        Ok(links) => links,
        Err(error) => return DigestOutcome::ParseFailure { error, raw },
    };
    if links.is_empty() {
        return DigestOutcome::NoRelevantLinks;
    }
    info!("Found {} relevant AI news links", links.len());

    let mut articles = Vec::new();
    for link in links.into_iter().take(ctx.limits.max_articles) {
        info!("Fetching content from: {}", link.url);
        let article = Page::load(ctx.fetcher, &link.url).await;
        let summary = generate_text(
            ctx.generator,
            &build_summary_prompt(&article, ctx.limits.max_chars),
        )
        .await;

        articles.push(ArticleSummary {
            title: article.title,
            url: link.url,
            summary,
        });
    }

    DigestOutcome::Report(articles)
}

/// Runs the pipeline and returns either the report or the reason there is none.
pub async fn extract_ai_news<F: Fetch, G: Generate>(
    ctx: &DigestContext<'_, F, G>,
    url: &str,
) -> String {
    run_digest(ctx, url).await.to_string()
}

/// A markdown summary of a single website.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SiteSummary {
    pub title: String,
    pub summary: String,
}

/// Fetches `url` and asks the model for a short markdown summary of it.
pub async fn summarize_site<F: Fetch, G: Generate>(
    fetcher: &F,
    generator: &G,
    url: &str,
) -> SiteSummary {
    let page = Page::load(fetcher, url).await;
    info!("Analyzing website: {}", page.title);

    let summary = generate_text(generator, &build_site_summary_prompt(&page)).await;

    SiteSummary {
        title: page.title,
        summary,
    }
}

/// Answers a single chat message.
pub async fn chat<G: Generate>(generator: &G, message: &str) -> String {
    generate_text(generator, &build_chat_prompt(message)).await
}
