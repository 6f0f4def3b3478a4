//! linkdigest is a CLI tool that finds AI news among the links of a webpage
//! and summarizes them with an LLM.
//!
//! Without a subcommand it runs the digest pipeline on the given URL (or a
//! default seed page). Two more commands are available:
//! 1. `summarize` - Summarizes a single website in markdown
//! 2. `chat` - Answers a single message

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use env_logger::{Builder, Target};
use log::{LevelFilter, info};
use url::Url;

use linkdigest::{
    ChatClient, DigestContext, DigestLimits, Inference, OllamaClient, OllamaConfig, PageFetcher,
    chat, constants::DEFAULT_SEED_URL, constants::MODEL_API_KEY_ENV_NAME, extract_ai_news,
    summarize_site,
};

/// A CLI tool to digest AI news linked from a webpage
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Seed page to harvest links from
    url: Option<String>,

    /// The command to execute (digest, summarize or chat)
    #[command(subcommand)]
    command: Option<Command>,

    #[arg(long, short, action = clap::ArgAction::Count, help = "Output v(v...)erbosity: error (0), warn (1), info (2), debug (3), trace (4)", global = true, default_value_t = 2)]
    verbose: u8,

    #[command(flatten)]
    backend: BackendArgs,

    #[command(flatten)]
    limits: LimitArgs,
}

#[derive(Args)]
struct BackendArgs {
    /// Ollama generate endpoint (overrides OLLAMA_URL)
    #[arg(long, global = true)]
    endpoint: Option<String>,
    /// Ollama model name (overrides OLLAMA_MODEL)
    #[arg(long, global = true)]
    ollama_model: Option<String>,
    /// URL of an LLM model to use instead of Ollama, e.g. openai://gpt-4o-mini
    #[arg(long, short, global = true)]
    model: Option<String>,
}

#[derive(Args)]
struct LimitArgs {
    /// Maximum number of links submitted for classification
    #[arg(long, global = true, default_value_t = DigestLimits::default().max_links)]
    max_links: usize,
    /// Maximum number of article characters submitted for summarization
    #[arg(long, global = true, default_value_t = DigestLimits::default().max_chars)]
    max_chars: usize,
    /// Maximum number of articles fetched and summarized
    #[arg(long, global = true, default_value_t = DigestLimits::default().max_articles)]
    max_articles: usize,
}

#[derive(Subcommand)]
enum Command {
    /// Find AI news links on a page and summarize them
    Digest {
        /// Seed page to harvest links from
        url: Option<String>,
    },
    /// Summarize a single website in markdown
    Summarize {
        /// The page to summarize
        url: String,
    },
    /// Send a single message to the model and print the answer
    Chat {
        /// The message to send
        message: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    Builder::new()
        .target(Target::Stdout)
        .filter_level(match cli.verbose {
            0 => LevelFilter::Error,
            1 => LevelFilter::Warn,
            2 => LevelFilter::Info,
            3 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .init();

    let inference = build_inference(&cli.backend)?;
    let fetcher = PageFetcher::new().context("Failed to build HTTP client")?;
    let limits = DigestLimits {
        max_links: cli.limits.max_links,
        max_chars: cli.limits.max_chars,
        max_articles: cli.limits.max_articles,
    };

    match cli.command {
        None => handle_digest_command(&fetcher, &inference, limits, cli.url).await,
        Some(Command::Digest { url }) => {
            handle_digest_command(&fetcher, &inference, limits, url).await
        }
        Some(Command::Summarize { url }) => {
            let site = summarize_site(&fetcher, &inference, &url).await;
            println!("\nSummary of {}:", site.title);
            println!("{}", site.summary);
        }
        Some(Command::Chat { message }) => println!("{}", chat(&inference, &message).await),
    }

    Ok(())
}

async fn handle_digest_command(
    fetcher: &PageFetcher,
    inference: &Inference,
    limits: DigestLimits,
    url: Option<String>,
) {
    let url = url.unwrap_or_else(|| DEFAULT_SEED_URL.to_string());
    let ctx = DigestContext {
        fetcher,
        generator: inference,
        limits,
    };

    let report = extract_ai_news(&ctx, &url).await;
    println!("\n{report}");
}

fn build_inference(args: &BackendArgs) -> Result<Inference> {
    if let Some(model) = &args.model {
        let api_key = std::env::var(MODEL_API_KEY_ENV_NAME).ok();
        if api_key.is_some() {
            info!("API key is provided via {MODEL_API_KEY_ENV_NAME}");
        }
        return Ok(Inference::Chat(ChatClient::from_model_url(model, api_key)?));
    }

    let mut config = OllamaConfig::from_env()?;
    if let Some(endpoint) = &args.endpoint {
        config.endpoint = Url::parse(endpoint)
            .map_err(|e| anyhow::anyhow!("Invalid endpoint url: {}", e))?;
    }
    if let Some(model) = &args.ollama_model {
        config.model = model.clone();
    }

    let client = OllamaClient::new(config).context("Failed to build Ollama client")?;
    info!("Using Ollama model {}", client.model());
    Ok(Inference::Ollama(client))
}
