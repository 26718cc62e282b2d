use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use rss_items::config::Config;
use rss_items::feed::{DisplayItem, FeedFetcher, FeedPipeline};
use rss_items::output::{render_json, render_text, ReadMoreText};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Text,
}

#[derive(Parser, Debug)]
#[command(
    name = "rss-items",
    about = "Fetch an RSS feed and print its items with excerpts and thumbnails"
)]
struct Args {
    /// Feed URL (overrides `url` from the config file)
    url: Option<String>,

    /// Config file (default: ~/.config/rss-items/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Read feed XML from a local file instead of fetching
    #[arg(long, value_name = "FILE", conflicts_with = "url")]
    file: Option<PathBuf>,

    /// Maximum number of items (0 or negative shows none)
    #[arg(long, allow_negative_numbers = true)]
    max: Option<i64>,

    /// Maximum title length in characters (0 disables truncation)
    #[arg(long)]
    max_title_length: Option<usize>,

    /// Maximum excerpt length in characters (0 disables truncation)
    #[arg(long)]
    max_excerpt_length: Option<usize>,

    /// Take images only from the first <img> of this item field
    #[arg(long, value_name = "FIELD")]
    image_field: Option<String>,

    /// Include read-more links
    #[arg(long)]
    show_read_more: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Fail on fetch errors instead of printing an error item
    #[arg(long)]
    strict: bool,
}

impl Args {
    fn apply_to(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.url = Some(url.clone());
        }
        if let Some(max) = self.max {
            config.max_items = Some(max);
        }
        if let Some(len) = self.max_title_length {
            config.max_title_length = len;
        }
        if let Some(len) = self.max_excerpt_length {
            config.max_excerpt_length = len;
        }
        if let Some(field) = &self.image_field {
            config.image_field = Some(field.clone());
        }
        if self.show_read_more {
            config.show_read_more = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the rendered items
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match args.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => Config::default(),
    };
    args.apply_to(&mut config);

    let pipeline = FeedPipeline::new(config.pipeline_options());

    let items = if let Some(file) = &args.file {
        let xml = tokio::fs::read(file)
            .await
            .with_context(|| format!("Failed to read feed file: {}", file.display()))?;
        pipeline
            .build_from_xml(&xml)
            .with_context(|| format!("Failed to build items from {}", file.display()))?
    } else {
        let url = config
            .url
            .clone()
            .context("No feed URL given: pass one as an argument or set `url` in the config file")?;
        fetch_items(&pipeline, &config, &url, args.strict).await?
    };

    let read_more = ReadMoreText::from_config(&config);
    match args.format {
        Format::Json => println!(
            "{}",
            render_json(&items, read_more.as_ref()).context("Failed to serialize items")?
        ),
        Format::Text => print!("{}", render_text(&items, read_more.as_ref())),
    }

    Ok(())
}

/// Fetches and builds the feed, substituting an error item when the fetch fails.
async fn fetch_items(
    pipeline: &FeedPipeline,
    config: &Config,
    url: &str,
    strict: bool,
) -> Result<Vec<DisplayItem>> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("rss-items/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")?;
    let fetcher = FeedFetcher::new(client).with_timeout(config.request_timeout());

    match fetcher.fetch(url).await {
        Ok(xml) => pipeline
            .build_from_xml(&xml)
            .with_context(|| format!("Failed to build items from {url}")),
        Err(e) if strict => Err(e).with_context(|| format!("Failed to fetch {url}")),
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Feed fetch failed, showing error item");
            Ok(pipeline.error_items(&e.to_string())?)
        }
    }
}
