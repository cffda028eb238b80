use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use reqwest::redirect::Policy;
use secrecy::SecretString;
use tokio::sync::mpsc;
use url::Url;

use reel::api::{PageFetcher, VideoApi};
use reel::app::{App, AppEvent};
use reel::config::Config;
use reel::feed::SortOrder;
use reel::ui;

/// Get the config directory path (~/.config/reel/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("reel"))
}

/// Redirect policy with loop detection and limited hops.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }
        let url = attempt.url();
        for prev in attempt.previous() {
            if prev.as_str() == url.as_str() {
                return attempt.error("Redirect loop detected");
            }
        }
        attempt.follow()
    })
}

#[derive(Parser, Debug)]
#[command(name = "reel", about = "Terminal video feed browser")]
struct Args {
    /// Path to the config file (default: ~/.config/reel/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override the API base URL from the config file
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,

    /// Override the incremental page size
    #[arg(long, value_name = "N")]
    page_size: Option<u32>,

    /// Override the bulk backfill size used on the first order switch
    #[arg(long, value_name = "N")]
    backfill_size: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => get_config_dir()?.join("config.toml"),
    };
    let mut config = Config::load(&config_path).context("Failed to load configuration")?;

    if let Some(api_url) = args.api_url {
        config.api_url = api_url;
    }
    if let Some(page_size) = args.page_size {
        config.load_limit = page_size;
    }
    if let Some(backfill_size) = args.backfill_size {
        config.initial_limit = backfill_size;
    }
    // Overrides bypass Config::load, so re-check the page size bounds.
    config
        .validate()
        .context("Invalid command line override")?;

    // A trailing slash matters for Url::join: without it the last path
    // segment would be replaced instead of extended.
    let mut api_url = config.api_url.clone();
    if !api_url.ends_with('/') {
        api_url.push('/');
    }
    let base_url = Url::parse(&api_url)
        .with_context(|| format!("Invalid api_url in configuration: {}", config.api_url))?;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(5))
        .pool_max_idle_per_host(4)
        .redirect(create_redirect_policy())
        .user_agent(concat!("reel/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let token = config.resolve_token().map(SecretString::from);
    let api = VideoApi::new(client, base_url, token);

    // Seed the session with the first page of the default order.
    let seed = api
        .fetch_page(SortOrder::Newest, None, config.load_limit)
        .await
        .context("Failed to load the initial video page")?;
    tracing::info!(count = seed.len(), "Loaded initial page");

    let mut app = App::new(api, &config, seed);

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    // Run the TUI
    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
