use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use clap_complete::{generate, Shell};
use clap::CommandFactory;
use tracing::{debug, info, warn};

use crate::cache::{derive_key, NewsCache};
use crate::cli::Cli;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::news::pipeline::NewsPipeline;
use crate::news::{ResponseEnvelope, RetrievalResult};
use crate::provider::{CurrentsProvider, NewsApiProvider, NewsProvider};

/// Write a default configuration file under the config directory.
pub async fn init(config_path: Option<PathBuf>) -> Result<()> {
    let config_file = match config_path {
        Some(path) => path,
        None => {
            let config_dir = Config::config_dir()?;
            if !config_dir.exists() {
                fs::create_dir_all(&config_dir).map_err(Error::Io)?;
                info!("Created configuration directory: {}", config_dir.display());
            }
            config_dir.join("config.toml")
        }
    };

    if config_file.exists() {
        warn!("Configuration file already exists: {}", config_file.display());
        println!("Configuration already exists: {}", config_file.display());
        return Ok(());
    }

    Config::default().save(&config_file)?;
    println!("Created default configuration: {}", config_file.display());
    println!();
    println!("Next steps:");
    println!("   1. Set NEWSAPI_API_KEY and/or CURRENTS_API_KEY (or edit the config)");
    println!("   2. Fetch news: newsdesk fetch tech ai");

    Ok(())
}

/// Fetch news for a preference set and print the result.
pub async fn fetch(preferences: Vec<String>, json: bool, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let pipeline = build_pipeline(&config);

    let result = pipeline.get_news(&preferences).await;
    print_result(result, Some(preferences), None, json)
}

/// Search under a preference set and print the result.
pub async fn search(
    query: String,
    preferences: Vec<String>,
    json: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let pipeline = build_pipeline(&config);

    let result = pipeline.search_news(&query, &preferences).await;
    print_result(result, Some(preferences), Some(query), json)
}

/// Print the derived cache key for a preference set.
pub fn cache_key(preferences: Vec<String>) {
    println!("{}", derive_key(&preferences));
}

/// Assemble the retrieval pipeline from configuration: a fresh cache and
/// the providers in their fixed priority order.
pub fn build_pipeline(config: &Config) -> NewsPipeline {
    let cache = Arc::new(NewsCache::new(config.cache_ttl()));

    let newsapi = NewsApiProvider::new(
        config.providers.newsapi.endpoint.clone(),
        config.providers.newsapi.api_key.clone(),
        config.fetch_timeout(),
        config.fetch.page_size,
        &config.fetch.user_agent,
    );
    let currents = CurrentsProvider::new(
        config.providers.currents.endpoint.clone(),
        config.providers.currents.api_key.clone(),
        config.fetch_timeout(),
        &config.fetch.user_agent,
    );

    let providers: Vec<Arc<dyn NewsProvider>> = vec![Arc::new(newsapi), Arc::new(currents)];
    NewsPipeline::new(cache, providers)
}

fn load_config(config_path: Option<PathBuf>) -> Result<Config> {
    let config = match config_path {
        Some(path) => Config::load_with_env(path)?,
        None => {
            let default_path = Config::config_dir()?.join("config.toml");
            if default_path.exists() {
                Config::load_with_env(default_path)?
            } else {
                debug!("No configuration file found, using defaults");
                let mut config = Config::default();
                config.apply_env_overrides();
                config
            }
        }
    };

    config.validate()?;
    Ok(config)
}

fn print_result(
    result: RetrievalResult,
    preferences: Option<Vec<String>>,
    query: Option<String>,
    json: bool,
) -> Result<()> {
    if json {
        let envelope = ResponseEnvelope::new(result, preferences, query);
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    println!(
        "{} article(s) from {}{}",
        result.articles.len(),
        result.provenance,
        if result.cached { " (cached)" } else { "" }
    );
    println!();

    for article in &result.articles {
        println!("  {} — {}", article.source.name, article.title);
        if let Some(description) = &article.description {
            println!("      {}", description);
        }
        println!("      {}", article.url);
    }

    Ok(())
}

pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

pub fn init_logging(debug: bool, verbose: bool) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new("warn")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_file(debug)
        .with_line_number(debug)
        .init();

    debug!("Logging initialized");
    Ok(())
}
