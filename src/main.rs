// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr, so stdout only carries results)
// 3. Check the seed URL and build the crawler
// 4. Crawl and print the pages found
// 5. Exit with proper code (0 = success, 2 = error)
// =============================================================================

mod cli;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use url::Url;

use cli::Cli;
use web_crawler::{Crawler, Hyperlink};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging();

    let config = cli.to_config();
    if cli.debug {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(0);
    }

    let seed = parse_seed(&cli.url)?;
    let mut crawler = Crawler::new(config).context("failed to build HTTP client")?;
    let pages = crawler.crawl(seed.as_str()).await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&pages)?);
    } else {
        for page in &pages {
            println!("{}", page);
        }
    }

    Ok(0)
}

// RUST_LOG overrides the default "info" level
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// The seed must be an absolute http(s) URL
fn parse_seed(raw: &str) -> Result<Hyperlink> {
    let url = Url::parse(raw).with_context(|| format!("invalid URL '{}'", raw))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow!("unsupported scheme '{}' in '{}'", url.scheme(), raw));
    }

    let seed: Hyperlink = raw.parse()?;
    if seed.is_relative() || seed.authority().is_empty() {
        return Err(anyhow!("'{}' is not an absolute URL", raw));
    }
    Ok(seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_accepts_absolute_urls() {
        let seed = parse_seed("HTTPS://Example.com./docs").unwrap();
        assert_eq!(seed.as_str(), "https://example.com/docs");
    }

    #[test]
    fn test_parse_seed_rejects_relative_and_odd_urls() {
        assert!(parse_seed("/docs").is_err());
        assert!(parse_seed("example.com").is_err());
        assert!(parse_seed("ftp://example.com/").is_err());
    }
}
