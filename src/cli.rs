// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// There is a single command: crawl one site and print what was found.
//
//   web-crawler https://example.com/ --max-workers 8 --timeout 5
//
// Flags map one-to-one onto CrawlerConfig (see Cli::to_config).
// =============================================================================

use std::time::Duration;

use clap::Parser;

use web_crawler::config::{
    CrawlerConfig, DEFAULT_MAX_WORKERS, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};

#[derive(Parser, Debug)]
#[command(
    name = "web-crawler",
    version,
    about = "Crawl every page of a website and print their URLs",
    long_about = "web-crawler starts from a URL and follows links breadth-first, \
                  staying on the same host. It respects robots.txt unless told not to, \
                  and prints the canonical URL of every page it reached."
)]
pub struct Cli {
    /// Absolute URL to start from (e.g., https://example.com/)
    pub url: String,

    /// User-Agent header, also used to pick robots.txt rules
    #[arg(short = 'u', long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Number of pages fetched at the same time (1 = one after another)
    #[arg(short = 'w', long, default_value_t = DEFAULT_MAX_WORKERS)]
    pub max_workers: usize,

    /// Seconds to wait for a new link before finishing the crawl
    #[arg(short = 't', long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Send a HEAD request first and skip non-HTML resources
    #[arg(long)]
    pub check_head: bool,

    /// Ignore robots.txt
    #[arg(short = 'd', long)]
    pub disobey_robots: bool,

    /// Keep ?query on discovered links
    #[arg(long)]
    pub with_query: bool,

    /// Keep #fragment on discovered links
    #[arg(long)]
    pub with_fragment: bool,

    /// Don't follow redirects; crawl the Location target as a new link
    #[arg(long)]
    pub record_redirects: bool,

    /// Print results as a JSON array
    #[arg(long)]
    pub json: bool,

    /// Print the configuration and exit without crawling
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    pub fn to_config(&self) -> CrawlerConfig {
        CrawlerConfig::default()
            .with_user_agent(self.user_agent.clone())
            .with_max_workers(self.max_workers)
            .with_timeout(Duration::from_secs(self.timeout))
            .with_obey_robots(!self.disobey_robots)
            .with_check_head(self.check_head)
            .with_trim_query(!self.with_query)
            .with_trim_fragment(!self.with_fragment)
            .with_record_redirects(self.record_redirects)
    }
}
