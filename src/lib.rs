// src/lib.rs
// =============================================================================
// web_crawler: a polite, concurrent, breadth-first crawler for one website.
//
// Modules:
// - link: URL canonicalization, Hyperlink and HyperlinkSet
// - fetch: HTTP requests and href extraction
// - crawl: robots.txt, the frontier and the Crawler itself
// - config: CrawlerConfig
// - error: the library's Error type
// =============================================================================

pub mod config;
pub mod crawl;
pub mod error;
pub mod fetch;
pub mod link;

pub use config::CrawlerConfig;
pub use crawl::{Crawler, RobotsPolicy};
pub use error::{Error, Result};
pub use link::{Hyperlink, HyperlinkSet, LinkFilter, Trim};
