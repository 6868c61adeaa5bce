// src/crawl/scheduler.rs
// =============================================================================
// The crawl loop.
//
// A crawl is one dispatcher plus any number of visits:
//
//   dispatcher                         visit(url)
//   ----------                         ----------
//   next() from the frontier  ──────▶  fetch url
//   skip if done / disallowed          extract, trim, resolve, filter hrefs
//   sleep crawl-delay                  frontier.expand(url, links)
//   submit visit to the executor       (or mark_done / leave Stuck)
//
// Every link goes Frontier -> InFlight -> Done or Stuck. A Stuck link (4xx,
// 5xx, transport error, disallowed) is never retried and never counted.
// Because it stays in `seen`, a crawl with a Stuck link can't reach
// seen == done and ends through the idle timeout instead.
//
// The crawl ends when either:
// - every seen link is done, or
// - nothing new arrived within `timeout`.
// =============================================================================

use std::collections::BTreeSet;
use std::sync::Arc;

use reqwest::header::LOCATION;
use tracing::{debug, info, warn};

use super::executor::Executor;
use super::frontier::{Frontier, Next};
use super::robots::RobotsPolicy;
use crate::config::CrawlerConfig;
use crate::error::{Error, Result};
use crate::fetch::{extract_hrefs, Requester};
use crate::link::{Hyperlink, HyperlinkSet, LinkFilter, Trim};

/// A reusable crawler for one site at a time.
///
/// ```no_run
/// # async fn demo() -> web_crawler::error::Result<()> {
/// use web_crawler::{CrawlerConfig, Crawler};
///
/// let mut crawler = Crawler::new(CrawlerConfig::default().with_max_workers(4))?;
/// for url in crawler.crawl("https://example.com/").await {
///     println!("{}", url);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Crawler {
    config: Arc<CrawlerConfig>,
    requester: Requester,
    frontier: Arc<Frontier>,
}

impl Crawler {
    pub fn new(config: CrawlerConfig) -> Result<Self> {
        let requester = Requester::new(&config.user_agent)?;
        Ok(Crawler {
            config: Arc::new(config),
            requester,
            frontier: Arc::new(Frontier::new()),
        })
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Crawls every reachable page on the seed's authority.
    ///
    /// Returns the canonical URLs of the pages that were visited successfully
    /// (including non-HTML leaves), sorted. Fetch failures never abort the
    /// crawl; the failing URL is simply left out.
    pub async fn crawl(&mut self, seed: &str) -> BTreeSet<String> {
        // Anything left over from an earlier crawl goes
        self.frontier.drain_results();

        let seed = Hyperlink::new(seed);
        self.frontier.admit(seed.clone());
        info!(%seed, workers = self.config.max_workers, "starting crawl");

        let robots = if self.config.obey_robots {
            RobotsPolicy::load(&self.requester, &seed).await
        } else {
            RobotsPolicy::permissive()
        };
        let crawl_delay = robots.crawl_delay(&self.config.user_agent);

        let visitor = Visitor {
            requester: self.requester.clone(),
            config: Arc::clone(&self.config),
            frontier: Arc::clone(&self.frontier),
        };
        let mut executor = Executor::for_workers(self.config.max_workers);

        loop {
            let url = match self.frontier.next(self.config.timeout).await {
                Next::Link(url) => url,
                Next::Complete => {
                    debug!("every seen link is done");
                    break;
                }
                Next::Idle => {
                    info!(
                        timeout_secs = self.config.timeout.as_secs_f64(),
                        "no new links within timeout, stopping"
                    );
                    break;
                }
            };

            if self.frontier.is_done(&url) {
                continue;
            }

            if self.config.obey_robots {
                if !robots.can_fetch(&self.config.user_agent, &url) {
                    info!(%url, "disallowed by robots.txt");
                    continue;
                }
                if let Some(delay) = crawl_delay {
                    tokio::time::sleep(delay).await;
                }
            }

            executor.submit(visitor.clone().visit(url)).await;
        }

        executor.shutdown().await;
        let results = self.frontier.drain_results();
        info!(pages = results.len(), "crawl finished");
        results
    }
}

// Everything one visit needs, cheap to clone into a task
#[derive(Clone)]
struct Visitor {
    requester: Requester,
    config: Arc<CrawlerConfig>,
    frontier: Arc<Frontier>,
}

impl Visitor {
    async fn visit(self, url: Hyperlink) {
        debug!(%url, "visiting");

        match self.get_hrefs(&url).await {
            Ok(hrefs) => {
                let trim =
                    Trim::query_and_fragment(self.config.trim_query, self.config.trim_fragment);
                // One href at a time, before anything dedupes them: "setup"
                // and "/setup" are different pages below the root
                let links = hrefs
                    .iter()
                    .map(|href| href.trim(trim).join(&url))
                    .collect::<HyperlinkSet>()
                    .filter_by(&LinkFilter::default().authority(url.authority()));
                let admitted = self.frontier.expand(&url, links);
                debug!(%url, admitted, "expanded");
            }
            Err(Error::WrongMimeType { content_type, .. }) => {
                // Not a page we parse, but it exists: a leaf
                debug!(%url, %content_type, "leaf");
                self.frontier.mark_done(&url);
            }
            Err(e) => {
                warn!(%url, error = %e, "giving up on link");
            }
        }
    }

    // The hrefs of a page, unresolved and in document order
    async fn get_hrefs(&self, url: &Hyperlink) -> Result<Vec<Hyperlink>> {
        let follow_redirects = !self.config.record_redirects;
        let page = self
            .requester
            .fetch(
                url,
                &self.config.mime_types,
                self.config.check_head,
                follow_redirects,
            )
            .await?;

        if !follow_redirects && page.status.is_redirection() {
            return match page.headers.get(LOCATION) {
                Some(location) => Ok(vec![Hyperlink::try_from(location)?]),
                None => Ok(Vec::new()),
            };
        }

        Ok(extract_hrefs(&page.text)
            .into_iter()
            .map(Hyperlink::new)
            .collect())
    }
}
