// src/config.rs
// =============================================================================
// Crawler configuration.
//
// One plain struct with defaults. The CLI fills it from flags; library users
// and tests build it with the with_* setters:
//
//   let config = CrawlerConfig::default()
//       .with_max_workers(4)
//       .with_timeout(Duration::from_secs(2));
// =============================================================================

use std::time::Duration;

use serde::{Serialize, Serializer};

pub const DEFAULT_USER_AGENT: &str = "RustWebCrawler";
pub const DEFAULT_MAX_WORKERS: usize = 1;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrawlerConfig {
    /// Sent as the User-Agent header and matched against robots.txt groups
    pub user_agent: String,
    /// Number of concurrent page fetches; 1 means no concurrency at all
    pub max_workers: usize,
    /// How long to wait for the next frontier item before giving up
    #[serde(rename = "timeout_secs", serialize_with = "as_secs")]
    pub timeout: Duration,
    pub obey_robots: bool,
    /// Send a HEAD request before each GET to check the Content-Type
    pub check_head: bool,
    /// Strip ?query from discovered links
    pub trim_query: bool,
    /// Strip #fragment from discovered links
    pub trim_fragment: bool,
    /// Don't follow redirects; treat the Location header as a discovered link
    pub record_redirects: bool,
    /// Content-Types that are parsed for links
    pub mime_types: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        CrawlerConfig {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_workers: DEFAULT_MAX_WORKERS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            obey_robots: true,
            check_head: false,
            trim_query: true,
            trim_fragment: true,
            record_redirects: false,
            mime_types: vec!["text/html".to_string()],
        }
    }
}

impl CrawlerConfig {
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_obey_robots(mut self, obey_robots: bool) -> Self {
        self.obey_robots = obey_robots;
        self
    }

    pub fn with_check_head(mut self, check_head: bool) -> Self {
        self.check_head = check_head;
        self
    }

    pub fn with_trim_query(mut self, trim_query: bool) -> Self {
        self.trim_query = trim_query;
        self
    }

    pub fn with_trim_fragment(mut self, trim_fragment: bool) -> Self {
        self.trim_fragment = trim_fragment;
        self
    }

    pub fn with_record_redirects(mut self, record_redirects: bool) -> Self {
        self.record_redirects = record_redirects;
        self
    }

    pub fn with_mime_types<I, S>(mut self, mime_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mime_types = mime_types.into_iter().map(Into::into).collect();
        self
    }
}

fn as_secs<S: Serializer>(timeout: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(timeout.as_secs_f64())
}
