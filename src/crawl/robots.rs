// src/crawl/robots.rs
// =============================================================================
// robots.txt: which pages may we fetch, and how slowly?
//
// A robots.txt file is a list of groups. Each group names one or more user
// agents followed by rules:
//
//   User-agent: *
//   Disallow: /private/
//   Allow: /private/readme.txt
//   Crawl-delay: 2
//
// We keep every group, so one parsed policy can answer for any user agent.
// Our agent uses the most specific group that names it, and falls back to
// the "*" group. Inside a group the longest matching rule wins, and Allow
// wins a tie.
//
// Fail-open: if robots.txt can't be fetched, nothing is disallowed.
// =============================================================================

use std::time::Duration;

use tracing::{debug, warn};

use crate::fetch::Requester;
use crate::link::Hyperlink;

#[derive(Debug, Clone, PartialEq)]
struct Rule {
    allow: bool,
    pattern: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Group {
    agents: Vec<String>,
    rules: Vec<Rule>,
    crawl_delay: Option<Duration>,
}

impl Group {
    fn is_wildcard(&self) -> bool {
        self.agents.iter().any(|agent| agent == "*")
    }

    fn names(&self, token: &str) -> bool {
        self.agents
            .iter()
            .any(|agent| agent != "*" && token.contains(agent.as_str()))
    }
}

/// Parsed robots.txt, read-only once built
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RobotsPolicy {
    groups: Vec<Group>,
}

impl RobotsPolicy {
    /// Policy that allows everything, with no delay
    pub fn permissive() -> Self {
        Self::default()
    }

    /// Fetches /robots.txt from the authority of `root`
    pub async fn load(requester: &Requester, root: &Hyperlink) -> Self {
        let robots_url = root.with_path("/robots.txt");
        let mime_types = ["text/plain".to_string()];

        match requester.fetch(&robots_url, &mime_types, false, true).await {
            Ok(page) => {
                debug!(url = %robots_url, "loaded robots.txt");
                Self::parse(&page.text)
            }
            Err(e) => {
                warn!(url = %robots_url, error = %e, "no usable robots.txt, allowing everything");
                Self::permissive()
            }
        }
    }

    pub fn parse(content: &str) -> Self {
        let mut groups: Vec<Group> = Vec::new();
        let mut current = Group::default();
        // consecutive User-agent lines share one group
        let mut in_agent_lines = false;

        for line in content.lines() {
            // Strip comments
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }

            let Some((directive, value)) = line.split_once(':') else {
                continue;
            };
            let directive = directive.trim().to_lowercase();
            let value = value.trim();

            match directive.as_str() {
                "user-agent" => {
                    if !in_agent_lines && !current.agents.is_empty() {
                        groups.push(std::mem::take(&mut current));
                    }
                    current.agents.push(value.to_lowercase());
                    in_agent_lines = true;
                }
                "allow" | "disallow" => {
                    in_agent_lines = false;
                    // "Disallow:" with no path allows everything
                    if !value.is_empty() && !current.agents.is_empty() {
                        current.rules.push(Rule {
                            allow: directive == "allow",
                            pattern: value.to_string(),
                        });
                    }
                }
                "crawl-delay" if !current.agents.is_empty() => {
                    in_agent_lines = false;
                    // Negative, NaN or too big for a Duration: ignored
                    if let Some(delay) = value
                        .parse::<f64>()
                        .ok()
                        .and_then(|seconds| Duration::try_from_secs_f64(seconds).ok())
                    {
                        current.crawl_delay = Some(delay);
                    }
                }
                _ => {}
            }
        }

        if !current.agents.is_empty() {
            groups.push(current);
        }

        RobotsPolicy { groups }
    }

    /// May `user_agent` fetch `url`?
    pub fn can_fetch(&self, user_agent: &str, url: &Hyperlink) -> bool {
        let Some(group) = self.group_for(user_agent) else {
            return true;
        };

        let query = url.query();
        let target = if query.is_empty() {
            url.path()
        } else {
            format!("{}?{}", url.path(), query)
        };

        let mut longest_allow = None;
        let mut longest_disallow = None;
        for rule in &group.rules {
            if path_matches(&target, &rule.pattern) {
                let longest = if rule.allow {
                    &mut longest_allow
                } else {
                    &mut longest_disallow
                };
                *longest = (*longest).max(Some(rule.pattern.len()));
            }
        }

        // Longer match wins; if equal, allow wins
        longest_allow >= longest_disallow
    }

    /// Crawl-delay for `user_agent`; None means don't wait
    pub fn crawl_delay(&self, user_agent: &str) -> Option<Duration> {
        self.group_for(user_agent)
            .and_then(|group| group.crawl_delay)
    }

    fn group_for(&self, user_agent: &str) -> Option<&Group> {
        let token = agent_token(user_agent);
        self.groups
            .iter()
            .find(|group| group.names(&token))
            .or_else(|| self.groups.iter().find(|group| group.is_wildcard()))
    }
}

// "MyBot/1.2 (+https://example.com)" -> "mybot"
fn agent_token(user_agent: &str) -> String {
    user_agent
        .split('/')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

// Does `path` match a robots.txt pattern? Supports '*' and a trailing '$'.
fn path_matches(path: &str, pattern: &str) -> bool {
    let (pattern, anchored) = match pattern.strip_suffix('$') {
        Some(pattern) => (pattern, true),
        None => (pattern, false),
    };

    if !pattern.contains('*') {
        return if anchored {
            path == pattern
        } else {
            path.starts_with(pattern)
        };
    }

    let mut parts = pattern.split('*');
    // Before the first '*' must be a prefix
    let first = parts.next().unwrap_or("");
    let Some(mut rest) = path.strip_prefix(first) else {
        return false;
    };

    let parts: Vec<&str> = parts.collect();
    for (i, part) in parts.iter().enumerate() {
        let is_last = i + 1 == parts.len();
        if is_last && anchored {
            return rest.ends_with(part);
        }
        match rest.find(part) {
            Some(found) => rest = &rest[found + part.len()..],
            None => return false,
        }
    }

    !anchored || rest.is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROBOTS: &str = r#"
# comments are ignored
User-agent: *
Disallow: /private/
Allow: /private/public/
Crawl-delay: 2

User-agent: FastBot
User-agent: OtherBot
Disallow: /admin/
Crawl-delay: 0.5
"#;

    fn href(path: &str) -> Hyperlink {
        Hyperlink::new(format!("https://example.com{}", path))
    }

    #[test]
    fn test_wildcard_group() {
        let robots = RobotsPolicy::parse(ROBOTS);
        assert!(robots.can_fetch("SlowBot", &href("/public/page.html")));
        assert!(!robots.can_fetch("SlowBot", &href("/private/secret")));
        assert!(robots.can_fetch("SlowBot", &href("/private/public/ok")));
        assert_eq!(robots.crawl_delay("SlowBot"), Some(Duration::from_secs(2)));
    }

    #[test]
    fn test_specific_group_replaces_wildcard() {
        let robots = RobotsPolicy::parse(ROBOTS);
        assert!(robots.can_fetch("FastBot/1.0", &href("/private/secret")));
        assert!(!robots.can_fetch("fastbot", &href("/admin/users")));
        assert!(!robots.can_fetch("OtherBot", &href("/admin/")));
        assert_eq!(
            robots.crawl_delay("FastBot/1.0"),
            Some(Duration::from_millis(500))
        );
    }

    #[test]
    fn test_empty_policy_allows_everything() {
        for robots in [RobotsPolicy::permissive(), RobotsPolicy::parse("")] {
            assert!(robots.can_fetch("AnyBot", &href("/anything")));
            assert_eq!(robots.crawl_delay("AnyBot"), None);
        }
    }

    #[test]
    fn test_empty_disallow_allows_everything() {
        let robots = RobotsPolicy::parse("User-agent: *\nDisallow:\n");
        assert!(robots.can_fetch("AnyBot", &href("/secret")));
    }

    #[test]
    fn test_unusable_crawl_delay_is_ignored() {
        for value in ["1e30", "-1", "NaN", "inf", "soon"] {
            let robots = RobotsPolicy::parse(&format!("User-agent: *\nCrawl-delay: {}\n", value));
            assert_eq!(robots.crawl_delay("AnyBot"), None, "value: {}", value);
        }
    }

    #[test]
    fn test_disallow_matches_query() {
        let robots = RobotsPolicy::parse("User-agent: *\nDisallow: /search?\n");
        assert!(robots.can_fetch("AnyBot", &href("/search")));
        assert!(!robots.can_fetch("AnyBot", &href("/search?q=rust")));
    }

    #[test]
    fn test_path_matching() {
        // Simple prefix
        assert!(path_matches("/admin/test", "/admin/"));
        assert!(!path_matches("/public/test", "/admin/"));

        // Wildcard
        assert!(path_matches("/images/cat.jpg", "/images/*.jpg"));
        assert!(path_matches("/a/b/c.pdf", "/*.pdf$"));
        assert!(!path_matches("/a/b/c.pdf?x", "/*.pdf$"));

        // End anchor
        assert!(path_matches("/page.html", "/page.html$"));
        assert!(!path_matches("/page.html?query", "/page.html$"));
    }

    #[test]
    fn test_agent_token() {
        assert_eq!(agent_token("MyBot/1.2 (+https://example.com)"), "mybot");
        assert_eq!(agent_token("RustWebCrawler"), "rustwebcrawler");
    }
}
