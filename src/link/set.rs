// src/link/set.rs
// =============================================================================
// HyperlinkSet: a set of unique Hyperlinks with a few bulk transformations.
//
// The crawler turns the raw hrefs of a page into crawlable links in one
// chain:
//
//   hrefs.trim(Trim::query_and_fragment(true, true))   // drop ?x=1 and #top
//        .join_all(&page)                              // make them absolute
//        .filter_by(&LinkFilter::default().authority(page.authority()))
//
// Every step returns a NEW set. Because Hyperlink equality is canonical
// equality, each step also dedupes for free.
// =============================================================================

use std::collections::hash_set::{self, HashSet};

use super::hyperlink::{Hyperlink, Trim};
use super::normalise::{
    normalise_authority, normalise_fragment, normalise_path, normalise_query, normalise_scheme,
};

/// Component values a link must match. Fields left as `None` match anything;
/// all fields that are set must match (logical AND).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkFilter {
    pub scheme: Option<String>,
    pub authority: Option<String>,
    pub path: Option<String>,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

impl LinkFilter {
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = Some(scheme.into());
        self
    }

    pub fn authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = Some(authority.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }

    // The wanted values go through the same rules as the links themselves,
    // so "WWW.Example.com." matches "www.example.com"
    fn normalised(&self) -> LinkFilter {
        LinkFilter {
            scheme: self.scheme.as_deref().map(normalise_scheme),
            authority: self.authority.as_deref().map(normalise_authority),
            path: self.path.as_deref().map(normalise_path),
            query: self.query.as_deref().map(normalise_query),
            fragment: self.fragment.as_deref().map(normalise_fragment),
        }
    }

    fn matches(&self, link: &Hyperlink) -> bool {
        fn check(wanted: &Option<String>, actual: impl FnOnce() -> String) -> bool {
            wanted.as_ref().map_or(true, |wanted| *wanted == actual())
        }

        check(&self.scheme, || link.scheme())
            && check(&self.authority, || link.authority())
            && check(&self.path, || link.path())
            && check(&self.query, || link.query())
            && check(&self.fragment, || link.fragment())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HyperlinkSet {
    links: HashSet<Hyperlink>,
}

impl HyperlinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn contains(&self, link: &Hyperlink) -> bool {
        self.links.contains(link)
    }

    /// Returns false if an equal link was already present
    pub fn insert(&mut self, link: Hyperlink) -> bool {
        self.links.insert(link)
    }

    pub fn iter(&self) -> hash_set::Iter<'_, Hyperlink> {
        self.links.iter()
    }

    /// Resolves every member against `base`
    pub fn join_all(&self, base: &Hyperlink) -> HyperlinkSet {
        self.links.iter().map(|link| link.join(base)).collect()
    }

    pub fn filter_by(&self, filter: &LinkFilter) -> HyperlinkSet {
        let filter = filter.normalised();
        self.links
            .iter()
            .filter(|link| filter.matches(link))
            .cloned()
            .collect()
    }

    pub fn trim(&self, trim: Trim) -> HyperlinkSet {
        self.links.iter().map(|link| link.trim(trim)).collect()
    }
}

impl FromIterator<Hyperlink> for HyperlinkSet {
    fn from_iter<I: IntoIterator<Item = Hyperlink>>(iter: I) -> Self {
        HyperlinkSet {
            links: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a str> for HyperlinkSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(Hyperlink::new).collect()
    }
}

impl IntoIterator for HyperlinkSet {
    type Item = Hyperlink;
    type IntoIter = hash_set::IntoIter<Hyperlink>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.into_iter()
    }
}

impl<'a> IntoIterator for &'a HyperlinkSet {
    type Item = &'a Hyperlink;
    type IntoIter = hash_set::Iter<'a, Hyperlink>;

    fn into_iter(self) -> Self::IntoIter {
        self.links.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(links: &[&str]) -> HyperlinkSet {
        links.iter().copied().collect()
    }

    #[test]
    fn test_set_dedupes_equivalent_links() {
        let links = set(&["/hello", "/hello", "HTTPS://EX.com./a", "https://ex.com/a"]);
        assert_eq!(links.len(), 2);
        assert!(links.contains(&Hyperlink::new("https://ex.com/a")));
    }

    #[test]
    fn test_insert_reports_new_links() {
        let mut links = HyperlinkSet::new();
        assert!(links.insert(Hyperlink::new("/a")));
        assert!(!links.insert(Hyperlink::new("/a#")));
        assert_eq!(links.len(), 1);
    }

    #[test]
    fn test_join_all_relative_links() {
        let links = set(&["hello", "world", "/", "."]);
        let joined = links.join_all(&Hyperlink::new("https://www.google.com"));
        assert_eq!(
            joined,
            set(&[
                "https://www.google.com/hello",
                "https://www.google.com/world",
                "https://www.google.com/",
            ])
        );
    }

    #[test]
    fn test_join_all_absolute_links() {
        let links = set(&["https://hello.world", "http://www.example.com"]);
        let joined = links.join_all(&Hyperlink::new("https://www.google.com"));
        assert_eq!(joined, links);
    }

    #[test]
    fn test_filter_by_scheme() {
        let links = set(&[
            "http://www.google.com/",
            "/hello-world?hello=world",
            "#hello",
            "https://www.example.com",
        ]);
        let filtered = links.filter_by(&LinkFilter::default().scheme("HTTP"));
        assert_eq!(filtered, set(&["http://www.google.com/"]));
    }

    #[test]
    fn test_filter_by_authority_is_case_insensitive() {
        let links = set(&[
            "/",
            "/hello-world?hello=world",
            "https://www.example.com",
            "https://www.example.com/hello-world?world=hello",
            "https://example.com/",
        ]);
        let filtered = links.filter_by(&LinkFilter::default().authority(":@www.EXAMPLE.com."));
        assert_eq!(
            filtered,
            set(&[
                "https://www.example.com",
                "https://www.example.com/hello-world?world=hello",
            ])
        );
    }

    #[test]
    fn test_filter_by_query_and_fragment() {
        let links = set(&[
            "/",
            "/hello-world?hello=world",
            "/?hello=world#hello",
            "https://example.com/#hello",
        ]);
        assert_eq!(
            links.filter_by(&LinkFilter::default().query("hello=world")),
            set(&["/hello-world?hello=world", "/?hello=world#hello"])
        );
        assert_eq!(
            links.filter_by(&LinkFilter::default().fragment("hello")),
            set(&["/?hello=world#hello", "https://example.com/#hello"])
        );
    }

    #[test]
    fn test_filter_by_several_fields() {
        let links = set(&[
            "/hello?hello=world#here",
            "/hello-world?hello=world",
            "/?hello=world#hello",
            "https://yoyoyo.co.uk/hello?hello=world#here",
        ]);
        let filter = LinkFilter::default()
            .path("/hello")
            .query("hello=world")
            .fragment("here");
        assert_eq!(
            links.filter_by(&filter),
            set(&[
                "/hello?hello=world#here",
                "https://yoyoyo.co.uk/hello?hello=world#here",
            ])
        );
    }

    #[test]
    fn test_filter_by_empty_components() {
        let links = set(&[
            "/",
            "https://www.example.com",
            "https://www.example.com/?world=hello",
        ]);
        let filter = LinkFilter::default()
            .scheme("https")
            .authority("www.example.com")
            .path("/")
            .query("")
            .fragment("");
        assert_eq!(links.filter_by(&filter), set(&["https://www.example.com"]));
    }

    #[test]
    fn test_trim_removes_query_and_fragment_then_dedupes() {
        let links = set(&["/a?x=1", "/a#top", "/a?y=2#z", "/b"]);
        let trimmed = links.trim(Trim::query_and_fragment(true, true));
        assert_eq!(trimmed, set(&["/a", "/b"]));
    }

    #[test]
    fn test_trim_then_join_resolves_against_page() {
        let page = Hyperlink::new("https://h.com/docs/intro");
        let links = set(&["setup", "?page=2"])
            .trim(Trim::query_and_fragment(true, true))
            .join_all(&page);
        assert_eq!(
            links,
            set(&["https://h.com/docs/setup", "https://h.com/docs/intro"])
        );
    }
}
