// src/link/hyperlink.rs
// =============================================================================
// Hyperlink: one href, in canonical form.
//
// A Hyperlink keeps two strings:
// - url:   the canonical spelling (see normalise.rs), used for ==, hashing,
//          ordering and printing
// - input: the string it was built from, used only when resolving relative
//          references, because resolution rules are defined over the URL as
//          written and not over our normalized version of it
//
// So Hyperlink::new("HTTPS://Example.com.") == Hyperlink::new("https://example.com/")
// even though the two inputs differ.
//
// Rust concepts:
// - Manual PartialEq/Hash: we compare only one of the two fields
// - FromStr / TryFrom: fallible conversions at API boundaries
// - Operator overloading (Add, Div) for building URLs in tests and call sites
// =============================================================================

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div};
use std::str::FromStr;

use reqwest::header::HeaderValue;

use super::normalise::{
    canonicalize, normalise_authority, normalise_fragment, normalise_path, normalise_query,
    normalise_scheme,
};
use super::reference::UrlParts;
use crate::error::{Error, Result};

/// Which components to blank out in `Hyperlink::trim`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Trim {
    pub scheme: bool,
    pub authority: bool,
    pub path: bool,
    pub query: bool,
    pub fragment: bool,
}

impl Trim {
    /// Trims only the query and/or fragment, the usual pre-dedup cleanup.
    pub fn query_and_fragment(query: bool, fragment: bool) -> Self {
        Trim {
            query,
            fragment,
            ..Trim::default()
        }
    }
}

#[derive(Clone)]
pub struct Hyperlink {
    url: String,
    input: String,
}

impl Hyperlink {
    pub fn new(link: impl Into<String>) -> Self {
        let input = link.into();
        Hyperlink {
            url: canonicalize(&input),
            input,
        }
    }

    /// The canonical URL
    pub fn as_str(&self) -> &str {
        &self.url
    }

    fn components(&self) -> UrlParts {
        UrlParts::parse(&self.url)
    }

    pub fn scheme(&self) -> String {
        normalise_scheme(self.components().scheme.as_deref().unwrap_or(""))
    }

    pub fn authority(&self) -> String {
        normalise_authority(self.components().authority.as_deref().unwrap_or(""))
    }

    pub fn path(&self) -> String {
        normalise_path(&self.components().path)
    }

    pub fn query(&self) -> String {
        normalise_query(self.components().query.as_deref().unwrap_or(""))
    }

    pub fn fragment(&self) -> String {
        normalise_fragment(self.components().fragment.as_deref().unwrap_or(""))
    }

    /// Links that start with a scheme (e.g. https) are absolute
    pub fn is_absolute(&self) -> bool {
        !self.scheme().is_empty()
    }

    pub fn is_relative(&self) -> bool {
        !self.is_absolute()
    }

    /// Scheme and authority only, e.g. "https://www.example.com/"
    pub fn origin(&self) -> Hyperlink {
        Hyperlink::new(self.origin_string())
    }

    fn origin_string(&self) -> String {
        let parts = self.components();
        UrlParts {
            scheme: parts.scheme,
            authority: parts.authority,
            ..UrlParts::default()
        }
        .to_string()
    }

    /// Replaces everything after the authority with `path`.
    ///
    ///   Hyperlink::new("https://h.com/a?b").with_path("/robots.txt")
    ///     -> "https://h.com/robots.txt"
    pub fn with_path(&self, path: &str) -> Hyperlink {
        Hyperlink::new(format!("{}{}", self.origin_string(), path))
    }

    /// Resolves this link against `base`, like a browser following an href.
    ///
    ///   Hyperlink::new("/hello").join(&Hyperlink::new("https://h.com"))
    ///     -> "https://h.com/hello"
    pub fn join(&self, base: &Hyperlink) -> Hyperlink {
        let resolved = UrlParts::parse(&base.input).resolve(&UrlParts::parse(&self.input));
        Hyperlink::new(resolved.to_string())
    }

    /// Blanks out the selected components and re-canonicalizes.
    ///
    /// Works on the input as written, so a relative href stays relative
    /// and can still be joined against its page afterwards.
    pub fn trim(&self, trim: Trim) -> Hyperlink {
        let parts = UrlParts::parse(&self.input);
        let trimmed = UrlParts {
            scheme: parts.scheme.filter(|_| !trim.scheme),
            authority: parts.authority.filter(|_| !trim.authority),
            path: if trim.path { String::new() } else { parts.path },
            query: parts.query.filter(|_| !trim.query),
            fragment: parts.fragment.filter(|_| !trim.fragment),
        };
        Hyperlink::new(trimmed.to_string())
    }
}

impl fmt::Display for Hyperlink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl fmt::Debug for Hyperlink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HREF({:?})", self.url)
    }
}

impl PartialEq for Hyperlink {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
    }
}

impl Eq for Hyperlink {}

impl Hash for Hyperlink {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.url.hash(state);
    }
}

impl PartialOrd for Hyperlink {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Hyperlink {
    fn cmp(&self, other: &Self) -> Ordering {
        self.url.cmp(&other.url)
    }
}

impl From<&str> for Hyperlink {
    fn from(link: &str) -> Self {
        Hyperlink::new(link)
    }
}

impl From<String> for Hyperlink {
    fn from(link: String) -> Self {
        Hyperlink::new(link)
    }
}

/// Parsing checks the input first: control characters can't appear in a
/// URL reference typed by a user or found in a document.
impl FromStr for Hyperlink {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(c) = s.chars().find(|c| c.is_control()) {
            return Err(Error::InvalidInput(format!(
                "{:?} contains control character {:?}",
                s, c
            )));
        }
        Ok(Hyperlink::new(s))
    }
}

impl TryFrom<&[u8]> for Hyperlink {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let link = std::str::from_utf8(bytes)
            .map_err(|e| Error::InvalidInput(format!("href is not UTF-8: {}", e)))?;
        link.parse()
    }
}

/// Used for Location headers, which are bytes on the wire
impl TryFrom<&HeaderValue> for Hyperlink {
    type Error = Error;

    fn try_from(value: &HeaderValue) -> Result<Self> {
        Hyperlink::try_from(value.as_bytes())
    }
}

// link + "suffix" appends to the input as written
impl<S: AsRef<str>> Add<S> for &Hyperlink {
    type Output = Hyperlink;

    fn add(self, suffix: S) -> Hyperlink {
        Hyperlink::new(format!("{}{}", self.input, suffix.as_ref()))
    }
}

impl<S: AsRef<str>> Add<S> for Hyperlink {
    type Output = Hyperlink;

    fn add(self, suffix: S) -> Hyperlink {
        &self + suffix
    }
}

// link / "segment" appends "/segment" to the input as written
impl<S: AsRef<str>> Div<S> for &Hyperlink {
    type Output = Hyperlink;

    fn div(self, segment: S) -> Hyperlink {
        Hyperlink::new(format!("{}/{}", self.input, segment.as_ref()))
    }
}

impl<S: AsRef<str>> Div<S> for Hyperlink {
    type Output = Hyperlink;

    fn div(self, segment: S) -> Hyperlink {
        &self / segment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn href(link: &str) -> Hyperlink {
        Hyperlink::new(link)
    }

    #[test]
    fn test_equivalent_spellings_are_equal() {
        let a = href("https://:@EX.com./a");
        let b = href("https://ex.com/a");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "https://ex.com/a");

        // and therefore dedupe in a set
        let set: HashSet<_> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_userinfo_is_part_of_identity() {
        assert_ne!(href("https://user@ex.com/a"), href("https://ex.com/a"));
    }

    #[test]
    fn test_components() {
        let link = href("HTTPS://hello:@WWW.Example.com./a b?x=1 2#top");
        assert_eq!(link.scheme(), "https");
        assert_eq!(link.authority(), "hello@www.example.com");
        assert_eq!(link.path(), "/a%20b");
        assert_eq!(link.query(), "x=1+2");
        assert_eq!(link.fragment(), "top");
    }

    #[test]
    fn test_components_of_relative_link() {
        let link = href("#hello");
        assert_eq!(link.scheme(), "");
        assert_eq!(link.authority(), "");
        assert_eq!(link.path(), "/");
        assert_eq!(link.query(), "");
        assert_eq!(link.fragment(), "hello");
    }

    #[test]
    fn test_absolute_or_relative() {
        assert!(href("https://www.example.com.").is_absolute());
        assert!(href("https://www.example.com?hello=world").is_absolute());
        assert!(href("/example#hello").is_relative());
        assert!(href("www.example.html").is_relative());
    }

    #[test]
    fn test_join_relative_links() {
        let base = href("https://helloworld.com");
        let cases = [
            ("/", "/"),
            (".", "/"),
            ("example", "/example"),
            ("#hello", "/#hello"),
            ("example#hello", "/example#hello"),
            ("?hello=world", "/?hello=world"),
        ];
        for (input, expected) in cases {
            assert_eq!(
                href(input).join(&base).as_str(),
                format!("https://helloworld.com{}", expected),
                "input: {:?}",
                input
            );
        }
    }

    #[test]
    fn test_join_uses_base_path() {
        assert_eq!(
            href("/hello").join(&href("https://h.com")).as_str(),
            "https://h.com/hello"
        );
        assert_eq!(
            href("?q=1").join(&href("https://h.com/x")).as_str(),
            "https://h.com/x?q=1"
        );
        assert_eq!(
            href("../c").join(&href("https://h.com/a/b/")).as_str(),
            "https://h.com/a/c"
        );
    }

    #[test]
    fn test_join_absolute_ignores_base() {
        assert_eq!(
            href("https://other.com/").join(&href("https://h.com")).as_str(),
            "https://other.com/"
        );
        assert_eq!(
            href("//cdn.com/x.js").join(&href("https://h.com/a")).as_str(),
            "https://cdn.com/x.js"
        );
    }

    #[test]
    fn test_with_path() {
        let link = href("https://www.example.com/hello?x=1#top");
        assert_eq!(
            link.with_path("/robots.txt").as_str(),
            "https://www.example.com/robots.txt"
        );
        assert_eq!(link.origin().as_str(), "https://www.example.com/");
    }

    #[test]
    fn test_trim() {
        let link = href("https://ex.com/a?x=1#top");
        assert_eq!(
            link.trim(Trim::query_and_fragment(true, true)).as_str(),
            "https://ex.com/a"
        );
        assert_eq!(
            link.trim(Trim::query_and_fragment(false, true)).as_str(),
            "https://ex.com/a?x=1"
        );
        let no_scheme = Trim {
            scheme: true,
            ..Trim::default()
        };
        assert_eq!(link.trim(no_scheme).as_str(), "//ex.com/a?x=1#top");
    }

    #[test]
    fn test_trim_keeps_relative_href_relative() {
        let page = href("https://h.com/docs/intro");
        let trim = Trim::query_and_fragment(true, true);
        assert_eq!(
            href("setup#install").trim(trim).join(&page).as_str(),
            "https://h.com/docs/setup"
        );
        assert_eq!(
            href("../api?v=2").trim(trim).join(&page).as_str(),
            "https://h.com/api"
        );
        assert_eq!(href("?page=2").trim(trim).join(&page), page);
    }

    #[test]
    fn test_add_and_div_append_to_input() {
        let base = href("https://h.com");
        assert_eq!((&base + "/hello").as_str(), "https://h.com/hello");
        assert_eq!((&base / "hello" / "world").as_str(), "https://h.com/hello/world");
        assert_eq!((base + "?q=1").as_str(), "https://h.com/?q=1");
    }

    #[test]
    fn test_parse_rejects_control_characters() {
        assert!("https://h.com/ok".parse::<Hyperlink>().is_ok());
        let err = "https://h.com/\u{0}".parse::<Hyperlink>().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_try_from_bytes() {
        let link = Hyperlink::try_from(&b"/new-home"[..]).unwrap();
        assert_eq!(link.as_str(), "/new-home");
        assert!(matches!(
            Hyperlink::try_from(&[0xffu8, 0xfe][..]),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_try_from_header_value() {
        let value = HeaderValue::from_static("https://h.com/moved");
        let link = Hyperlink::try_from(&value).unwrap();
        assert_eq!(link.as_str(), "https://h.com/moved");
    }
}
