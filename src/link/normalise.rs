// src/link/normalise.rs
// =============================================================================
// This module normalizes URLs into one canonical spelling.
//
// Why?
// A crawler meets URLs that look different but point at the same page:
//   HTTPS://:@WWW.EXAMPLE.COM.?greeting=hello world
//   https://www.example.com/?greeting=hello+world
// If we compared them as raw strings we would crawl that page twice.
//
// Every component has its own rule, and each rule is a public function so
// HyperlinkSet::filter_by can normalize the values it is asked to match with
// exactly the same rules.
//
// Rust concepts:
// - const AsciiSet: the escaping tables are built at compile time
// - Option combinators: map/filter instead of nested if-lets
// =============================================================================

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::reference::UrlParts;

// Unreserved characters (RFC 3986 §2.3) are never escaped
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const PATH: &AsciiSet = &UNRESERVED.remove(b'/').remove(b'%');

// Space is let through here and turned into '+' afterwards.
// '%' and '+' are kept so an already-canonical query stays unchanged.
const QUERY: &AsciiSet = &UNRESERVED
    .remove(b':')
    .remove(b'&')
    .remove(b'=')
    .remove(b'%')
    .remove(b'+')
    .remove(b' ');

const FRAGMENT: &AsciiSet = &UNRESERVED
    .remove(b':')
    .remove(b'%')
    .remove(b'+')
    .remove(b' ');

/// Canonical form of any href.
///
/// The raw href is first resolved against "/" so relative references
/// ("example", ".", "#top") come out as rooted paths.
///
/// Examples:
///   "https://www.EXAMPLE.com."  -> "https://www.example.com/"
///   "example#hello"             -> "/example#hello"
///   ""                          -> "/"
pub fn canonicalize(raw: &str) -> String {
    let root = UrlParts {
        path: "/".to_string(),
        ..UrlParts::default()
    };
    let parts = root.resolve(&UrlParts::parse(raw));

    UrlParts {
        scheme: parts.scheme.as_deref().map(normalise_scheme),
        authority: parts.authority.as_deref().map(normalise_authority),
        path: normalise_path(&parts.path),
        query: parts
            .query
            .as_deref()
            .map(normalise_query)
            .filter(|query| !query.is_empty()),
        fragment: parts
            .fragment
            .as_deref()
            .map(normalise_fragment)
            .filter(|fragment| !fragment.is_empty()),
    }
    .to_string()
}

/// "HTTPS" -> "https"
pub fn normalise_scheme(scheme: &str) -> String {
    scheme.to_ascii_lowercase()
}

/// Normalizes `userinfo@host[:port]`.
///
/// Examples:
///   "www.EXAMPLE.com."      -> "www.example.com"
///   "hello:@www.example.com" -> "hello@www.example.com"
///   ":@www.example.com"     -> "www.example.com"
pub fn normalise_authority(authority: &str) -> String {
    let (userinfo, host) = match authority.rsplit_once('@') {
        Some((userinfo, host)) => (normalise_userinfo(userinfo), host),
        None => ("", authority),
    };

    let host = normalise_host(host);
    if userinfo.is_empty() {
        host
    } else {
        format!("{}@{}", userinfo, host)
    }
}

// A bare trailing ':' means "no password"
fn normalise_userinfo(userinfo: &str) -> &str {
    userinfo.trim_end_matches(':')
}

// TODO: convert internationalized hosts to punycode (IDNA) so both spellings dedupe
fn normalise_host(host: &str) -> String {
    let (name, port) = split_port(host);
    let name = name.to_lowercase();
    let name = name.trim_end_matches('.');
    match port {
        Some(port) => format!("{}:{}", name, port),
        None => name.to_string(),
    }
}

fn split_port(host: &str) -> (&str, Option<&str>) {
    match host.rsplit_once(':') {
        // "[::1]" has colons but no port
        Some((name, port)) if !port.contains(']') => (name, Some(port)),
        _ => (host, None),
    }
}

/// Percent-encodes a path and makes sure it starts with '/'.
///
///   ""              -> "/"
///   "/ hello world" -> "/%20hello%20world"
pub fn normalise_path(path: &str) -> String {
    let encoded = utf8_percent_encode(path, PATH).to_string();
    if encoded.starts_with('/') {
        encoded
    } else {
        format!("/{}", encoded)
    }
}

/// Percent-encodes a query string, spaces become '+'.
///
///   "hello=world hello" -> "hello=world+hello"
pub fn normalise_query(query: &str) -> String {
    utf8_percent_encode(query, QUERY)
        .to_string()
        .replace(' ', "+")
}

/// Percent-encodes a fragment, spaces become '+'.
pub fn normalise_fragment(fragment: &str) -> String {
    utf8_percent_encode(fragment, FRAGMENT)
        .to_string()
        .replace(' ', "+")
}
