// src/fetch/html.rs
// =============================================================================
// This module extracts href values from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever (Mozilla's HTML parser), so broken markup is fine
//
// Unlike a link checker, we return the hrefs exactly as written. Resolving
// them against the page and deciding which ones to crawl is the crawler's
// job (see crawl/scheduler.rs).
// =============================================================================

use scraper::{Html, Selector};

use crate::link::HyperlinkSet;

// Extracts every href of every <a> tag
//
// Parameters:
//   html: the HTML content to parse (borrowed as &str)
//
// Returns: Vec<String> of raw href values, in document order, duplicates kept
//
// Example:
//   html = "<a href='/docs'>Docs</a><a href='#top'>Top</a>"
//   result = ["/docs", "#top"]
pub fn extract_hrefs(html: &str) -> Vec<String> {
    // Parse the HTML into a document
    let document = Html::parse_document(html);

    // "a[href]" means "all <a> tags that have an href attribute"
    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

// Same as extract_hrefs, but as a HyperlinkSet ready for the crawler
pub fn hrefs_from_html(html: &str) -> HyperlinkSet {
    extract_hrefs(html).iter().map(String::as_str).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::Hyperlink;

    #[test]
    fn test_extract_absolute_link() {
        let html = r#"<a href="https://www.rust-lang.org">Rust</a>"#;
        assert_eq!(extract_hrefs(html), vec!["https://www.rust-lang.org"]);
    }

    #[test]
    fn test_extract_keeps_relative_links_as_written() {
        let html = r#"<a href="/docs">Docs</a> <a href="../about">About</a>"#;
        assert_eq!(extract_hrefs(html), vec!["/docs", "../about"]);
    }

    #[test]
    fn test_extract_keeps_order_and_duplicates() {
        let html = r#"
            <a href="/b">B</a>
            <p><a href="/a">A</a></p>
            <a href="/b">B again</a>
            <a>no href</a>
            <link href="/style.css">
        "#;
        assert_eq!(extract_hrefs(html), vec!["/b", "/a", "/b"]);
    }

    #[test]
    fn test_extract_from_broken_html() {
        let html = r#"<div><a href="/ok">unclosed <a HREF='/upper'>"#;
        assert_eq!(extract_hrefs(html), vec!["/ok", "/upper"]);
    }

    #[test]
    fn test_hrefs_from_html_dedupes() {
        let html = r#"<a href="/a">1</a><a href="/a#">2</a><a href="/b">3</a>"#;
        let links = hrefs_from_html(html);
        assert_eq!(links.len(), 2);
        assert!(links.contains(&Hyperlink::new("/b")));
    }
}
