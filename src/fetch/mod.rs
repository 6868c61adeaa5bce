// src/fetch/mod.rs
// =============================================================================
// This module talks to web servers and reads what they send back.
//
// Submodules:
// - http: Requester, which fetches a page and classifies failures
// - html: pulls the href values out of a page
// =============================================================================

mod html;
mod http;

pub use html::{extract_hrefs, hrefs_from_html};
pub use http::{Page, Requester};
