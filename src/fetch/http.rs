// src/fetch/http.rs
// =============================================================================
// This module fetches pages over HTTP and classifies what came back.
//
// Key functionality:
// - Sends requests with our User-Agent and sane timeouts
// - Optional HEAD probe before the GET (skips downloading PDFs, images, ...)
// - Turns 4xx / 5xx / wrong Content-Type into typed errors so the crawler
//   can decide what each one means for the crawl
//
// Two reqwest clients are kept: one follows redirects, one doesn't. A reqwest
// Client is just a handle to a shared connection pool, so Requester is cheap
// to clone into every worker task.
// =============================================================================

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{redirect, Client, Method, StatusCode};
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};
use crate::link::Hyperlink;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// What we keep from a response
#[derive(Debug, Clone)]
pub struct Page {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct Requester {
    client: Client,
    no_redirect_client: Client,
}

impl Requester {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Self::builder(user_agent)
            .redirect(redirect::Policy::limited(10))
            .build()?;
        let no_redirect_client = Self::builder(user_agent)
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Requester {
            client,
            no_redirect_client,
        })
    }

    fn builder(user_agent: &str) -> reqwest::ClientBuilder {
        Client::builder()
            .user_agent(user_agent)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
    }

    // Makes one request and classifies the response
    //
    // Returns:
    //   Ok(Page) for 2xx (and for 3xx when not following redirects)
    //   Err(ClientError) for 4xx
    //   Err(ServerError) for 5xx
    //   Err(WrongMimeType) if Content-Type contains none of `mime_types`
    pub async fn request(
        &self,
        method: Method,
        url: &Hyperlink,
        mime_types: &[String],
        follow_redirects: bool,
    ) -> Result<Page> {
        // Relative links ("/about") can't be requested
        let target = Url::parse(url.as_str())
            .map_err(|e| Error::InvalidInput(format!("cannot request {}: {}", url, e)))?;

        let client = if follow_redirects {
            &self.client
        } else {
            &self.no_redirect_client
        };

        debug!(method = method.as_str(), %url, "sending request");
        let response = client.request(method, target).send().await?;
        let status = response.status();
        let reason = status.canonical_reason().unwrap_or("").to_string();

        if status.is_client_error() {
            return Err(Error::ClientError {
                status: status.as_u16(),
                reason,
            });
        }

        if status.is_server_error() {
            return Err(Error::ServerError {
                status: status.as_u16(),
                reason,
            });
        }

        // A redirect we were told not to follow has no body worth checking;
        // the caller wants its Location header
        let is_unfollowed_redirect = !follow_redirects && status.is_redirection();

        if !is_unfollowed_redirect {
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("")
                .to_lowercase();

            let accepted = mime_types
                .iter()
                .any(|mime_type| content_type.contains(&mime_type.to_lowercase()));

            if !accepted {
                return Err(Error::WrongMimeType {
                    content_type,
                    accepted: mime_types.to_vec(),
                });
            }
        }

        let headers = response.headers().clone();
        let text = response.text().await?;

        Ok(Page {
            status,
            headers,
            text,
        })
    }

    // Fetches a page with GET, optionally sending a HEAD first
    //
    // The HEAD probe runs the same status and MIME checks, so a large
    // non-HTML resource fails fast without its body being downloaded.
    pub async fn fetch(
        &self,
        url: &Hyperlink,
        mime_types: &[String],
        check_head_first: bool,
        follow_redirects: bool,
    ) -> Result<Page> {
        if check_head_first {
            self.request(Method::HEAD, url, mime_types, follow_redirects)
                .await?;
        }

        self.request(Method::GET, url, mime_types, follow_redirects)
            .await
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why two clients?
//    - reqwest sets the redirect policy when a Client is built, not per request
//    - The crawler normally follows redirects, but it can also record them
//      (a 301 becomes a discovered link instead of being followed)
//
// 2. Why Url::parse before sending?
//    - Hyperlinks may be relative ("/about"); reqwest would reject them with a
//      builder error, we'd rather say clearly what was wrong
//
// 3. Why .contains() for the MIME check?
//    - Content-Type usually carries parameters: "text/html; charset=utf-8"
// -----------------------------------------------------------------------------
