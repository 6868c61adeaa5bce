// src/error.rs
// =============================================================================
// Error types for the crawler library.
//
// The crawler sorts every failure into a small set of outcomes:
// - InvalidInput: something that is not a usable URL reached an API boundary
// - ClientError / ServerError: the server answered with 4xx / 5xx
// - WrongMimeType: the server answered, but not with a type we accept
// - Http: the request never produced a response (DNS, TLS, timeout, ...)
//
// The scheduler decides what each outcome means for a crawl (see
// crawl/scheduler.rs); this file only describes them.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Input that cannot be used as a URL reference
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The server answered with a 4xx status code
    #[error("{status} {reason}")]
    ClientError { status: u16, reason: String },

    /// The server answered with a 5xx status code
    #[error("{status} {reason}")]
    ServerError { status: u16, reason: String },

    /// The response Content-Type matched none of the accepted MIME types
    #[error("{content_type:?} not in {accepted:?}")]
    WrongMimeType {
        content_type: String,
        accepted: Vec<String>,
    },

    /// Transport-level failure from the HTTP client
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_errors_display_code_and_reason() {
        let err = Error::ClientError {
            status: 404,
            reason: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "404 Not Found");

        let err = Error::ServerError {
            status: 500,
            reason: "Internal Server Error".to_string(),
        };
        assert_eq!(err.to_string(), "500 Internal Server Error");
    }

    #[test]
    fn test_wrong_mime_type_display() {
        let err = Error::WrongMimeType {
            content_type: "image/png".to_string(),
            accepted: vec!["text/html".to_string()],
        };
        assert_eq!(err.to_string(), r#""image/png" not in ["text/html"]"#);
    }
}
