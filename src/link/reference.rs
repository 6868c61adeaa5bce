// src/link/reference.rs
// =============================================================================
// Splitting and resolving URL references (RFC 3986).
//
// An href on a web page can be almost anything: "https://example.com/a",
// "/a", "a", "../a", "?page=2", "#top", "//cdn.example.com/x.js". Before we
// can normalize one, we need to know which part is which, and before we can
// follow one we need to resolve it against the page it was found on.
//
// We deliberately do NOT use url::Url for this. Url only understands absolute
// URLs and applies its own (WHATWG) normalization while parsing, so it cannot
// represent "#top" or "a/../b" as written. Here a reference is kept exactly as
// written until the normalise module decides what to change.
// =============================================================================

use std::fmt;

/// The five components of a URL reference.
///
/// `None` means the component delimiter was absent; `Some("")` means it was
/// present but empty (e.g. the authority of "file:///etc").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParts {
    pub scheme: Option<String>,
    pub authority: Option<String>,
    pub path: String,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

impl UrlParts {
    /// Splits a reference into its components.
    ///
    /// This never fails: anything that does not look like a scheme or an
    /// authority ends up in the path.
    pub fn parse(input: &str) -> Self {
        let mut rest = input;

        let fragment = match rest.split_once('#') {
            Some((before, fragment)) => {
                rest = before;
                Some(fragment.to_string())
            }
            None => None,
        };

        let query = match rest.split_once('?') {
            Some((before, query)) => {
                rest = before;
                Some(query.to_string())
            }
            None => None,
        };

        let scheme = match rest.split_once(':') {
            Some((scheme, after)) if is_scheme(scheme) => {
                rest = after;
                Some(scheme.to_string())
            }
            _ => None,
        };

        let authority = match rest.strip_prefix("//") {
            Some(after) => {
                let end = after.find('/').unwrap_or(after.len());
                rest = &after[end..];
                Some(after[..end].to_string())
            }
            None => None,
        };

        UrlParts {
            scheme,
            authority,
            path: rest.to_string(),
            query,
            fragment,
        }
    }

    /// Resolves `reference` against `self` as the base (RFC 3986 §5.2.2).
    pub fn resolve(&self, reference: &UrlParts) -> UrlParts {
        if reference.scheme.is_some() {
            return UrlParts {
                path: remove_dot_segments(&reference.path),
                ..reference.clone()
            };
        }

        if reference.authority.is_some() {
            return UrlParts {
                scheme: self.scheme.clone(),
                path: remove_dot_segments(&reference.path),
                ..reference.clone()
            };
        }

        let (path, query) = if reference.path.is_empty() {
            let query = reference.query.clone().or_else(|| self.query.clone());
            (self.path.clone(), query)
        } else if reference.path.starts_with('/') {
            (remove_dot_segments(&reference.path), reference.query.clone())
        } else {
            let merged = self.merge(&reference.path);
            (remove_dot_segments(&merged), reference.query.clone())
        };

        UrlParts {
            scheme: self.scheme.clone(),
            authority: self.authority.clone(),
            path,
            query,
            fragment: reference.fragment.clone(),
        }
    }

    // RFC 3986 §5.2.3
    fn merge(&self, relative: &str) -> String {
        if self.authority.is_some() && self.path.is_empty() {
            return format!("/{}", relative);
        }
        match self.path.rfind('/') {
            Some(index) => format!("{}{}", &self.path[..=index], relative),
            None => relative.to_string(),
        }
    }
}

impl fmt::Display for UrlParts {
    // RFC 3986 §5.3
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{}:", scheme)?;
        }
        match &self.authority {
            Some(authority) => write!(f, "//{}", authority)?,
            // "//x" as a path would come back as an authority when re-parsed
            None if self.path.starts_with("//") => f.write_str("/.")?,
            None => {}
        }
        f.write_str(&self.path)?;
        if let Some(query) = &self.query {
            write!(f, "?{}", query)?;
        }
        if let Some(fragment) = &self.fragment {
            write!(f, "#{}", fragment)?;
        }
        Ok(())
    }
}

// scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

/// Removes "." and ".." segments from a path (RFC 3986 §5.2.4).
pub fn remove_dot_segments(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }

    let absolute = path.starts_with('/');
    let body = if absolute { &path[1..] } else { path };

    let mut output: Vec<&str> = Vec::new();
    let mut trailing_slash = false;

    for segment in body.split('/') {
        trailing_slash = false;
        match segment {
            "." => trailing_slash = true,
            ".." => {
                output.pop();
                trailing_slash = true;
            }
            _ => output.push(segment),
        }
    }

    let mut resolved = String::with_capacity(path.len());
    if absolute {
        resolved.push('/');
    }
    resolved.push_str(&output.join("/"));
    if trailing_slash && !output.is_empty() {
        resolved.push('/');
    }
    resolved
}
