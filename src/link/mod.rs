// src/link/mod.rs
// =============================================================================
// This module is the URL model of the crawler.
//
// Submodules:
// - reference: splits URL references and resolves them against a base
// - normalise: turns any href into its canonical spelling
// - hyperlink: the Hyperlink value type (compares by canonical spelling)
// - set: HyperlinkSet with join/filter/trim transformations
// =============================================================================

mod hyperlink;
mod normalise;
mod reference;
mod set;

pub use hyperlink::{Hyperlink, Trim};
pub use normalise::{
    canonicalize, normalise_authority, normalise_fragment, normalise_path, normalise_query,
    normalise_scheme,
};
pub use reference::UrlParts;
pub use set::{HyperlinkSet, LinkFilter};
