//! Extraction and normalization of taxonomy markup.
//!
//! This module turns the HTML of a taxonomy section into a clean
//! [Fragment]: a document-ordered list of [MarkupElement]s whose `depth`
//! records structural nesting. Noise (citation markers, images, captions,
//! edit links, wrapper elements, non-breaking spaces) is removed on the way.
//!
//! # Quick API
//! * [`normalize_html`] - extracts and normalizes a fragment with defaults
//! * [`find_cladograms`] - locates the cladograms of a full article
//!
//! # Full API
//! Configure a [MarkupNormalizer] for additional noise classes, or use
//! [`MarkupNormalizer::normalize`] on a [Fragment] built by other means.

pub mod element;
mod html;
pub mod locate;
pub mod normalizer;

pub use element::{ElementKind, Fragment, MarkupElement};
pub use locate::find_cladograms;
pub use normalizer::{MarkupNormalizer, clean_label};

use crate::error::TaxonomyError;

/// Extracts and normalizes a taxonomy fragment from HTML using default
/// settings.
///
/// See [`MarkupNormalizer::normalize_html`] for details.
pub fn normalize_html(html: &str) -> Result<Fragment, TaxonomyError> {
    MarkupNormalizer::new().normalize_html(html)
}
