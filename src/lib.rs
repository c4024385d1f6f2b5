//! Cladewick is a library to reconstruct taxonomic trees from cladogram
//! markup and write them as Newick strings.
//!
//! Human-curated taxonomies in encyclopedia articles are rendered as nested
//! cladogram tables (`table.clade`), nested lists or indented definition
//! lists. Their structure is only implied by nesting and is littered with
//! citation markers, images and layout wrappers. This crate turns such a
//! fragment into a strict rooted tree.
//! Core functionality provided:
//! - Markup: Extract taxon elements with their structural depth from HTML
//!   and strip noise (see [crate::markup]).
//! - Hierarchy builder: Stack-based reconstruction of one rooted tree,
//!   reporting (not failing on) structural anomalies (see [crate::model]).
//! - Newick: Serialize trees as labeled, multifurcating Newick, optionally
//!   with NHX attributes, and read such strings back (see [crate::newick]).
//! - Tree model: [TaxonTree](model::TaxonTree) uses the arena pattern, so
//!   no direct node references are stored, only node indices.
//!
//! Limitations:
//! - One tree per fragment; sibling cladograms of a page become separate trees
//! - No branch lengths
//! - No network retrieval; input is markup text
//!
//! # Usage patterns
//! 1. [html_to_newick] converts a fragment with default settings.
//! 2. Configure a [Converter](convert::Converter) for the Newick style,
//!    duplicate handling and extra noise classes, or run the stages
//!    ([MarkupNormalizer](markup::MarkupNormalizer),
//!    [HierarchyBuilder](model::HierarchyBuilder), [newick::to_newick])
//!    yourself.
//!
//! ## Example Default Configuration
//! ```
//! use cladewick::html_to_newick;
//!
//! let html = r#"
//! <table class="clade"><tbody>
//!   <tr><td class="clade-label">Aves</td><td class="clade-leaf">
//!     <table class="clade"><tbody>
//!       <tr><td class="clade-label"></td><td class="clade-leaf">Palaeognathae</td></tr>
//!       <tr><td class="clade-label"></td><td class="clade-leaf">Neognathae<sup class="reference">[1]</sup></td></tr>
//!     </tbody></table>
//!   </td></tr>
//! </tbody></table>"#;
//! assert_eq!(html_to_newick(html)?, "(Palaeognathae,Neognathae)Aves;");
//! # Ok::<(), cladewick::TaxonomyError>(())
//! ```
//!
//! ## Example Converter Configuration
//! ```
//! use cladewick::convert::Converter;
//! use cladewick::newick::NewickStyle;
//!
//! let converter = Converter::new()
//!     .with_style(NewickStyle::Nhx)
//!     .with_collapse_duplicates(false);
//! let conversion = converter.convert_html("<ul><li><a href=\"/wiki/Kiwi\">Kiwi</a></li></ul>")?;
//! assert_eq!(conversion.newick, "Kiwi[&&NHX:link=/wiki/Kiwi];");
//! # Ok::<(), cladewick::TaxonomyError>(())
//! ```

pub mod convert;
pub mod error;
pub mod markup;
pub mod model;
pub mod newick;
pub mod parser;

pub use crate::error::TaxonomyError;

use crate::convert::Converter;

// ============================================================================
// Quick API
// ============================================================================
/// Converts an HTML taxonomy fragment to a Newick string using default
/// settings.
///
/// Structural anomalies are logged but otherwise dropped; use
/// [Converter::convert_html] to inspect them.
///
/// # Errors
/// * [TaxonomyError::EmptyTaxonomy] - nothing labeled is left after normalization
/// * [TaxonomyError::NoRootFound] - no element can serve as root
pub fn html_to_newick(html: &str) -> Result<String, TaxonomyError> {
    Converter::new().convert_html(html).map(|conversion| conversion.newick)
}
