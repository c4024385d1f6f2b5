//! End-to-end conversion of cladogram markup to Newick.
//!
//! A [Converter] chains the three stages
//! [MarkupNormalizer] → [HierarchyBuilder] → [to_newick] with one shared
//! configuration. Each stage only sees the output of the previous one.

use crate::error::TaxonomyError;
use crate::markup::{Fragment, MarkupNormalizer, find_cladograms};
use crate::model::{HierarchyBuilder, StructuralAnomaly, TaxonTree};
use crate::newick::{NewickStyle, to_newick};

// =#========================================================================#=
// CONVERSION
// =#========================================================================#=
/// Result of converting one taxonomy fragment.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    /// The reconstructed tree
    pub tree: TaxonTree,
    /// Structural anomalies met while building the tree, in document order
    pub anomalies: Vec<StructuralAnomaly>,
    /// Newick serialization of `tree` (with closing semicolon)
    pub newick: String,
}

// =#========================================================================#=
// CONVERTER
// =#========================================================================#=
/// Configurable pipeline from HTML (or a [Fragment]) to Newick.
///
/// # Configuration
/// * [`with_style()`](Self::with_style) - Newick style of the output,
///   [NewickStyle::Plain] by default
/// * [`with_collapse_duplicates()`](Self::with_collapse_duplicates) -
///   whether adjacent duplicates at the same depth merge (default `true`)
/// * [`with_noise_class()`](Self::with_noise_class) - additional CSS class
///   whose elements are dropped during normalization
///
/// # Example
/// ```
/// use cladewick::convert::Converter;
///
/// let html = "<ul><li>Palaeognathae<ul><li>Struthio</li><li>Apteryx</li></ul></li></ul>";
/// let conversion = Converter::new().convert_html(html)?;
/// assert_eq!(conversion.newick, "(Struthio,Apteryx)Palaeognathae;");
/// assert!(conversion.anomalies.is_empty());
/// # Ok::<(), cladewick::TaxonomyError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Converter {
    normalizer: MarkupNormalizer,
    builder: HierarchyBuilder,
    style: NewickStyle,
}

impl Converter {
    /// Creates a new [Converter] with default configuration.
    pub fn new() -> Self {
        Converter::default()
    }

    /// Sets the Newick style of the output.
    pub fn with_style(mut self, style: NewickStyle) -> Self {
        self.style = style;
        self
    }

    /// Sets whether adjacent duplicate labels at the same depth collapse.
    pub fn with_collapse_duplicates(mut self, collapse_duplicates: bool) -> Self {
        self.builder = self.builder.with_collapse_duplicates(collapse_duplicates);
        self
    }

    /// Adds a CSS class whose elements are treated as noise.
    pub fn with_noise_class<S: Into<String>>(mut self, class: S) -> Self {
        self.normalizer = self.normalizer.with_noise_class(class);
        self
    }

    /// Returns the configured Newick style.
    pub fn style(&self) -> NewickStyle {
        self.style
    }

    /// Converts an HTML taxonomy fragment (cladogram table or lists).
    ///
    /// # Errors
    /// * [TaxonomyError::EmptyTaxonomy] - no labeled element after normalization
    /// * [TaxonomyError::NoRootFound] - no element can serve as root
    pub fn convert_html(&self, html: &str) -> Result<Conversion, TaxonomyError> {
        let fragment = self.normalizer.normalize_html(html)?;
        self.build_and_write(&fragment)
    }

    /// Normalizes and converts an already extracted [Fragment].
    ///
    /// # Errors
    /// Same as [`convert_html`](Self::convert_html).
    pub fn convert_fragment(&self, fragment: Fragment) -> Result<Conversion, TaxonomyError> {
        let fragment = self.normalizer.normalize(fragment)?;
        self.build_and_write(&fragment)
    }

    /// Locates every top-level cladogram of a full article and converts each.
    ///
    /// Returns one result per cladogram in document order; a page without
    /// cladograms yields an empty vector. Failures of one cladogram do not
    /// affect the others.
    pub fn convert_page(&self, document: &str) -> Vec<Result<Conversion, TaxonomyError>> {
        let cladograms = find_cladograms(document);
        log::debug!("Found {} cladogram(s) in page", cladograms.len());

        cladograms
            .iter()
            .enumerate()
            .map(|(i, html)| {
                let result = self.convert_html(html);
                if let Err(err) = &result {
                    log::warn!("Cladogram {} could not be converted: {err}", i + 1);
                }
                result
            })
            .collect()
    }

    fn build_and_write(&self, fragment: &Fragment) -> Result<Conversion, TaxonomyError> {
        let reconstruction = self.builder.build(fragment)?;
        let newick = to_newick(self.style, &reconstruction.tree);
        log::debug!(
            "Converted {} elements into {} nodes with {} anomalies",
            fragment.len(),
            reconstruction.tree.num_nodes(),
            reconstruction.anomalies.len()
        );

        Ok(Conversion {
            tree: reconstruction.tree,
            anomalies: reconstruction.anomalies,
            newick,
        })
    }
}
