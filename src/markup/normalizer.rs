//! Removes noise from taxonomy markup before structural analysis.
//!
//! Noise comes in two flavors:
//! * element-level: images, captions, citation superscripts, edit links,
//!   which are skipped while walking the HTML,
//! * text-level: bracketed citation markers, non-breaking spaces and
//!   invisible characters left inside label text, removed by [clean_label].

use crate::error::TaxonomyError;
use crate::markup::element::Fragment;
use crate::markup::html;
use regex::Regex;
use std::sync::LazyLock;

/// Bracketed annotations without taxonomic content, e.g. `[1]`, `[a]`,
/// `[note 3]`, `[citation needed]`.
static CITATION_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\[\s*(?:\d+|[a-z]{1,2}|(?:note|nb|n|fn|lower-alpha)\s*\d+|citation needed|clarification needed|verification needed|dubious(?:\s*[-–]\s*discuss)?|\?)\s*\]",
    )
    .expect("valid citation marker regex")
});

/// Any run of Unicode whitespace, including non-breaking and narrow spaces.
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Characters without width that end up in labels copied from wiki markup.
const INVISIBLE_CHARS: [char; 5] = ['\u{200B}', '\u{200E}', '\u{2060}', '\u{FEFF}', '\u{00AD}'];

/// Class names of elements never containing taxon names.
const DEFAULT_NOISE_CLASSES: [&str; 9] = [
    "reference",
    "noprint",
    "mw-editsection",
    "mw-cite-backlink",
    "thumb",
    "thumbcaption",
    "gallery",
    "reflist",
    "mw-empty-elt",
];

// =#========================================================================#=
// LABEL CLEANING
// =#========================================================================#=
/// Cleans a raw label text.
///
/// Removes citation markers and invisible characters, turns every whitespace
/// run (including non-breaking spaces) into a single space and trims.
/// Applying it to its own output changes nothing.
///
/// # Examples
/// ```
/// # use cladewick::markup::clean_label;
/// assert_eq!(clean_label("  Aves[1]"), "Aves");
/// assert_eq!(clean_label("Apteryx\u{a0}australis [a][citation needed]"), "Apteryx australis");
/// assert_eq!(clean_label("†Moa"), "†Moa");
/// assert_eq!(clean_label("[2]"), "");
/// ```
pub fn clean_label(raw: &str) -> String {
    let visible: String = raw.chars().filter(|c| !INVISIBLE_CHARS.contains(c)).collect();
    let mut current = collapse_whitespace(&visible);

    // Removing a marker can expose another one, e.g. "[1[2]]"
    loop {
        let stripped = CITATION_MARKER.replace_all(&current, "");
        let next = collapse_whitespace(&stripped);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

// =#========================================================================#=
// MARKUP NORMALIZER
// =#========================================================================$=
/// Turns a taxonomy markup fragment into a clean [Fragment].
///
/// # Configuration
/// * [`with_noise_class(class)`](Self::with_noise_class)
///     - Adds a class name whose elements are skipped entirely, on top of
///       the defaults (`reference`, `noprint`, `mw-editsection`, ...).
///
/// # Guarantees
/// * Every element with a non-empty label survives, in order and with its
///   relative nesting.
/// * Elements with neither label nor labeled descendants are dropped.
/// * [`normalize`](Self::normalize) is idempotent.
///
/// # Example
/// ```
/// use cladewick::markup::MarkupNormalizer;
///
/// let html = "<ul><li>Aves[1]<ul><li>Palaeognathae</li><li>Neognathae</li></ul></li></ul>";
/// let fragment = MarkupNormalizer::new().normalize_html(html)?;
/// assert_eq!(fragment.len(), 3);
/// assert_eq!(fragment.elements()[0].label, "Aves");
/// # Ok::<(), cladewick::TaxonomyError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MarkupNormalizer {
    noise_classes: Vec<String>,
}

impl Default for MarkupNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupNormalizer {
    /// Creates a normalizer with the default noise classes.
    pub fn new() -> Self {
        MarkupNormalizer {
            noise_classes: DEFAULT_NOISE_CLASSES.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Adds a class name whose elements carry no taxon names.
    pub fn with_noise_class<S: Into<String>>(mut self, class: S) -> Self {
        self.noise_classes.push(class.into());
        self
    }

    /// Returns the class names treated as noise.
    pub fn noise_classes(&self) -> &[String] {
        &self.noise_classes
    }

    /// Extracts and normalizes the taxonomy from an HTML fragment.
    ///
    /// Recognizes cladogram tables (`table.clade`) as well as nested
    /// `ul`/`ol`/`dl` lists.
    ///
    /// # Errors
    /// [TaxonomyError::EmptyTaxonomy] if no labeled element is found.
    pub fn normalize_html(&self, html: &str) -> Result<Fragment, TaxonomyError> {
        let raw = html::extract_fragment(html, &self.noise_classes);
        log::debug!("Extracted {} raw elements from markup", raw.len());
        self.normalize(raw)
    }

    /// Normalizes an already extracted fragment.
    ///
    /// Cleans labels and secondary labels, then drops unusable elements.
    ///
    /// # Errors
    /// [TaxonomyError::EmptyTaxonomy] if no labeled element remains.
    pub fn normalize(&self, mut fragment: Fragment) -> Result<Fragment, TaxonomyError> {
        for element in fragment.elements_mut() {
            element.label = clean_label(&element.label);

            let attributes = &mut element.attributes;
            attributes.info = attributes
                .info
                .iter()
                .map(|info| clean_label(info))
                .filter(|info| !info.is_empty())
                .collect();
            attributes.link = attributes.link.take().map(|l| l.trim().to_string()).filter(|l| !l.is_empty());
            attributes.image = attributes.image.take().map(|i| i.trim().to_string()).filter(|i| !i.is_empty());
        }

        if !fragment.has_labels() {
            return Err(TaxonomyError::EmptyTaxonomy);
        }

        let dropped = fragment.retain_usable();
        if dropped > 0 {
            log::debug!("Dropped {dropped} elements without label or labeled descendants");
        }

        Ok(fragment)
    }
}
