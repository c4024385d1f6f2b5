//! Error types for markup normalization and tree reconstruction.
//!
//! Only conditions that leave no tree to return are errors. Structural
//! inconsistencies are reported as
//! [StructuralAnomaly](crate::model::StructuralAnomaly) warnings next to
//! the reconstructed tree instead.

use thiserror::Error;

/// Hard failures of a conversion run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaxonomyError {
    /// The fragment is empty or contains no labeled element.
    #[error("taxonomy fragment contains no labeled elements")]
    EmptyTaxonomy,

    /// No element of the fragment could serve as root.
    #[error("no element carries a usable label to serve as root")]
    NoRootFound,
}
