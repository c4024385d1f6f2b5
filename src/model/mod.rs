//! Data model for reconstructed taxonomic trees.
//!
//! # Tree representation
//! Trees are represented by [TaxonTree], which uses the arena pattern to
//! store [TaxonNode]s referenced by [NodeIndex]. Each node owns its ordered
//! list of children; the parent is only stored as an index, so trees never
//! contain reference cycles.
//!
//! # Building trees
//! Trees are constructed from a normalized [Fragment](crate::markup::Fragment)
//! by the [HierarchyBuilder], which returns a [Reconstruction]: the tree
//! plus any [StructuralAnomaly] encountered on the way.

pub mod anomaly;
pub mod hierarchy_builder;
pub mod node;
pub mod tree;

pub use anomaly::{AnomalyKind, StructuralAnomaly};
pub use hierarchy_builder::{HierarchyBuilder, Reconstruction};
pub use node::{TaxonAttributes, TaxonNode};
pub use tree::{NodeIndex, TaxonTree};
