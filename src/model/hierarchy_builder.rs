//! Reconstructs a rooted tree from a normalized taxonomy [Fragment].
//!
//! # Algorithm
//! The fragment is consumed in document order while an explicit stack
//! holds the currently open ancestors, each tagged with the depth it was
//! observed at:
//!
//! 1. The first usable element becomes the root.
//! 2. For each further element, pop the stack until its top is strictly
//!    shallower than the element.
//! 3. The top of the stack becomes the parent; the new node is pushed.
//!
//! Inconsistent markup degrades instead of failing:
//! * Stack empty although a root exists: attach to the root
//!   ([AnomalyKind::Reattached]).
//! * Same label as the preceding sibling at the same depth: merge into that
//!   sibling, so its children are the union of both in document order
//!   ([AnomalyKind::DuplicateCollapsed]).
//! * Neither label nor usable descendants: skip
//!   ([AnomalyKind::DroppedEmpty]).
//! * More than one level deeper than the parent: attach anyway
//!   ([AnomalyKind::DepthGap]).

use crate::error::TaxonomyError;
use crate::markup::{Fragment, MarkupElement};
use crate::model::anomaly::{AnomalyKind, StructuralAnomaly};
use crate::model::tree::{NodeIndex, TaxonTree};

// =#========================================================================#=
// RECONSTRUCTION
// =#========================================================================#=
/// Result of a successful build: the tree plus advisory warnings.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    /// The reconstructed tree
    pub tree: TaxonTree,
    /// Inconsistencies resolved by fallback rules, in document order
    pub anomalies: Vec<StructuralAnomaly>,
}

impl Reconstruction {
    /// Returns `true` if the markup was consistent, i.e. no anomaly occurred.
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }

    /// Returns how many anomalies of the given kind occurred.
    pub fn count(&self, kind: AnomalyKind) -> usize {
        self.anomalies.iter().filter(|a| a.kind == kind).count()
    }
}

// =#========================================================================#=
// HIERARCHY BUILDER
// =#========================================================================$=
/// Builds a [TaxonTree] from a [Fragment] (see [module docs](self)).
///
/// # Configuration
/// * [`with_collapse_duplicates(bool)`](Self::with_collapse_duplicates)
///     - Whether repeated adjacent labels at the same depth are merged
///       (default `true`).
///
/// # Example
/// ```
/// use cladewick::markup::{Fragment, MarkupElement};
/// use cladewick::model::HierarchyBuilder;
///
/// let fragment = Fragment::from_elements(vec![
///     MarkupElement::clade(0, "Palaeognathae"),
///     MarkupElement::leaf(1, "Struthioniformes"),
///     MarkupElement::leaf(1, "Tinamiformes"),
/// ]);
/// let reconstruction = HierarchyBuilder::new().build(&fragment)?;
/// assert_eq!(reconstruction.tree.root().label(), "Palaeognathae");
/// assert_eq!(reconstruction.tree.root().children().len(), 2);
/// # Ok::<(), cladewick::TaxonomyError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HierarchyBuilder {
    collapse_duplicates: bool,
}

impl Default for HierarchyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        HierarchyBuilder {
            collapse_duplicates: true,
        }
    }

    /// Sets whether adjacent duplicate labels at the same depth are merged.
    pub fn with_collapse_duplicates(mut self, collapse_duplicates: bool) -> Self {
        self.collapse_duplicates = collapse_duplicates;
        self
    }

    /// Reconstructs the tree of the given fragment.
    ///
    /// # Errors
    /// * [TaxonomyError::EmptyTaxonomy] if the fragment has no elements
    /// * [TaxonomyError::NoRootFound] if no element has a label
    pub fn build(&self, fragment: &Fragment) -> Result<Reconstruction, TaxonomyError> {
        if fragment.is_empty() {
            return Err(TaxonomyError::EmptyTaxonomy);
        }

        let mask = fragment.usable_mask();
        let elements = fragment.elements();
        let root_position = mask
            .iter()
            .position(|&usable| usable)
            .ok_or(TaxonomyError::NoRootFound)?;

        let root = &elements[root_position];
        let mut state = BuildState {
            tree: TaxonTree::with_root(root.label.clone(), root.is_leaf(), root.attributes.clone()),
            node_depths: vec![root.depth],
            stack: vec![(0, root.depth)],
            anomalies: Vec::new(),
            collapse_duplicates: self.collapse_duplicates,
        };

        for (position, element) in elements.iter().enumerate() {
            if position == root_position {
                continue;
            }
            if mask[position] {
                state.attach(position, element);
            } else {
                state.record(AnomalyKind::DroppedEmpty, position, element);
            }
        }

        log::debug!(
            "Reconstructed tree with {} nodes ({} anomalies)",
            state.tree.num_nodes(),
            state.anomalies.len()
        );

        Ok(Reconstruction {
            tree: state.tree,
            anomalies: state.anomalies,
        })
    }
}

// ============================================================================
// Build state (private)
// ============================================================================
struct BuildState {
    tree: TaxonTree,
    /// Observed depth of each node, parallel to the tree arena
    node_depths: Vec<usize>,
    /// Open ancestors as (node, observed depth)
    stack: Vec<(NodeIndex, usize)>,
    anomalies: Vec<StructuralAnomaly>,
    collapse_duplicates: bool,
}

impl BuildState {
    fn attach(&mut self, position: usize, element: &MarkupElement) {
        while self.stack.last().is_some_and(|&(_, depth)| depth >= element.depth) {
            self.stack.pop();
        }

        let parent = match self.stack.last() {
            Some(&(parent, parent_depth)) => {
                if element.depth > parent_depth + 1 {
                    self.record(AnomalyKind::DepthGap, position, element);
                }
                parent
            }
            None => {
                let root = self.tree.root_index();
                if self.is_duplicate(root, element) {
                    self.collapse_into(root, position, element);
                    return;
                }
                self.record(AnomalyKind::Reattached, position, element);
                root
            }
        };

        if let Some(&previous) = self.tree[parent].children().last() {
            if self.is_duplicate(previous, element) {
                self.collapse_into(previous, position, element);
                return;
            }
        }

        let index = self.tree.add_child(
            parent,
            element.label.clone(),
            element.is_leaf(),
            element.attributes.clone(),
        );
        self.node_depths.push(element.depth);
        self.stack.push((index, element.depth));
    }

    /// Whether `element` repeats the taxon of node `candidate` at the same depth.
    fn is_duplicate(&self, candidate: NodeIndex, element: &MarkupElement) -> bool {
        self.collapse_duplicates
            && element.has_label()
            && self.node_depths[candidate] == element.depth
            && self.tree[candidate].label() == element.label
    }

    /// Merges `element` into the existing node and reopens it, so following
    /// deeper elements become its children.
    fn collapse_into(&mut self, node: NodeIndex, position: usize, element: &MarkupElement) {
        self.tree
            .node_mut(node)
            .absorb(element.is_leaf(), element.attributes.clone());
        self.stack.push((node, element.depth));
        self.record(AnomalyKind::DuplicateCollapsed, position, element);
    }

    fn record(&mut self, kind: AnomalyKind, position: usize, element: &MarkupElement) {
        let anomaly = StructuralAnomaly::new(kind, position, &element.label);
        log::warn!("Structural anomaly: {anomaly}");
        self.anomalies.push(anomaly);
    }
}
