//! Node module for taxonomic tree representation.

use crate::model::tree::NodeIndex;

// =#========================================================================#=
// TAXON NODE
// =#========================================================================#=
/// Represents a single taxon (node) in a [TaxonTree](crate::model::TaxonTree).
///
/// Nodes live in the arena of their tree and only reference each other by
/// [NodeIndex]:
/// - **Children** are owned by this node, stored in document order.
/// - **Parent** is a plain relation (not ownership), `None` only for the root.
///
/// # Invariants
/// - `index` is the position of this node in the tree arena
/// - `children` never contains `index` itself or one of its ancestors
/// - A node without label always has children (unlabeled leaves are noise
///   and never become nodes)
#[derive(PartialEq, Debug, Clone)]
pub struct TaxonNode {
    /// Index of this node in the tree arena
    index: NodeIndex,
    /// Taxon name, possibly empty for unnamed clades
    label: String,
    /// Index of the parent node, `None` for the root
    parent: Option<NodeIndex>,
    /// Indices of the child nodes in document order
    children: Vec<NodeIndex>,
    /// Whether the source presented this taxon as a leaf
    explicit_leaf: bool,
    /// Extra data carried over from the markup
    attributes: TaxonAttributes,
}

impl TaxonNode {
    /// Creates a new node without parent and children.
    ///
    /// # Arguments
    /// * `index` - The unique index of this node in the tree (arena)
    /// * `label` - Taxon name (already normalized)
    /// * `explicit_leaf` - Whether the source marked this taxon as leaf
    /// * `attributes` - Link, image and info strings from the source
    pub(crate) fn new(
        index: NodeIndex,
        label: String,
        explicit_leaf: bool,
        attributes: TaxonAttributes,
    ) -> Self {
        TaxonNode {
            index,
            label,
            parent: None,
            children: Vec::new(),
            explicit_leaf,
            attributes,
        }
    }

    /// Returns the index of this node.
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    /// Returns the label of this node (empty for unnamed clades).
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns `true` if this node has a non-empty label.
    pub fn has_label(&self) -> bool {
        !self.label.is_empty()
    }

    /// Returns the index of the parent, or `None` for the root.
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Returns the indices of the children in document order.
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    /// Returns `true` if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns `true` if this node has no parent.
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Returns whether the source markup presented this taxon as a leaf.
    pub fn is_explicit_leaf(&self) -> bool {
        self.explicit_leaf
    }

    /// Returns the attributes carried over from the markup.
    pub fn attributes(&self) -> &TaxonAttributes {
        &self.attributes
    }

    pub(crate) fn set_parent(&mut self, parent: NodeIndex) {
        self.parent = Some(parent);
    }

    pub(crate) fn set_label(&mut self, label: String) {
        self.label = label;
    }

    pub(crate) fn set_explicit_leaf(&mut self, explicit_leaf: bool) {
        self.explicit_leaf = explicit_leaf;
    }

    pub(crate) fn push_child(&mut self, child: NodeIndex) {
        self.children.push(child);
    }

    /// Folds a duplicate occurrence of this taxon into this node.
    pub(crate) fn absorb(&mut self, explicit_leaf: bool, attributes: TaxonAttributes) {
        self.explicit_leaf &= explicit_leaf;
        self.attributes.merge(attributes);
    }
}

// =#========================================================================#=
// TAXON ATTRIBUTES
// =#========================================================================#=
/// Additional data of a taxon as found in cladogram markup.
///
/// None of this influences the tree structure; it is only written out
/// in NHX style (see [NewickStyle::Nhx](crate::newick::NewickStyle::Nhx)).
#[derive(PartialEq, Debug, Clone, Default)]
pub struct TaxonAttributes {
    /// Target of the first hyperlink in the taxon's cell
    pub link: Option<String>,
    /// Source of the first image in the taxon's cell
    pub image: Option<String>,
    /// Secondary labels, e.g. divergence times like "690 Mya"
    pub info: Vec<String>,
    /// Branch drawn dashed, i.e. the grouping is uncertain
    pub uncertain: bool,
}

impl TaxonAttributes {
    /// Returns `true` if no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.link.is_none() && self.image.is_none() && self.info.is_empty() && !self.uncertain
    }

    /// Merges `other` into `self`; values already present win.
    pub(crate) fn merge(&mut self, other: TaxonAttributes) {
        if self.link.is_none() {
            self.link = other.link;
        }
        if self.image.is_none() {
            self.image = other.image;
        }
        self.info.extend(other.info);
        self.uncertain |= other.uncertain;
    }
}
