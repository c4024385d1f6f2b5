//! Provides the taxonomic tree representation.
//!
//! Provides core data structures for representing reconstructed taxonomies:
//! * [TaxonTree] - Main tree structure using the arena pattern over [TaxonNode]
//! * [NodeIndex] as type used to index nodes in tree
//! * [PreOrderIter] and [PostOrderIter] for traversal without recursion

use crate::model::node::{TaxonAttributes, TaxonNode};
use crate::newick;
use crate::newick::NewickStyle;
use std::fmt;

/// Index of a node in a tree (arena).
pub type NodeIndex = usize;

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A rooted, multifurcating taxonomic tree represented using the arena
/// pattern on [TaxonNode].
///
/// Nodes are stored in a contiguous vector and referenced by [NodeIndex].
/// Children are owned by their parent (listed in its `children`), the
/// parent is only recorded as an index, so no reference cycles can arise.
///
/// # Structure
/// - All nodes are stored in the arena; the root is always present.
/// - Children keep the order in which the taxa were listed in the source.
/// - Labels may repeat (homonyms in different clades); label equality never
///   implies node identity.
///
/// # Construction
/// Trees are constructed by the
/// [HierarchyBuilder](crate::model::HierarchyBuilder) from markup or by the
/// [Newick reader](crate::newick::parse_str). Once handed out, a tree is
/// immutable; the public API is read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxonTree {
    /// Nodes of this tree (arena pattern)
    nodes: Vec<TaxonNode>,

    /// Index of the root of this tree
    root_index: NodeIndex,
}

// ============================================================================
// Construction (crate)
// ============================================================================
impl TaxonTree {
    /// Creates a new tree consisting of only its root.
    pub(crate) fn with_root(label: String, explicit_leaf: bool, attributes: TaxonAttributes) -> Self {
        TaxonTree {
            nodes: vec![TaxonNode::new(0, label, explicit_leaf, attributes)],
            root_index: 0,
        }
    }

    /// Adds a new node as last child of `parent`, returning its index.
    ///
    /// # Panics
    /// Panics if `parent` is out of bounds.
    pub(crate) fn add_child(
        &mut self,
        parent: NodeIndex,
        label: String,
        explicit_leaf: bool,
        attributes: TaxonAttributes,
    ) -> NodeIndex {
        let index = self.nodes.len();
        let mut node = TaxonNode::new(index, label, explicit_leaf, attributes);
        node.set_parent(parent);
        self.nodes.push(node);
        self.nodes[parent].push_child(index);
        index
    }

    /// Returns a mutable reference to the node at the given index.
    pub(crate) fn node_mut(&mut self, index: NodeIndex) -> &mut TaxonNode {
        &mut self.nodes[index]
    }
}

// ============================================================================
// Getters / Accessors (pub)
// ============================================================================
impl TaxonTree {
    /// Returns a reference to the root node.
    pub fn root(&self) -> &TaxonNode {
        &self[self.root_index]
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> NodeIndex {
        self.root_index
    }

    /// Returns a reference to the node at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn node(&self, index: NodeIndex) -> &TaxonNode {
        &self[index]
    }

    /// Returns the node at the given index, or `None` if out of bounds.
    pub fn get(&self, index: NodeIndex) -> Option<&TaxonNode> {
        self.nodes.get(index)
    }

    /// Returns the children of the given node as node references.
    pub fn children_of(&self, index: NodeIndex) -> impl Iterator<Item = &TaxonNode> {
        self[index].children().iter().map(|&child| &self[child])
    }

    /// Returns the parent of the given node, or `None` for the root.
    pub fn parent_of(&self, index: NodeIndex) -> Option<&TaxonNode> {
        self[index].parent().map(|parent| &self[parent])
    }

    /// Returns the number of nodes in this tree.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of leaves (childless nodes) in this tree.
    pub fn num_leaves(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// Returns the number of nodes with children.
    pub fn num_internal(&self) -> usize {
        self.nodes.len() - self.num_leaves()
    }

    /// Returns the number of edges between the root and the given node.
    pub fn depth_of(&self, index: NodeIndex) -> usize {
        let mut depth = 0;
        let mut current = &self[index];
        while let Some(parent) = current.parent() {
            depth += 1;
            current = &self[parent];
        }
        depth
    }

    /// Returns the largest depth of any node, that is, the height of the tree.
    pub fn height(&self) -> usize {
        // Depth of each node computed top-down, parents come first in pre-order
        let mut depths = vec![0; self.nodes.len()];
        let mut height = 0;
        for node in self.pre_order_iter() {
            if let Some(parent) = node.parent() {
                depths[node.index()] = depths[parent] + 1;
                height = height.max(depths[node.index()]);
            }
        }
        height
    }

    /// Returns all labels in pre-order, skipping unnamed clades.
    pub fn labels(&self) -> Vec<&str> {
        self.pre_order_iter()
            .filter(|n| n.has_label())
            .map(|n| n.label())
            .collect()
    }

    /// Returns all nodes with the given label in pre-order.
    pub fn find_by_label<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a TaxonNode> {
        self.pre_order_iter().filter(move |n| n.label() == label)
    }

    /// Convenience method to convert this tree to a Newick string.
    pub fn to_newick(&self, style: NewickStyle) -> String {
        newick::to_newick(style, self)
    }
}

// ============================================================================
// Validation (pub)
// ============================================================================
impl TaxonTree {
    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - Root index is valid and the root has no parent
    /// - All node indices match their position in the arena
    /// - All child indices are valid and point back to correct parent
    /// - All non-root nodes have a valid parent listing them exactly once
    /// - Every node is reachable from the root exactly once (no cycles,
    ///   no shared children)
    /// - Nodes without label have children
    ///
    /// # Returns
    /// `true` if tree is valid, `false` otherwise
    pub fn is_valid(&self) -> bool {
        let num_nodes = self.nodes.len();
        if self.root_index >= num_nodes || !self.nodes[self.root_index].is_root() {
            return false;
        }

        for (index, node) in self.nodes.iter().enumerate() {
            if node.index() != index {
                return false;
            }

            if !node.has_label() && node.is_leaf() {
                return false;
            }

            for &child in node.children() {
                if child >= num_nodes || self.nodes[child].parent() != Some(index) {
                    return false;
                }
            }

            match node.parent() {
                None => {
                    // Only one root
                    if index != self.root_index {
                        return false;
                    }
                }
                Some(parent) => {
                    if parent >= num_nodes {
                        return false;
                    }
                    let listed = self.nodes[parent]
                        .children()
                        .iter()
                        .filter(|&&c| c == index)
                        .count();
                    if listed != 1 {
                        return false;
                    }
                }
            }
        }

        // Reachability; bounded by the arena size, so a cycle cannot loop forever
        let mut seen = vec![false; num_nodes];
        let mut stack = vec![self.root_index];
        let mut visited = 0;
        while let Some(index) = stack.pop() {
            if seen[index] {
                return false;
            }
            seen[index] = true;
            visited += 1;
            stack.extend(self.nodes[index].children().iter().copied());
        }

        visited == num_nodes
    }
}

impl std::ops::Index<NodeIndex> for TaxonTree {
    type Output = TaxonNode;

    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index]
    }
}

// ============================================================================
// Printing
// ============================================================================
/// Outline of the tree, one taxon per line.
///
/// # Example Output
/// ```text
/// Dinosauria
///   ├─ Ornithischia
///   └─ Saurischia
///       ├─ Sauropodomorpha
///       └─ Theropoda
/// ```
impl fmt::Display for TaxonTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, self.root_index, "", true)
    }
}

impl TaxonTree {
    fn fmt_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        index: NodeIndex,
        prefix: &str,
        is_last: bool,
    ) -> fmt::Result {
        let node = &self[index];
        let connector = if node.is_root() {
            ""
        } else if is_last {
            "└─ "
        } else {
            "├─ "
        };
        let label = if node.has_label() { node.label() } else { "·" };
        writeln!(f, "{prefix}{connector}{label}")?;

        let new_prefix = if node.is_root() {
            "  ".to_string()
        } else {
            format!("{}{}   ", prefix, if is_last { " " } else { "│" })
        };
        let num_children = node.children().len();
        for (i, &child) in node.children().iter().enumerate() {
            self.fmt_node(f, child, &new_prefix, i + 1 == num_children)?;
        }
        Ok(())
    }
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
impl TaxonTree {
    /// Returns an iterator over the tree in pre-order (parents before
    /// children, siblings in document order).
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter {
            tree: self,
            stack: vec![self.root_index],
        }
    }

    /// Returns an iterator over the tree in post-order (children before
    /// parents, siblings in document order).
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter {
            tree: self,
            stack: vec![(self.root_index, false)],
        }
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
pub struct PreOrderIter<'a> {
    tree: &'a TaxonTree,
    stack: Vec<NodeIndex>,
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a TaxonNode;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let node = &self.tree[index];

        // Push children in reverse, so the first child is processed first
        self.stack.extend(node.children().iter().rev().copied());

        Some(node)
    }
}

/// Iterator for post-order traversal (children before parents).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
pub struct PostOrderIter<'a> {
    tree: &'a TaxonTree,
    stack: Vec<(NodeIndex, bool)>, // (index, children_visited)
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a TaxonNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let node = &self.tree[index];

            if children_visited || node.is_leaf() {
                return Some(node);
            }

            self.stack.push((index, true));
            self.stack
                .extend(node.children().iter().rev().map(|&child| (child, false)));
        }
        None
    }
}
