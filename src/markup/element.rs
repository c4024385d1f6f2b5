//! Flat, document-ordered representation of nested taxonomy markup.

use crate::model::TaxonAttributes;

// =#========================================================================#=
// MARKUP ELEMENT
// =#========================================================================#=
/// How an element was presented in the source markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// A group which may contain further elements (clade row with a nested
    /// cladogram, list item with a sub-list)
    Clade,
    /// A terminal taxon (leaf cell, list item without sub-list)
    Leaf,
}

/// One labeled (or unnamed) element of a taxonomy fragment.
///
/// The nesting is captured by `depth`, the number of structural containers
/// (cladogram tables, lists) enclosing the element. Depth is taken from
/// containment, never from indentation, and may skip levels.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkupElement {
    /// Nesting depth by structural containment
    pub depth: usize,
    /// Taxon name; empty for unnamed clades
    pub label: String,
    /// Clade or leaf, as presented by the source
    pub kind: ElementKind,
    /// Link, image, secondary labels and branch style
    pub attributes: TaxonAttributes,
}

impl MarkupElement {
    /// Creates a clade element without attributes.
    pub fn clade<S: Into<String>>(depth: usize, label: S) -> Self {
        MarkupElement {
            depth,
            label: label.into(),
            kind: ElementKind::Clade,
            attributes: TaxonAttributes::default(),
        }
    }

    /// Creates a leaf element without attributes.
    pub fn leaf<S: Into<String>>(depth: usize, label: S) -> Self {
        MarkupElement {
            depth,
            label: label.into(),
            kind: ElementKind::Leaf,
            attributes: TaxonAttributes::default(),
        }
    }

    /// Replaces the attributes of this element.
    pub fn with_attributes(mut self, attributes: TaxonAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Returns `true` if the label is non-empty.
    pub fn has_label(&self) -> bool {
        !self.label.is_empty()
    }

    /// Returns `true` if the source presented this element as a leaf.
    pub fn is_leaf(&self) -> bool {
        self.kind == ElementKind::Leaf
    }
}

// =#========================================================================#=
// FRAGMENT
// =#========================================================================#=
/// The taxonomy section of a document as a sequence of [MarkupElement]s in
/// document order.
///
/// An element's children are the elements following it that are deeper
/// than it, up to the next element at its depth or above.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fragment {
    elements: Vec<MarkupElement>,
}

impl Fragment {
    /// Creates an empty fragment.
    pub fn new() -> Self {
        Fragment::default()
    }

    /// Creates a fragment from elements given in document order.
    pub fn from_elements(elements: Vec<MarkupElement>) -> Self {
        Fragment { elements }
    }

    /// Appends an element, returning its position.
    pub fn push(&mut self, element: MarkupElement) -> usize {
        self.elements.push(element);
        self.elements.len() - 1
    }

    /// Returns the elements in document order.
    pub fn elements(&self) -> &[MarkupElement] {
        &self.elements
    }

    pub(crate) fn elements_mut(&mut self) -> &mut [MarkupElement] {
        &mut self.elements
    }

    /// Consumes the fragment and returns its elements.
    pub fn into_elements(self) -> Vec<MarkupElement> {
        self.elements
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns `true` if at least one element has a label.
    pub fn has_labels(&self) -> bool {
        self.elements.iter().any(MarkupElement::has_label)
    }

    /// Returns for each element whether it is usable as a tree node, that
    /// is, whether it has a label or at least one usable descendant.
    ///
    /// Evaluated back to front, so an unnamed element whose only
    /// descendants are unusable is itself unusable.
    pub fn usable_mask(&self) -> Vec<bool> {
        let mut mask = vec![false; self.elements.len()];
        // Depth of the nearest usable element after the current one
        let mut next_usable_depth: Option<usize> = None;

        for (i, element) in self.elements.iter().enumerate().rev() {
            let has_usable_child = next_usable_depth.is_some_and(|d| d > element.depth);
            if element.has_label() || has_usable_child {
                mask[i] = true;
                next_usable_depth = Some(element.depth);
            }
        }

        mask
    }

    /// Removes all unusable elements (see [usable_mask](Self::usable_mask)),
    /// returning how many were removed.
    pub(crate) fn retain_usable(&mut self) -> usize {
        let mask = self.usable_mask();
        let before = self.elements.len();
        let mut keep = mask.into_iter();
        self.elements.retain(|_| keep.next().unwrap_or(false));
        before - self.elements.len()
    }
}

impl FromIterator<MarkupElement> for Fragment {
    fn from_iter<I: IntoIterator<Item = MarkupElement>>(iter: I) -> Self {
        Fragment::from_elements(iter.into_iter().collect())
    }
}
