//! Non-fatal inconsistencies found while reconstructing a tree.

use std::fmt;

/// Kind of a [StructuralAnomaly].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnomalyKind {
    /// All open ancestors were closed although a root already exists;
    /// the element was attached to the root instead.
    Reattached,
    /// The element repeated the label of its preceding sibling at the same
    /// depth and was merged into it.
    DuplicateCollapsed,
    /// The element had neither a label nor children and was skipped.
    DroppedEmpty,
    /// The element was nested more than one level below its parent.
    DepthGap,
}

/// A structural inconsistency in the source markup, resolved by a fallback
/// rule instead of failing the conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralAnomaly {
    /// What went wrong
    pub kind: AnomalyKind,
    /// Position of the offending element in the fragment (document order)
    pub element_index: usize,
    /// Label of the offending element (possibly empty)
    pub label: String,
}

impl StructuralAnomaly {
    pub(crate) fn new(kind: AnomalyKind, element_index: usize, label: &str) -> Self {
        StructuralAnomaly {
            kind,
            element_index,
            label: label.to_string(),
        }
    }
}

impl fmt::Display for StructuralAnomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            AnomalyKind::Reattached => "no open ancestor left, attached to root",
            AnomalyKind::DuplicateCollapsed => "duplicate of preceding sibling, merged",
            AnomalyKind::DroppedEmpty => "no label and no children, dropped",
            AnomalyKind::DepthGap => "nested more than one level below its parent",
        };
        write!(f, "element {} {:?}: {}", self.element_index, self.label, what)
    }
}
