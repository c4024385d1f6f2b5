//! Newick serialization of taxon trees.

use crate::model::{NodeIndex, TaxonAttributes, TaxonTree};
use crate::newick::defs::{NHX_RESERVED_CHARS, RESERVED_CHARS, UNCERTAIN_SUPPORT};
use std::borrow::Cow;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Extra buffer in Newick string length/capacity estimate
const BUFFER_CHARS: usize = 10;

/// Style for serializing a tree to Newick format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewickStyle {
    /// Labels of all nodes, root included, nothing else
    #[default]
    Plain,
    /// Like [Plain](Self::Plain), plus an NHX comment
    /// `[&&NHX:info=..:link=..:img=..:support=..]` on every node that
    /// carries attributes
    Nhx,
}

/// Makes a label safe for unquoted use in Newick.
///
/// Parentheses, commas, colons, semicolons, square brackets, single quotes
/// and whitespace are each replaced by an underscore. Everything else,
/// including non-ASCII characters, is kept.
///
/// # Examples
/// ```
/// # use cladewick::newick::sanitize_label;
/// assert_eq!(sanitize_label("Pukeko"), "Pukeko");
/// assert_eq!(sanitize_label("Apteryx australis"), "Apteryx_australis");
/// assert_eq!(sanitize_label("Ratites (paraphyletic)"), "Ratites__paraphyletic_");
/// assert_eq!(sanitize_label("Baillon's crake"), "Baillon_s_crake");
/// assert_eq!(sanitize_label("†Moa"), "†Moa");
/// ```
pub fn sanitize_label(label: &str) -> Cow<'_, str> {
    sanitize_with(label, |c| RESERVED_CHARS.contains(&c))
}

fn sanitize_nhx_value(value: &str) -> Cow<'_, str> {
    sanitize_with(value, |c| {
        RESERVED_CHARS.contains(&c) || NHX_RESERVED_CHARS.contains(&c)
    })
}

fn sanitize_with(text: &str, reserved: impl Fn(char) -> bool) -> Cow<'_, str> {
    let replace = |c: char| c.is_whitespace() || reserved(c);
    if !text.chars().any(replace) {
        return Cow::Borrowed(text);
    }

    log::trace!("Sanitizing label {text:?}");
    Cow::Owned(text.chars().map(|c| if replace(c) { '_' } else { c }).collect())
}

/// Writes the given trees to a file in Newick format, one tree per line.
///
/// # Errors
/// Returns an I/O error if creating or writing the file fails.
///
/// # Example
/// ```no_run
/// use cladewick::newick::{NewickStyle, write_newick_file};
///
/// let tree = cladewick::newick::parse_str("(Apteryx,Dinornis)Palaeognathae;")?;
/// write_newick_file("ratites.nwk", &[tree], NewickStyle::Plain)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn write_newick_file<P: AsRef<Path>>(
    path: P,
    trees: &[TaxonTree],
    style: NewickStyle,
) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for tree in trees {
        let newick = to_newick(style, tree);
        writer.write_all(newick.as_bytes())?;
        writer.write_all(b"\n")?;
    }

    writer.flush()
}

/// Returns the Newick representation of this tree with closing semicolon.
///
/// A node without children is written as its label; a node with children
/// as `(child1,child2,...)label`, children in stored order. Labels are
/// passed through [sanitize_label]. The output is a pure function of the
/// tree.
///
/// # Example
/// ```
/// use cladewick::markup::{Fragment, MarkupElement};
/// use cladewick::model::HierarchyBuilder;
/// use cladewick::newick::{NewickStyle, to_newick};
///
/// let fragment = Fragment::from_elements(vec![
///     MarkupElement::clade(0, "R"),
///     MarkupElement::leaf(1, "A"),
///     MarkupElement::leaf(1, "B"),
/// ]);
/// let tree = HierarchyBuilder::new().build(&fragment)?.tree;
/// assert_eq!(to_newick(NewickStyle::Plain, &tree), "(A,B)R;");
/// # Ok::<(), cladewick::TaxonomyError>(())
/// ```
pub fn to_newick(style: NewickStyle, tree: &TaxonTree) -> String {
    let estimated_capacity = estimate_newick_len(style, tree);
    to_newick_with_capacity(style, tree, estimated_capacity)
}

/// Returns the Newick representation of a tree with pre-allocated capacity.
pub(crate) fn to_newick_with_capacity(
    style: NewickStyle,
    tree: &TaxonTree,
    estimated_capacity: usize,
) -> String {
    // Recursive helper for building the Newick string
    fn build_newick(tree: &TaxonTree, newick: &mut String, index: NodeIndex, style: NewickStyle) {
        let node = &tree[index];

        if !node.is_leaf() {
            newick.push('(');
            for (i, &child) in node.children().iter().enumerate() {
                if i > 0 {
                    newick.push(',');
                }
                build_newick(tree, newick, child, style);
            }
            newick.push(')');
        }

        newick.push_str(&sanitize_label(node.label()));

        if style == NewickStyle::Nhx {
            build_nhx_comment(newick, node.attributes());
        }
    }

    let mut newick = String::with_capacity(estimated_capacity);
    build_newick(tree, &mut newick, tree.root_index(), style);
    newick.push(';');

    newick
}

/// Appends `[&&NHX:...]` for the set attributes, nothing if none is set.
fn build_nhx_comment(newick: &mut String, attributes: &TaxonAttributes) {
    if attributes.is_empty() {
        return;
    }

    let mut fields: Vec<(&str, Cow<'_, str>)> = Vec::with_capacity(4);
    if !attributes.info.is_empty() {
        let info: Vec<Cow<'_, str>> = attributes.info.iter().map(|i| sanitize_nhx_value(i)).collect();
        fields.push(("info", Cow::Owned(info.join("|"))));
    }
    if let Some(link) = &attributes.link {
        fields.push(("link", sanitize_nhx_value(link)));
    }
    if let Some(image) = &attributes.image {
        fields.push(("img", sanitize_nhx_value(image)));
    }
    if attributes.uncertain {
        fields.push(("support", Cow::Borrowed(UNCERTAIN_SUPPORT)));
    }

    newick.push_str("[&&NHX");
    for (key, value) in fields {
        newick.push(':');
        newick.push_str(key);
        newick.push('=');
        newick.push_str(&value);
    }
    newick.push(']');
}

/// Estimates the length of the Newick string of a tree.
///
/// Counts structural characters and label lengths; NHX comments are
/// estimated by the length of their raw values.
pub(crate) fn estimate_newick_len(style: NewickStyle, tree: &TaxonTree) -> usize {
    // Each internal node: "()" plus one ',' per child beyond the first ~= 3 chars
    const INTERNAL_NODE_CHARS: usize = 3;
    // "[&&NHX" + "]" + keys
    const NHX_OVERHEAD_CHARS: usize = 30;

    let structure_capacity = tree.num_internal() * INTERNAL_NODE_CHARS + tree.num_nodes();
    let label_capacity: usize = tree.pre_order_iter().map(|n| n.label().len()).sum();

    let nhx_capacity = match style {
        NewickStyle::Plain => 0,
        NewickStyle::Nhx => tree
            .pre_order_iter()
            .map(|n| n.attributes())
            .filter(|a| !a.is_empty())
            .map(|a| {
                NHX_OVERHEAD_CHARS
                    + a.link.as_ref().map_or(0, String::len)
                    + a.image.as_ref().map_or(0, String::len)
                    + a.info.iter().map(|i| i.len() + 1).sum::<usize>()
            })
            .sum(),
    };

    structure_capacity + label_capacity + nhx_capacity + BUFFER_CHARS
}
