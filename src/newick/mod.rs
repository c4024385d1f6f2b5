//! Newick writer and reader for taxon trees.
//!
//! Taxonomies are written as labeled, multifurcating Newick strings: every
//! node carries its label, including internal nodes and the root, and
//! branch lengths are never written. [NewickStyle::Nhx] additionally
//! writes the attributes of a node as NHX comment.
//!
//! # Quick API
//! * [`to_newick`] - serializes a single tree
//! * [`write_newick_file`] - writes trees to a file, one per line
//! * [`parse_str`] - reads a single Newick string back into a [`TaxonTree`]
//! * [`sanitize_label`] - label replacement used by the writer
//!
//! # Full API
//! Configure a [`NewickParser`] and provide a [`ByteParser`]:
//! * [`NewickParser::parse_str`] - parse a single tree
//! * [`NewickParser::parse_all`] - parse all trees until EOF
//!
//! # Format
//! * `tree ::= node ';'`
//! * `node ::= ['(' node (',' node)* ')'] [label] [':' number]`
//!
//! Furthermore:
//! * Whitespace can occur between elements, just not within an unquoted label
//! * Comments are square brackets and are skipped when reading, NHX
//!   comments included
//! * Labels can be quoted with `'`, a doubled `''` inside stands for one quote
//! * Every leaf must have a label

mod defs;
mod parser;
mod writer;

pub use self::parser::NewickParser;
pub use self::writer::{NewickStyle, sanitize_label, to_newick, write_newick_file};

use crate::model::TaxonTree;
use crate::parser::{ByteParser, ParsingError};

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses a single Newick string to obtain a [`TaxonTree`].
///
/// This is a convenience function using default settings, labels are kept
/// verbatim (underscores stay underscores).
///
/// # Arguments
/// * `newick` - The Newick format string to parse
///
/// # Returns
/// * [`TaxonTree`] - Tree parsed from the string
/// * [`ParsingError`] - If the string is not valid Newick format
///
/// # Example
/// ```
/// use cladewick::newick::parse_str;
///
/// let tree = parse_str("(Fratercula_cirrhata,(Fratercula_arctica,Fratercula_corniculata)Fratercula)Fraterculini;")?;
/// assert_eq!(tree.num_leaves(), 3);
/// assert_eq!(tree.root().label(), "Fraterculini");
/// # Ok::<(), cladewick::parser::ParsingError>(())
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<TaxonTree, ParsingError> {
    let mut byte_parser = ByteParser::for_str(newick.as_ref());
    NewickParser::new().parse_str(&mut byte_parser)
}
