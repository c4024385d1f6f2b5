//! Reads Newick strings back into taxon trees.
//!
//! This module provides the [NewickParser] struct, a reader for labeled,
//! multifurcating Newick trees as written by [to_newick](crate::newick::to_newick).

use crate::model::{NodeIndex, TaxonAttributes, TaxonTree};
use crate::newick::defs::NEWICK_LABEL_DELIMITERS;
use crate::parser::byte_parser::ByteParser;
use crate::parser::parsing_error::{ParsingError, ParsingErrorKind};

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================$=
/// Parser (configuration) for Newick strings of taxon trees.
///
/// # Configuration
/// * [`with_underscores_as_spaces()`](Self::with_underscores_as_spaces)
///     - Turns underscores in unquoted labels back into spaces. By default
///       labels are kept verbatim, so reading written output yields the
///       sanitized labels.
///
/// # Parsing
/// * [`parse_str`](Self::parse_str) - Parse single tree
/// * [`parse_all`](Self::parse_all) - Parse all trees until EOF
///
/// Branch lengths are accepted and ignored, `[...]` comments (including NHX
/// comments) are skipped.
///
/// # Example
/// ```
/// use cladewick::newick::NewickParser;
/// use cladewick::parser::ByteParser;
///
/// let mut byte_parser = ByteParser::for_str("((Apteryx,Dinornis)Notopalaeognathae,Struthio)Palaeognathae;");
/// let tree = NewickParser::new().parse_str(&mut byte_parser)?;
/// assert_eq!(tree.num_leaves(), 3);
/// assert_eq!(tree.root().label(), "Palaeognathae");
/// # Ok::<(), cladewick::parser::ParsingError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct NewickParser {
    underscores_as_spaces: bool,
}

impl NewickParser {
    /// Creates a new [NewickParser] reading labels verbatim.
    pub fn new() -> Self {
        NewickParser::default()
    }

    /// Configures the parser to turn underscores in unquoted labels into spaces.
    pub fn with_underscores_as_spaces(mut self) -> Self {
        self.underscores_as_spaces = true;
        self
    }

    /// Parses all Newick trees until EOF.
    ///
    /// # Returns
    /// * `Ok(Vec<TaxonTree>)` - All parsed trees
    /// * `Err(ParsingError)` - If any tree fails to parse
    pub fn parse_all(&self, parser: &mut ByteParser<'_>) -> Result<Vec<TaxonTree>, ParsingError> {
        let mut trees = Vec::new();
        loop {
            parser.skip_comment_and_whitespace()?;
            if parser.is_eof() {
                break;
            }
            trees.push(self.parse_str(parser)?);
        }
        Ok(trees)
    }

    /// Parses a single Newick tree, up to and including its `;`.
    ///
    /// # Returns
    /// * `Ok(TaxonTree)` - The parsed tree
    /// * `Err(ParsingError)` - If the Newick string is invalid or describes
    ///   an unlabeled leaf
    pub fn parse_str(&self, parser: &mut ByteParser<'_>) -> Result<TaxonTree, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if parser.is_eof() {
            return Err(parser.error(ParsingErrorKind::UnexpectedEof));
        }

        let mut tree = TaxonTree::with_root(String::new(), false, TaxonAttributes::default());
        let root = tree.root_index();
        self.parse_node(parser, &mut tree, root)?;

        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b';') {
            return Err(unexpected(parser, "';' at end of tree"));
        }

        if !tree.is_valid() {
            return Err(parser.error(ParsingErrorKind::InvalidTreeStructure(
                "leaf without label".to_string(),
            )));
        }

        Ok(tree)
    }

    /// Parses `['(' node (',' node)* ')'] [label] [':' length]` into the
    /// already created node `index`.
    fn parse_node(
        &self,
        parser: &mut ByteParser<'_>,
        tree: &mut TaxonTree,
        index: NodeIndex,
    ) -> Result<(), ParsingError> {
        parser.skip_comment_and_whitespace()?;

        if parser.consume_if(b'(') {
            loop {
                let child = tree.add_child(index, String::new(), false, TaxonAttributes::default());
                self.parse_node(parser, tree, child)?;

                parser.skip_comment_and_whitespace()?;
                if parser.consume_if(b',') {
                    continue;
                }
                if parser.consume_if(b')') {
                    break;
                }
                if parser.is_eof() {
                    return Err(parser.error(ParsingErrorKind::UnexpectedEof));
                }
                return Err(unexpected(parser, "',' or ')' after child"));
            }
        }

        parser.skip_comment_and_whitespace()?;
        let quoted = parser.peek_is(b'\'');
        let mut label = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
        if self.underscores_as_spaces && !quoted {
            label = label.replace('_', " ");
        }

        let node = tree.node_mut(index);
        let is_leaf = node.is_leaf();
        node.set_explicit_leaf(is_leaf);
        node.set_label(label);

        self.skip_branch_length(parser)
    }

    /// Skips an optional branch length `:number`.
    fn skip_branch_length(&self, parser: &mut ByteParser<'_>) -> Result<(), ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if !parser.consume_if(b':') {
            return Ok(());
        }
        parser.skip_comment_and_whitespace()?;

        let start = parser.position();
        let length = parser.parse_unquoted_label(NEWICK_LABEL_DELIMITERS);
        if length.parse::<f64>().is_err() {
            return Err(ParsingError::new(
                ParsingErrorKind::InvalidNewickString(format!("Invalid branch length: {length:?}")),
                start,
                length,
            ));
        }
        Ok(())
    }
}

fn unexpected(parser: &ByteParser<'_>, expected: &str) -> ParsingError {
    let next_char = parser.peek().map(char::from);
    parser.error(ParsingErrorKind::InvalidNewickString(format!(
        "Expected {expected} but found {next_char:?}"
    )))
}
