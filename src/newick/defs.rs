//! Constants for reading and writing Newick strings.

/// Newick label delimiters: parentheses, comma, colon, semicolon, comment
/// brackets (whitespace ends unquoted labels as well)
pub(crate) const NEWICK_LABEL_DELIMITERS: &[u8] = b"(),:;[]";

/// Characters reserved by the Newick format, never written inside labels
pub(crate) const RESERVED_CHARS: [char; 8] = ['(', ')', ',', ':', ';', '[', ']', '\''];

/// Characters additionally reserved inside NHX values
pub(crate) const NHX_RESERVED_CHARS: [char; 2] = ['=', '|'];

/// Support written in NHX style for branches drawn dashed
pub(crate) const UNCERTAIN_SUPPORT: &str = "0.5";
