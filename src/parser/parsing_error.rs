//! Error types for the Newick reader.
//!
//! This module provides [ParsingError] and [ParsingErrorKind] for
//! representing and reporting errors that occur while reading Newick text.

use thiserror::Error;

// =#========================================================================#=
// PARSING ERROR KIND
// =#========================================================================$=
/// Error kinds that can occur while reading Newick text.
#[derive(Error, PartialEq, Debug, Clone)]
pub enum ParsingErrorKind {
    /// Input ended inside a tree
    #[error("Unexpected end of input")]
    UnexpectedEof,
    /// `[` without matching `]`
    #[error("Unclosed comment")]
    UnclosedComment,
    /// `'` without matching `'`
    #[error("Unclosed quoted label")]
    UnclosedQuote,
    /// Syntax error
    #[error("Invalid newick string - {0}")]
    InvalidNewickString(String),
    /// Syntactically fine, but not a valid taxon tree
    #[error("Invalid tree structure - {0}")]
    InvalidTreeStructure(String),
}

// =#========================================================================#=
// PARSING ERROR
// =#========================================================================$=
/// Parsing error with contextual information (position and following bytes).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind} at position {position}{}", format_context(.context))]
pub struct ParsingError {
    kind: ParsingErrorKind,
    position: usize,
    context: String,
}

fn format_context(context: &str) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!("\n  Context (next {} bytes): {}", context.len(), context)
    }
}

impl ParsingError {
    /// Creates an error of the given kind at `position`.
    pub fn new(kind: ParsingErrorKind, position: usize, context: String) -> Self {
        ParsingError {
            kind,
            position,
            context,
        }
    }

    /// Get the error kind
    pub fn kind(&self) -> &ParsingErrorKind {
        &self.kind
    }

    /// Get the byte position where the error occurred
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get the input following the error position
    pub fn context(&self) -> &str {
        &self.context
    }
}
