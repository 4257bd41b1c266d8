// Copyright (c) Riptide contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! A Ruby syntax tree and reference frontend.
//!
//! This crate provides the syntax tree that the `riptide` adapter walks, plus
//! a small frontend that produces it for a subset of Ruby.
//!
//! # Overview
//!
//! - **Parsing**: [`parse`] returns a [`ParseResult`] holding the tree, any
//!   diagnostics, and the leading magic comments.
//! - **Positions**: [`Source`] maps byte offsets to 1-based lines and
//!   0-based byte columns.
//! - **Diagnostics**: [`prettify_error`] renders a [`ParseError`] with a
//!   source snippet.
//!
//! # Quick Start
//!
//! ```
//! use riptide_syntax::{parse, Node};
//!
//! let result = parse("foo(1, 2)");
//! assert!(result.is_success());
//! assert!(matches!(result.value.statements.body[0], Node::Call(_)));
//! ```
//!
//! Input outside the supported subset is reported as a diagnostic:
//!
//! ```
//! let result = riptide_syntax::parse("def foo; end");
//! assert!(result.is_failure());
//! assert_eq!(result.errors[0].message, "unsupported keyword 'def'");
//! ```

// ============================================================================
// Public modules and re-exports
// ============================================================================

/// Syntax tree node types.
pub mod ast;
pub use ast::*;

/// Diagnostics.
pub mod errors;
pub use errors::{prettify_error, ParseError};

pub mod lexer;

/// Byte spans and line/column mapping.
pub mod location;
pub use location::{Location, Source};

pub mod magic;

mod parser;

use tracing::debug;

// ============================================================================
// Parse result
// ============================================================================

/// Everything the frontend reports for one source text.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// The tree. On failure it holds the statements that parsed cleanly.
    pub value: ProgramNode,
    /// Diagnostics in source order.
    pub errors: Vec<ParseError>,
    /// Leading magic comments in source order.
    pub magic_comments: Vec<MagicComment>,
    pub source: Source,
}

impl ParseResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }
}

/// Parses `text` with the reference frontend.
pub fn parse(text: &str) -> ParseResult {
    let source = Source::new(text);
    let lexed = lexer::tokenize(text);
    let magic_comments = magic::collect(&source, &lexed.comments);

    let (value, parse_errors) = parser::Parser::new(&source, lexed.tokens).parse_program();

    let mut errors = lexed.errors;
    errors.extend(parse_errors);
    errors.sort_by_key(|error| error.location.start);

    debug!(
        statements = value.statements.body.len(),
        errors = errors.len(),
        magic_comments = magic_comments.len(),
        "parsed source"
    );

    ParseResult {
        value,
        errors,
        magic_comments,
        source,
    }
}
