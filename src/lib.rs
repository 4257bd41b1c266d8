//! Riptide: legacy Ripper event streams from a modern Ruby syntax tree.
//!
//! Tooling written against Ruby's callback-driven Ripper API expects a very
//! particular sequence of parser and scanner events. Riptide walks a syntax
//! tree produced by a modern parser and replays exactly that sequence, with
//! the same line and column bookkeeping, so such tooling can switch parsers
//! without noticing.
//!
//! # Quick Start
//!
//! ```
//! let raw = riptide::sexp_raw("foo bar").unwrap().unwrap();
//! assert_eq!(
//!     raw.to_string(),
//!     "[:program, [:stmts_add, [:stmts_new], [:command, [:@ident, \"foo\", [1, 0]], \
//!      [:args_add_block, [:args_add, [:args_new], [:vcall, [:@ident, \"bar\", [1, 4]]]], false]]]]"
//! );
//!
//! let flat = riptide::sexp("foo bar").unwrap().unwrap();
//! assert_eq!(
//!     flat.to_string(),
//!     "[:program, [[:command, [:@ident, \"foo\", [1, 0]], \
//!      [:args_add_block, [[:vcall, [:@ident, \"bar\", [1, 4]]]], false]]]]"
//! );
//! ```
//!
//! Syntax errors yield `Ok(None)`; constructs without a legacy translation
//! yield `Err(AdapterError::Unsupported { .. })`.

// ============================================================================
// Modules
// ============================================================================

pub mod adapter;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod options;
pub mod position;
pub mod sink;
pub mod value;

mod walker;

pub use adapter::{Adapter, DefaultParser, UpstreamParser};
pub use dispatch::{DispatchTable, Handler};
pub use error::{AdapterError, ExitStatus};
pub use events::{EventKind, EventSpec};
pub use options::{AdapterOptions, Engine};
pub use position::{Position, PositionTracker};
pub use sink::{AccumulatingSink, EventSink, Inert, RawSink};
pub use value::Value;

// ============================================================================
// Entry points
// ============================================================================

/// Tuple-of-tuples output, as `Ripper.sexp_raw` produces it.
///
/// # Errors
///
/// [`AdapterError::Unsupported`] when the source contains a construct with
/// no legacy translation.
pub fn sexp_raw(source: &str) -> Result<Option<Value>, AdapterError> {
    sexp_raw_with_options(source, AdapterOptions::default())
}

/// [`sexp_raw`] with explicit options.
pub fn sexp_raw_with_options(
    source: &str,
    options: AdapterOptions,
) -> Result<Option<Value>, AdapterError> {
    Adapter::with_options(source, RawSink::new(), options).parse()
}

/// Flattened-list output, as `Ripper.sexp` produces it.
///
/// # Errors
///
/// [`AdapterError::Unsupported`] when the source contains a construct with
/// no legacy translation.
pub fn sexp(source: &str) -> Result<Option<Value>, AdapterError> {
    sexp_with_options(source, AdapterOptions::default())
}

/// [`sexp`] with explicit options.
pub fn sexp_with_options(
    source: &str,
    options: AdapterOptions,
) -> Result<Option<Value>, AdapterError> {
    Adapter::with_options(source, AccumulatingSink::new(), options).parse()
}
