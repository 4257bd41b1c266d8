// Copyright (c) Riptide contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Parser diagnostics and their rendering.

use std::cmp::min;

use thiserror::Error;

use crate::location::{Location, Source};

/// A syntax error reported by the frontend.
///
/// Only the message crosses into the legacy event stream; the location is
/// kept for human-readable rendering.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub location: Location,
}

impl ParseError {
    pub fn new(message: impl Into<String>, location: Location) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }
}

/// Formats a diagnostic with a source snippet and the error span highlighted.
///
/// # Arguments
///
/// * `error` - The diagnostic to format.
/// * `source` - The source the diagnostic was reported against.
/// * `label` - A label for the error (e.g., file name).
pub fn prettify_error(error: &ParseError, source: &Source, label: &str) -> String {
    use annotate_snippets::{Level, Renderer, Snippet};

    let context = 1;
    let (start_line, _) = source.position(error.location.start);
    let (end_line, _) = source.position(error.location.end);

    let first_line = start_line.saturating_sub(context).max(1);
    let start_offset = source.line_offset(first_line);
    let end_offset = source.line_offset(end_line + context + 1);
    let snippet = &source.text()[start_offset..end_offset];

    let start = error.location.start - start_offset;
    let end = error.location.end - start_offset;
    // Zero-width spans (end of input) still need one highlighted column.
    let end = if start == end {
        min(end + 1, snippet.len() + 1)
    } else {
        end
    };

    Renderer::plain()
        .render(
            Level::Error.title(&error.message).snippet(
                Snippet::source(snippet)
                    .line_start(first_line as usize)
                    .origin(label)
                    .fold(false)
                    .annotations(vec![Level::Error.span(start..end).label("here")]),
            ),
        )
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_is_message() {
        let error = ParseError::new("unexpected ')'", Location::new(2, 3));
        assert_eq!(error.to_string(), "unexpected ')'");
    }

    #[test]
    fn test_prettify_error_mentions_label_and_message() {
        let source = Source::new("1 +\n)\n");
        let error = ParseError::new("unexpected ')'", Location::new(4, 5));
        let rendered = prettify_error(&error, &source, "input.rb");
        assert!(rendered.contains("unexpected ')'"));
        assert!(rendered.contains("input.rb"));
    }

    #[test]
    fn test_prettify_error_at_end_of_input() {
        let source = Source::new("1 +");
        let error = ParseError::new("unexpected end-of-input", Location::empty(3));
        let rendered = prettify_error(&error, &source, "-");
        assert!(rendered.contains("unexpected end-of-input"));
    }
}
