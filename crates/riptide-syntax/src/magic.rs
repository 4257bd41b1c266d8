// Copyright (c) Riptide contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Magic comment detection.
//!
//! Two spellings are recognized, both only in comments that precede the
//! first token of the file:
//!
//! - `# key: value`
//! - `# -*- key: value; other: value -*-` (Emacs style)
//!
//! Keys and values are reported exactly as written.

use std::sync::LazyLock;

use regex::Regex;

use crate::ast::MagicComment;
use crate::lexer::Comment;
use crate::location::{Location, Source};

static EMACS_STYLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-\*-(.*?)-\*-").expect("valid regex"));

static KEY_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z0-9_-]+)\s*:\s*([^\s;]+)\s*$").expect("valid regex")
});

/// Extracts magic comments from the leading comments of `source`, in order.
pub fn collect(source: &Source, comments: &[Comment]) -> Vec<MagicComment> {
    comments
        .iter()
        .filter(|comment| comment.leading)
        .flat_map(|comment| parse_comment(source, comment.location))
        .collect()
}

fn parse_comment(source: &Source, location: Location) -> Vec<MagicComment> {
    let text = source.slice(location);
    // Skip the `#`.
    let body_start = location.start + 1;
    let body = &text[1.min(text.len())..];

    if let Some(emacs) = EMACS_STYLE.captures(body) {
        let Some(inner) = emacs.get(1) else {
            return Vec::new();
        };
        let mut offset = body_start + inner.start();
        let mut found = Vec::new();
        for part in inner.as_str().split(';') {
            if let Some(magic) = key_value(part, offset) {
                found.push(magic);
            }
            offset += part.len() + 1;
        }
        return found;
    }

    key_value(body, body_start).into_iter().collect()
}

fn key_value(text: &str, offset: usize) -> Option<MagicComment> {
    let captures = KEY_VALUE.captures(text)?;
    let key = captures.get(1)?;
    let value = captures.get(2)?;
    Some(MagicComment {
        key: key.as_str().to_string(),
        value: value.as_str().to_string(),
        key_loc: Location::new(offset + key.start(), offset + key.end()),
        value_loc: Location::new(offset + value.start(), offset + value.end()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn magic(text: &str) -> Vec<(String, String)> {
        let source = Source::new(text);
        let lexed = tokenize(text);
        collect(&source, &lexed.comments)
            .into_iter()
            .map(|m| (m.key, m.value))
            .collect()
    }

    #[test]
    fn test_simple_magic_comment() {
        assert_eq!(
            magic("# frozen_string_literal: true\n1"),
            vec![("frozen_string_literal".to_string(), "true".to_string())]
        );
    }

    #[test]
    fn test_emacs_style_magic_comment() {
        assert_eq!(
            magic("# -*- coding: utf-8; frozen_string_literal: false -*-\n"),
            vec![
                ("coding".to_string(), "utf-8".to_string()),
                ("frozen_string_literal".to_string(), "false".to_string()),
            ]
        );
    }

    #[test]
    fn test_magic_comments_keep_source_order() {
        let found = magic("# encoding: ascii\n# warn_indent: true\n");
        assert_eq!(found[0].0, "encoding");
        assert_eq!(found[1].0, "warn_indent");
    }

    #[test]
    fn test_ordinary_comments_are_ignored() {
        assert!(magic("# just a note about things\n1").is_empty());
    }

    #[test]
    fn test_comments_after_code_are_not_leading() {
        assert!(magic("1\n# frozen_string_literal: true\n").is_empty());
    }

    #[test]
    fn test_locations_point_at_key_and_value() {
        let text = "# warn_indent: true";
        let source = Source::new(text);
        let lexed = tokenize(text);
        let found = collect(&source, &lexed.comments);
        assert_eq!(source.slice(found[0].key_loc), "warn_indent");
        assert_eq!(source.slice(found[0].value_loc), "true");
    }
}
