// Copyright (c) Riptide contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! End-to-end tests for the reference frontend.
//!
//! ```bash
//! cargo nextest run -p riptide-syntax frontend
//! ```

use riptide_syntax::{parse, prettify_error, Node};

// =============================================================================
// Trees
// =============================================================================

#[test]
fn test_program_location_covers_all_statements() {
    let result = parse("  foo\nbar  ");
    assert!(result.is_success());
    assert_eq!(result.source.slice(result.value.location), "foo\nbar");
}

#[test]
fn test_whitespace_only_program_is_empty() {
    let result = parse(" \n\t\n# just a comment\n");
    assert!(result.is_success());
    assert!(result.value.statements.body.is_empty());
}

#[test]
fn test_nested_blocks_and_chains() {
    let result = parse("[1, 2].map { |x| x * 2 }.each do |y|\n  puts y\nend\n");
    assert!(result.is_success(), "{:?}", result.errors);
    let Node::Call(each) = &result.value.statements.body[0] else {
        panic!("expected a call");
    };
    assert_eq!(each.name, "each");
    assert!(each.block.is_some());
    let Some(Node::Call(map)) = each.receiver.as_deref() else {
        panic!("expected a receiver call");
    };
    assert_eq!(map.name, "map");
    assert!(matches!(map.receiver.as_deref(), Some(Node::Array(_))));
}

#[test]
fn test_positions_use_byte_columns() {
    let result = parse("x = 1\n  foo(x)");
    let Node::Call(foo) = &result.value.statements.body[1] else {
        panic!("expected a call");
    };
    let message = foo.message_loc.expect("call has a message");
    assert_eq!(result.source.position(message.start), (2, 2));
}

// =============================================================================
// Diagnostics and metadata
// =============================================================================

#[test]
fn test_magic_comments_are_reported() {
    let result = parse("# frozen_string_literal: true\n# encoding: utf-8\nfoo\n");
    let keys: Vec<_> = result
        .magic_comments
        .iter()
        .map(|magic| (magic.key.as_str(), magic.value.as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![("frozen_string_literal", "true"), ("encoding", "utf-8")]
    );
}

#[test]
fn test_diagnostics_are_in_source_order() {
    let result = parse("foo(\nbar)\n1 +\n");
    assert!(result.is_failure());
    let starts: Vec<_> = result.errors.iter().map(|e| e.location.start).collect();
    let mut sorted = starts.clone();
    sorted.sort_unstable();
    assert_eq!(starts, sorted);
}

#[test]
fn test_unknown_character_is_a_diagnostic() {
    let result = parse("foo $");
    assert!(result.is_failure());
    assert!(result
        .errors
        .iter()
        .any(|error| error.message.contains("unexpected character")));
}

#[test]
fn test_rendered_diagnostic_points_at_source() {
    let result = parse("foo(1, 2\n");
    assert!(result.is_failure());
    let rendered = prettify_error(&result.errors[0], &result.source, "input.rb");
    assert!(rendered.contains("input.rb"));
    assert!(rendered.contains("foo(1, 2"));
}
