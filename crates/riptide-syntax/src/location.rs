// Copyright (c) Riptide contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Source spans and line/column mapping.
//!
//! ## Coordinate Conventions
//!
//! - Byte offsets are **0-indexed**
//! - Lines are **1-indexed**
//! - Columns are **0-indexed byte offsets** from the start of the line
//!
//! These are the coordinates the legacy Ripper API reports, so every position
//! the adapter emits is computed here.

use std::fmt;

/// A half-open byte range `start..end` into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Location {
    /// Start offset (inclusive).
    pub start: usize,
    /// End offset (exclusive).
    pub end: usize,
}

impl Location {
    /// Create a new location.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Create an empty location at `offset`.
    pub fn empty(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    /// The smallest location covering both `self` and `other`.
    #[must_use]
    pub fn join(self, other: Location) -> Location {
        Location::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the location covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Source text with a precomputed line index.
///
/// Line starts are computed once with `memchr`, so each offset lookup is a
/// binary search instead of a scan from the beginning of the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    text: String,
    line_starts: Vec<usize>,
}

impl Source {
    /// Index `text`.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        line_starts.extend(memchr::memchr_iter(b'\n', text.as_bytes()).map(|i| i + 1));
        Self { text, line_starts }
    }

    /// The full source text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The text covered by `location`.
    ///
    /// Out-of-range or non-boundary locations yield an empty string rather
    /// than panicking.
    pub fn slice(&self, location: Location) -> &str {
        self.text.get(location.start..location.end).unwrap_or("")
    }

    /// 1-indexed line containing `offset`.
    pub fn line(&self, offset: usize) -> u32 {
        let offset = offset.min(self.text.len());
        // partition_point returns the number of line starts <= offset, which
        // is exactly the 1-indexed line number.
        self.line_starts.partition_point(|&start| start <= offset) as u32
    }

    /// 0-indexed byte column of `offset` within its line.
    pub fn column(&self, offset: usize) -> u32 {
        let offset = offset.min(self.text.len());
        let line = self.line(offset) as usize;
        (offset - self.line_starts[line - 1]) as u32
    }

    /// `(line, column)` of `offset`.
    pub fn position(&self, offset: usize) -> (u32, u32) {
        (self.line(offset), self.column(offset))
    }

    /// Byte offset of the beginning of the 1-indexed `line`.
    ///
    /// Lines past the end map to the end of the text.
    pub fn line_offset(&self, line: u32) -> usize {
        match line {
            0 => 0,
            n => self
                .line_starts
                .get(n as usize - 1)
                .copied()
                .unwrap_or(self.text.len()),
        }
    }
}
