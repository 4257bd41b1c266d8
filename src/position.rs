//! Current line and column for scanner events.

use riptide_syntax::{Location, Source};

/// A `(line, column)` pair, rendered as `[line, column]` in token events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// Holds the position the next event is reported at.
///
/// Both fields start unset and are overwritten immediately before each
/// emission; nothing reads a position that was set for a different node.
#[derive(Debug, Clone, Default)]
pub struct PositionTracker {
    line: Option<u32>,
    column: Option<u32>,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves to the start of `location`.
    pub fn bounds(&mut self, source: &Source, location: Location) {
        let (line, column) = source.position(location.start);
        self.bounds_values(line, column);
    }

    pub fn bounds_values(&mut self, line: u32, column: u32) {
        self.line = Some(line);
        self.column = Some(column);
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }

    pub fn column(&self) -> Option<u32> {
        self.column
    }

    /// The current position; an unset tracker reports the start of the file.
    pub fn current(&self) -> Position {
        Position {
            line: self.line.unwrap_or(1),
            column: self.column.unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_tracker_reports_file_start() {
        let tracker = PositionTracker::new();
        assert_eq!(tracker.line(), None);
        assert_eq!(tracker.current(), Position { line: 1, column: 0 });
    }

    #[test]
    fn test_bounds_follow_location_start() {
        let source = Source::new("a\n  bc");
        let mut tracker = PositionTracker::new();
        tracker.bounds(&source, Location::new(4, 6));
        assert_eq!(tracker.current(), Position { line: 2, column: 2 });
    }

    #[test]
    fn test_explicit_values_override() {
        let source = Source::new("-5");
        let mut tracker = PositionTracker::new();
        tracker.bounds(&source, Location::new(0, 2));
        tracker.bounds_values(1, 1);
        assert_eq!(tracker.current(), Position { line: 1, column: 1 });
    }
}
