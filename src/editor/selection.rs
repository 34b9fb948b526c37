use super::position::Position;
use serde::Serialize;
use std::fmt;

/// A user selection: a range of the buffer, or a cursor when empty.
///
/// `start <= end` always holds; constructors normalise reversed input so the
/// anchor/active order of the host does not leak into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Selection {
    start: Position,
    end: Position,
}

impl Selection {
    /// Build a selection from `[line, character]` pairs.
    pub fn new(start: impl Into<Position>, end: impl Into<Position>) -> Self {
        Self::from_positions(start.into(), end.into())
    }

    pub fn from_positions(a: Position, b: Position) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    pub fn cursor_at(line: usize, character: usize) -> Self {
        let position = Position::new(line, character);
        Self {
            start: position,
            end: position,
        }
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    /// A cursor selection has no extent.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `other` lies entirely within this selection.
    pub fn contains(&self, other: &Selection) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reversed_positions_are_normalised() {
        let selection = Selection::new((4, 2), (1, 7));
        assert_eq!(selection.start(), Position::new(1, 7));
        assert_eq!(selection.end(), Position::new(4, 2));
    }

    #[test]
    fn test_cursor_is_empty() {
        let cursor = Selection::cursor_at(3, 3);
        assert!(cursor.is_empty());
        assert_eq!(cursor.start(), cursor.end());
        assert!(!Selection::new((0, 0), (0, 1)).is_empty());
    }

    #[test]
    fn test_containment_is_inclusive() {
        let outer = Selection::new((1, 2), (7, 3));
        assert!(outer.contains(&Selection::cursor_at(1, 2)));
        assert!(outer.contains(&Selection::cursor_at(7, 3)));
        assert!(outer.contains(&Selection::new((2, 0), (6, 9))));
        assert!(!outer.contains(&Selection::new((0, 0), (2, 0))));
    }
}
