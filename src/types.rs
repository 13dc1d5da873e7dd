/// Core domain types for reflink references, positions, and edits.
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A numbered reference definition, either found in the document or freshly
/// allocated for a new link. Never mutated in place: re-positioning yields a
/// new value.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Reference {
    /// True when the definition was already present in the document.
    pub existed: bool,
    /// Number used inside `[ ]`.
    pub index: u64,
    /// Zero-based line of the definition, or where a new one goes.
    pub line_number: usize,
    /// Link target, verbatim.
    pub url: String,
}

impl Reference {
    /// The same reference, placed at a different line.
    #[must_use]
    pub fn with_line_number(self, line_number: usize) -> Self {
        return Self { line_number, ..self };
    }
}

/// Which inline syntax replaces the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// `![text][n]`
    Image,
    /// `[text][n]`
    Link,
}

/// Zero-based line and character offset. `character` counts Unicode scalar
/// values within the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Offset within the line.
    pub character: usize,
    /// Line number.
    pub line: usize,
}

impl Position {
    pub const fn new(line: usize, character: usize) -> Self {
        return Self { character, line };
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        return (self.line, self.character).cmp(&(other.line, other.character));
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        return Some(self.cmp(other));
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}:{}", self.line, self.character);
    }
}

/// A highlighted range in the document. Always normalised so `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Exclusive end.
    pub end: Position,
    /// Inclusive start.
    pub start: Position,
}

impl Selection {
    /// Build a selection, swapping the ends if they arrive reversed.
    pub fn new(a: Position, b: Position) -> Self {
        if a <= b {
            return Self { end: b, start: a };
        }
        return Self { end: a, start: b };
    }
}

impl FromStr for Selection {
    type Err = Error;

    /// Parse `L:C-L:C`, e.g. `3:4-3:11`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| {
            return Error::InvalidSelection { input: s.to_string(), reason: reason.to_string() };
        };
        let (start, end) = s.split_once('-').ok_or_else(|| return invalid("expected START-END"))?;
        let start = parse_position(start).ok_or_else(|| return invalid("start must be LINE:CHAR"))?;
        let end = parse_position(end).ok_or_else(|| return invalid("end must be LINE:CHAR"))?;
        return Ok(Self::new(start, end));
    }
}

/// Parse a single `LINE:CHAR` pair.
fn parse_position(s: &str) -> Option<Position> {
    let (line, character) = s.trim().split_once(':')?;
    return Some(Position::new(line.parse().ok()?, character.parse().ok()?));
}

/// One change to the document. A batch of edits is applied all-or-nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Insert text at a position.
    Insert {
        /// Where the text goes.
        position: Position,
        /// Text to insert.
        text: String,
    },
    /// Replace the text inside a range.
    Replace {
        /// Range to overwrite.
        range: Selection,
        /// Replacement text.
        text: String,
    },
}

impl Edit {
    /// Range of existing text this edit touches (empty for inserts).
    pub const fn span(&self) -> (Position, Position) {
        return match self {
            Edit::Insert { position, .. } => (*position, *position),
            Edit::Replace { range, .. } => (range.start, range.end),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_selection_and_normalises_order() {
        let sel: Selection = "4:10-2:3".parse().unwrap();
        assert_eq!(sel.start, Position::new(2, 3));
        assert_eq!(sel.end, Position::new(4, 10));
    }

    #[test]
    fn rejects_malformed_selection() {
        let err = "4:10".parse::<Selection>().unwrap_err();
        assert!(matches!(err, Error::InvalidSelection { .. }));
        assert!("a:1-2:3".parse::<Selection>().is_err());
    }

    #[test]
    fn positions_order_by_line_then_character() {
        assert!(Position::new(1, 50) < Position::new(2, 0));
        assert!(Position::new(2, 1) > Position::new(2, 0));
    }

    #[test]
    fn with_line_number_keeps_everything_else() {
        let original = Reference { existed: false, index: 7, line_number: 3, url: "https://a.test".to_string() };
        let moved = original.clone().with_line_number(12);
        assert_eq!(moved.line_number, 12);
        assert_eq!(moved.index, original.index);
        assert_eq!(moved.url, original.url);
        assert_eq!(original.line_number, 3);
    }
}
