//! The editor boundary: reading the document, applying edits, asking the user.
//!
//! Commands never reach for a global editor. They are handed a [`Host`] and a
//! [`Prompter`], so the same logic runs against a file on disk, a test
//! buffer, or any other editor that implements the traits.

use std::io::{BufRead, Write};

use crate::error::Error;
use crate::types::{Edit, Position, Selection};

/// Read and write access to one open document.
pub trait Host {
    /// Apply every edit or none of them.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the document untouched, if any edit is invalid.
    fn apply_edits(&mut self, edits: &[Edit]) -> Result<(), Error>;

    /// The document's lines without their terminators.
    fn lines(&self) -> Vec<String>;

    /// The current selections, primary first.
    fn selections(&self) -> Vec<Selection>;

    /// Text covered by `range`, with out-of-range ends clamped.
    fn text_in_range(&self, range: Selection) -> String;
}

/// Asks the user for one line of input.
pub trait Prompter {
    /// `Ok(None)` means the user cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying input or output fails.
    fn prompt(&mut self, request: &PromptRequest<'_>) -> Result<Option<String>, Error>;
}

/// What to show when asking for input, and how to check the answer.
pub struct PromptRequest<'a> {
    /// The question.
    pub message: &'a str,
    /// Example of a good answer.
    pub placeholder: &'a str,
    /// `None` accepts the candidate; `Some(message)` re-asks.
    pub validate: fn(&str) -> Option<&'static str>,
}

/// An in-memory document with selections. Line terminators are preserved
/// exactly; `\r\n` endings are kept in the text but hidden from [`Host::lines`].
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    /// Active selections.
    selections: Vec<Selection>,
    /// Full document text.
    text: String,
}

impl Buffer {
    pub fn new(text: impl Into<String>, selections: Vec<Selection>) -> Self {
        return Self { selections, text: text.into() };
    }

    /// The document as it stands after any applied edits.
    pub fn text(&self) -> &str {
        return &self.text;
    }

    /// Consume the buffer, returning its text.
    pub fn into_text(self) -> String {
        return self.text;
    }

    /// Byte offset of the first character of every line.
    fn line_starts(&self) -> Vec<usize> {
        let mut starts = vec![0];
        starts.extend(self.text.match_indices('\n').map(|(i, _)| return i.saturating_add(1)));
        return starts;
    }

    /// Byte range of a line's content, excluding `\n` and a preceding `\r`.
    fn line_bounds(&self, starts: &[usize], line: usize) -> Option<(usize, usize)> {
        let start = *starts.get(line)?;
        let end = starts
            .get(line.saturating_add(1))
            .map_or(self.text.len(), |next| return next.saturating_sub(1));
        let content = self.text.get(start..end)?;
        let end = if content.ends_with('\r') { end.saturating_sub(1) } else { end };
        return Some((start, end));
    }

    /// Byte offset of a position, clamping the character to the line's end.
    /// Positions past the last line clamp to the end of the document.
    fn offset_clamped(&self, starts: &[usize], position: Position) -> usize {
        let Some((start, end)) = self.line_bounds(starts, position.line) else {
            return self.text.len();
        };
        let content = self.text.get(start..end).unwrap_or_default();
        let within = content
            .char_indices()
            .nth(position.character)
            .map_or(content.len(), |(i, _)| return i);
        return start.saturating_add(within);
    }

    /// The document's line terminator: `\r\n` if it already uses one.
    fn line_ending(&self) -> &'static str {
        if self.text.contains("\r\n") {
            return "\r\n";
        }
        return "\n";
    }

    /// Resolve an edit to a byte range plus replacement text, with the
    /// text's newlines rewritten to the document's line ending.
    ///
    /// # Errors
    ///
    /// Returns `Error::EditOutOfBounds` if a replaced range names a line that
    /// does not exist. Inserts past the end are clamped instead.
    fn resolve(&self, starts: &[usize], edit: &Edit) -> Result<(usize, usize, String), Error> {
        let (from, to, text) = match edit {
            Edit::Insert { position, text } => {
                let at = self.offset_clamped(starts, *position);
                (at, at, text)
            },
            Edit::Replace { range, text } => {
                for position in [range.start, range.end] {
                    if position.line >= starts.len() {
                        return Err(Error::EditOutOfBounds { line_count: starts.len(), position });
                    }
                }
                (self.offset_clamped(starts, range.start), self.offset_clamped(starts, range.end), text)
            },
        };
        return Ok((from, to, with_line_ending(text, self.line_ending())));
    }
}

/// Rewrite every newline in `text` as `line_ending`.
fn with_line_ending(text: &str, line_ending: &str) -> String {
    if line_ending == "\n" {
        return text.to_string();
    }
    return text.replace("\r\n", "\n").replace('\n', line_ending);
}

impl Host for Buffer {
    fn apply_edits(&mut self, edits: &[Edit]) -> Result<(), Error> {
        let starts = self.line_starts();
        let mut resolved = Vec::with_capacity(edits.len());
        for (order, edit) in edits.iter().enumerate() {
            let (from, to, text) = self.resolve(&starts, edit)?;
            resolved.push((from, to, text, edit.span().0, order));
        }

        // Later edits first, so earlier offsets stay valid. Edits at the same
        // spot go in reverse batch order, leaving their text in batch order.
        resolved.sort_by(|a, b| return b.0.cmp(&a.0).then(b.1.cmp(&a.1)).then(b.4.cmp(&a.4)));
        for pair in resolved.windows(2) {
            let (Some(later), Some(earlier)) = (pair.first(), pair.get(1)) else {
                continue;
            };
            if earlier.1 > later.0 {
                return Err(Error::OverlappingEdits { position: later.3 });
            }
        }

        let mut text = self.text.clone();
        for (from, to, replacement, _, _) in &resolved {
            text.replace_range(*from..*to, replacement);
        }
        log::debug!("applied {} edits", resolved.len());
        self.text = text;
        return Ok(());
    }

    fn lines(&self) -> Vec<String> {
        return self
            .text
            .split('\n')
            .map(|l| return l.strip_suffix('\r').unwrap_or(l).to_string())
            .collect();
    }

    fn selections(&self) -> Vec<Selection> {
        return self.selections.clone();
    }

    fn text_in_range(&self, range: Selection) -> String {
        let starts = self.line_starts();
        let from = self.offset_clamped(&starts, range.start);
        let to = self.offset_clamped(&starts, range.end);
        return self.text.get(from..to).unwrap_or_default().to_string();
    }
}

/// Prompts on a line-oriented terminal: the question goes to `output`, the
/// answer is read from `input`. End of input or an empty answer cancels.
pub struct TerminalPrompter<R, W> {
    /// Where answers come from.
    input: R,
    /// Where questions and validation messages go.
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub const fn new(input: R, output: W) -> Self {
        return Self { input, output };
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn prompt(&mut self, request: &PromptRequest<'_>) -> Result<Option<String>, Error> {
        loop {
            write!(self.output, "{} (e.g. {}): ", request.message, request.placeholder)?;
            self.output.flush()?;

            let mut answer = String::new();
            if self.input.read_line(&mut answer)? == 0 {
                return Ok(None);
            }
            let answer = answer.trim();
            if answer.is_empty() {
                return Ok(None);
            }

            match (request.validate)(answer) {
                None => return Ok(Some(answer.to_string())),
                Some(message) => writeln!(self.output, "{message}")?,
            }
        }
    }
}
