use std::fmt::Write as _;

use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where the user can
/// do something about it, how to fix it.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::FileNotFound { path } => format!("\
# Error: File Not Found

`{}` does not exist.
", path.display()),

        Error::InvalidSelection { input, reason } => format!("\
# Error: Invalid Selection

`{input}`: {reason}

## Fix

Selections are zero-based `LINE:CHAR-LINE:CHAR` ranges:

    reflink link README.md --selection 3:4-3:11
"),

        Error::InvalidUrl { url } => render_invalid_url(url),

        Error::NoSelection => "\
# Error: No Selection

There is no selected text to turn into a reference.

## Fix

Pass at least one `--selection LINE:CHAR-LINE:CHAR`.
"
        .to_string(),

        Error::EditOutOfBounds { position, line_count } => format!("\
# Error: Selection Out Of Bounds

Line {} does not exist; the document has {line_count} lines (counting from 0).
", position.line),

        Error::OverlappingEdits { position } => format!("\
# Error: Overlapping Selections

Two selections overlap near {position}. Nothing was changed.

## Fix

Pass selections that do not share any text.
"),

        Error::IndexOverflow { line, text } => format!("\
# Error: Reference Index Out Of Range

Line {line} defines reference `[{text}]`, which is too large to number after.
"),

        Error::TomlDe(e) => format!("\
# Error: Invalid Config

`.reflink.toml` could not be read:

{e}

## Fix

Valid keys are `placement` (`\"after-last-definition\"` or
`\"end-of-document\"`), `prompt`, and `placeholder`.
"),

        _ => format!("\
# Error

{e}
"),
    }
}

/// Invalid URL diagnostic, hinting at a missing top-level domain.
fn render_invalid_url(url: &str) -> String {
    let mut out = format!("\
# Error: Invalid URL

`{url}` does not look like a URL.
");
    if !url.contains('.') {
        let _ = write!(out, "\nA URL needs a domain with a top-level part, such as `{url}.com`.\n");
    }
    out.push_str("\
\n## Fix

Pass a URL such as `https://example.com/page`, or omit `--url` to be prompted.
");
    out
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use super::*;
    use crate::types::Position;

    #[test]
    fn invalid_url_suggests_a_domain() {
        let md = render_error(&Error::InvalidUrl { url: "example".to_string() });
        assert!(md.starts_with("# Error: Invalid URL"));
        assert!(md.contains("`example.com`"));
        assert!(md.contains("## Fix"));
    }

    #[test]
    fn out_of_bounds_names_the_line() {
        let md = render_error(&Error::EditOutOfBounds { line_count: 3, position: Position::new(7, 0) });
        assert!(md.contains("Line 7 does not exist; the document has 3 lines"));
    }
}
