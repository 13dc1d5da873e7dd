//! Text produced for the host to splice in. Nothing here touches a document.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{Edit, Position, Reference, ReferenceKind};

/// Looser than the parser's pattern: no space required after the colon.
static DEFINITION_LINE: LazyLock<Regex> =
    LazyLock::new(|| return Regex::new(r"^\[[0-9]+\]:").expect("valid regex"));

/// `[text][n]`
pub fn format_link_replacement(selected_text: &str, reference: &Reference) -> String {
    return format!("[{selected_text}][{}]", reference.index);
}

/// `![text][n]`
pub fn format_image_replacement(selected_text: &str, reference: &Reference) -> String {
    return format!("![{selected_text}][{}]", reference.index);
}

/// The inline replacement for `kind`.
pub fn format_replacement(kind: ReferenceKind, selected_text: &str, reference: &Reference) -> String {
    return match kind {
        ReferenceKind::Image => format_image_replacement(selected_text, reference),
        ReferenceKind::Link => format_link_replacement(selected_text, reference),
    };
}

/// `[n]: url` followed by a newline.
pub fn format_definition_line(reference: &Reference) -> String {
    return format!("[{}]: {}\n", reference.index, reference.url);
}

/// Line directly below the last definition line anywhere in the document, so
/// new definitions join the existing block. Without any definitions this is
/// one past the end, leaving room for a separating blank line.
pub fn find_insertion_line<S: AsRef<str>>(lines: &[S]) -> usize {
    let last = lines
        .iter()
        .enumerate()
        .filter(|(_, line)| return DEFINITION_LINE.is_match(line.as_ref()))
        .map(|(n, _)| return n)
        .last();

    return match last {
        Some(n) => n.saturating_add(1),
        None => lines.len().saturating_add(1),
    };
}

/// The insert that adds `reference`'s definition to the document.
///
/// Inside the document the definition goes at column 0 of its line. At the
/// end line it is joined to the last line. Further past the end it is
/// appended after exactly one blank line, starting a new definition block.
pub fn definition_edit<S: AsRef<str>>(lines: &[S], reference: &Reference) -> Edit {
    let definition = format_definition_line(reference);

    if reference.line_number < lines.len() {
        return Edit::Insert { position: Position::new(reference.line_number, 0), text: definition };
    }

    let last_line = lines.len().saturating_sub(1);
    let end = Position::new(last_line, lines.last().map_or(0, |l| return l.as_ref().chars().count()));
    let separator = if reference.line_number > lines.len() {
        blank_line_separator(lines)
    } else {
        line_break(lines)
    };
    return Edit::Insert { position: end, text: format!("{separator}{definition}") };
}

/// Newline needed to start a fresh line at the end of the document.
fn line_break<S: AsRef<str>>(lines: &[S]) -> &'static str {
    return match lines.last() {
        Some(last) if !last.as_ref().is_empty() => "\n",
        _ => "",
    };
}

/// Newlines needed after the document's final text so one blank line follows it.
fn blank_line_separator<S: AsRef<str>>(lines: &[S]) -> &'static str {
    let mut tail = lines.iter().rev().map(|l| return l.as_ref().is_empty());
    return match (tail.next(), tail.next()) {
        (Some(false), _) => "\n\n",
        (Some(true), Some(false)) => "\n",
        // Empty document, or already followed by a blank line.
        _ => "",
    };
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use super::*;

    fn reference(index: u64, url: &str) -> Reference {
        return Reference { existed: false, index, line_number: 0, url: url.to_string() };
    }

    #[test]
    fn formats_inline_replacements() {
        let r = reference(4, "https://a.test");
        assert_eq!(format_link_replacement("Example", &r), "[Example][4]");
        assert_eq!(format_image_replacement("Example", &r), "![Example][4]");
        assert_eq!(format_replacement(ReferenceKind::Image, "Example", &r), "![Example][4]");
    }

    #[test]
    fn formats_definition_line() {
        assert_eq!(format_definition_line(&reference(2, "https://a.test")), "[2]: https://a.test\n");
    }

    #[test]
    fn definition_line_round_trips_through_parser() {
        let r = reference(12, "https://a.test/p?q=1");
        let line = format_definition_line(&r);
        let parsed = crate::parser::parse_existing_links(&[line.trim_end_matches('\n')]);
        assert_eq!(parsed[0].index, 12);
        assert_eq!(parsed[0].url, r.url);
    }

    #[test]
    fn insertion_line_follows_last_definition() {
        let doc = ["[0]: https://a.test", "", "Body text.", "", "[1]: https://b.test", "[2]: https://c.test", "[3]: https://d.test"];
        assert_eq!(find_insertion_line(&doc), 7);

        let trailing = ["Body", "", "[0]: https://a.test", "[1]: https://b.test", "", ""];
        assert_eq!(find_insertion_line(&trailing), 4);
    }

    #[test]
    fn insertion_line_without_definitions_is_past_the_end() {
        assert_eq!(find_insertion_line(&["one", "two", "three"]), 4);
        assert_eq!(find_insertion_line::<&str>(&[]), 1);
    }

    #[test]
    fn definition_edit_inside_block_inserts_at_column_zero() {
        let doc = ["Body", "", "[0]: https://a.test", ""];
        let r = reference(1, "https://b.test").with_line_number(3);
        assert_eq!(
            definition_edit(&doc, &r),
            Edit::Insert { position: Position::new(3, 0), text: "[1]: https://b.test\n".to_string() }
        );
    }

    #[test]
    fn definition_edit_at_end_line_joins_the_block() {
        let doc = ["Body", "", "[0]: https://a.test"];
        let r = reference(1, "https://b.test").with_line_number(find_insertion_line(&doc));
        assert_eq!(
            definition_edit(&doc, &r),
            Edit::Insert { position: Position::new(2, 19), text: "\n[1]: https://b.test\n".to_string() }
        );
    }

    #[test]
    fn definition_edit_past_end_separates_with_blank_line() {
        let r = reference(0, "https://a.test").with_line_number(9);

        let no_newline = definition_edit(&["Body"], &r);
        assert_eq!(no_newline, Edit::Insert { position: Position::new(0, 4), text: "\n\n[0]: https://a.test\n".to_string() });

        let newline = definition_edit(&["Body", ""], &r);
        assert_eq!(newline, Edit::Insert { position: Position::new(1, 0), text: "\n[0]: https://a.test\n".to_string() });

        let blank = definition_edit(&["Body", "", ""], &r);
        assert_eq!(blank, Edit::Insert { position: Position::new(2, 0), text: "[0]: https://a.test\n".to_string() });

        let empty = definition_edit(&[""], &r);
        assert_eq!(empty, Edit::Insert { position: Position::new(0, 0), text: "[0]: https://a.test\n".to_string() });
    }
}
