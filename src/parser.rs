//! Reference-definition parsing: discovery, index allocation, and URL dedup.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::Error;
use crate::types::Reference;

/// A definition line starts at column 0 with `[digits]: `.
static DEFINITION_START: LazyLock<Regex> =
    LazyLock::new(|| return Regex::new(r"^\[[0-9]+\]: ").expect("valid regex"));

/// Permissive URL shape: optional scheme, optional `www.`, a domain with a
/// 2-15 letter TLD, then an optional path or query.
static URL_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    return Regex::new(
        r"(http(s)?://.)?(www\.)?[-a-zA-Z0-9@:%._\+~#=]{2,256}\.[a-z]{2,15}\b([-a-zA-Z0-9@:%_\+.~#?&//=]*)",
    )
    .expect("valid regex");
});

/// Shown by the prompt while the entered URL fails the shape check.
pub const INVALID_URL_MESSAGE: &str = "Please provide a value url.";

/// Collect every definition line in the document, bottom line first.
///
/// A definition whose index is too large to number is skipped with a
/// warning; the rest of the document is still scanned.
pub fn parse_existing_links<S: AsRef<str>>(lines: &[S]) -> Vec<Reference> {
    let mut refs = Vec::new();

    for (line_number, line) in lines.iter().enumerate().rev() {
        let text = line.as_ref();
        if !DEFINITION_START.is_match(text) {
            continue;
        }
        match parse_definition_line(text, line_number) {
            Ok(reference) => refs.push(reference),
            Err(e) => log::warn!("skipping definition: {e}"),
        }
    }

    log::debug!("found {} reference definitions", refs.len());
    return refs;
}

/// Split a line already known to match [`DEFINITION_START`] into its parts.
///
/// # Errors
///
/// Returns `Error::IndexOverflow` if the bracketed digits overflow a `u64`.
fn parse_definition_line(text: &str, line_number: usize) -> Result<Reference, Error> {
    let raw_index = text
        .strip_prefix('[')
        .and_then(|rest| return rest.split_once(']'))
        .map_or("", |(index, _)| return index);
    let url = text.split_once("]: ").map_or("", |(_, url)| return url);

    let index = raw_index.parse::<u64>().map_err(|_| {
        return Error::IndexOverflow { line: line_number, text: raw_index.to_string() };
    })?;

    return Ok(Reference { existed: false, index, line_number, url: url.to_string() });
}

/// Highest index in use plus one, or 0 when there are no references.
pub fn compute_next_index(refs: &[Reference]) -> u64 {
    return refs
        .iter()
        .map(|r| return r.index)
        .max()
        .map_or(0, |max| return max.saturating_add(1));
}

/// Reuse the definition whose URL matches exactly, or allocate a new one.
///
/// The first match in `refs` order wins. A new reference takes the next free
/// index and is placed at `line_count`, the end of the document; callers
/// that want it next to the other definitions re-position it.
pub fn resolve_or_allocate(url: &str, refs: &[Reference], line_count: usize) -> Reference {
    if let Some(found) = refs.iter().find(|r| return r.url == url) {
        log::debug!("url already defined as [{}] on line {}", found.index, found.line_number);
        return Reference { existed: true, ..found.clone() };
    }

    return Reference {
        existed: false,
        index: compute_next_index(refs),
        line_number: line_count,
        url: url.to_string(),
    };
}

/// Prompt validator: `None` when the candidate looks like a URL, otherwise
/// the message to show.
pub fn validate_url(candidate: &str) -> Option<&'static str> {
    if URL_SHAPE.is_match(candidate) {
        return None;
    }
    return Some(INVALID_URL_MESSAGE);
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, reason = "tests")]
mod tests {
    use super::*;

    fn reference(index: u64, url: &str, line_number: usize) -> Reference {
        return Reference { existed: false, index, line_number, url: url.to_string() };
    }

    #[test]
    fn parses_definitions_bottom_up() {
        let doc = [
            "# Title",
            "See [docs][0] and [blog][1].",
            "",
            "[0]: https://docs.test",
            "[1]: https://blog.test/post?id=3",
        ];
        let refs = parse_existing_links(&doc);

        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0], reference(1, "https://blog.test/post?id=3", 4));
        assert_eq!(refs[1], reference(0, "https://docs.test", 3));
    }

    #[test]
    fn url_is_kept_verbatim() {
        let refs = parse_existing_links(&["[5]: https://a.test/x  "]);
        assert_eq!(refs[0].url, "https://a.test/x  ");
    }

    #[test]
    fn ignores_indented_labelled_and_spaceless_definitions() {
        let doc = [" [0]: https://a.test", "[foo]: https://b.test", "[2]:https://c.test", "x [3]: https://d.test"];
        assert!(parse_existing_links(&doc).is_empty());
    }

    #[test]
    fn overflowing_index_skips_only_that_line() {
        let doc = ["[1]: https://a.test", "[99999999999999999999999]: https://b.test", "[4]: https://c.test"];
        let refs = parse_existing_links(&doc);
        assert_eq!(refs, vec![reference(4, "https://c.test", 2), reference(1, "https://a.test", 0)]);

        let err = parse_definition_line(doc[1], 1).unwrap_err();
        assert!(matches!(err, Error::IndexOverflow { line: 1, .. }));
    }

    #[test]
    fn next_index_is_numeric_max_plus_one() {
        let refs = parse_existing_links(&["[3]: https://a.test", "[1]: https://b.test", "[10]: https://c.test"]);
        assert_eq!(compute_next_index(&refs), 11);
    }

    #[test]
    fn next_index_is_zero_without_references() {
        assert_eq!(compute_next_index(&[]), 0);
    }

    #[test]
    fn next_index_saturates() {
        assert_eq!(compute_next_index(&[reference(u64::MAX, "https://a.test", 0)]), u64::MAX);
    }

    #[test]
    fn resolve_reuses_existing_url() {
        let refs = vec![reference(4, "https://x.test", 9), reference(2, "https://y.test", 8)];
        let resolved = resolve_or_allocate("https://x.test", &refs, 20);

        assert!(resolved.existed);
        assert_eq!(resolved.index, 4);
        assert_eq!(resolved.line_number, 9);
    }

    #[test]
    fn resolve_allocates_when_url_is_new() {
        let refs = vec![reference(4, "https://x.test", 9)];
        let resolved = resolve_or_allocate("https://z.test", &refs, 20);

        assert!(!resolved.existed);
        assert_eq!(resolved.index, 5);
        assert_eq!(resolved.line_number, 20);
        assert_eq!(resolved.url, "https://z.test");
    }

    #[test]
    fn resolve_is_exact_match() {
        let refs = vec![reference(0, "https://x.test/", 3)];
        assert!(!resolve_or_allocate("https://x.test", &refs, 4).existed);
    }

    #[test]
    fn duplicate_urls_resolve_to_first_in_scan_order() {
        let doc = ["[0]: https://x.test", "[7]: https://x.test"];
        let refs = parse_existing_links(&doc);
        let resolved = resolve_or_allocate("https://x.test", &refs, doc.len());
        assert_eq!(resolved.index, 7);
    }

    #[test]
    fn validates_url_shape() {
        assert_eq!(validate_url("https://hasslefree.solutions"), None);
        assert_eq!(validate_url("www.example.com/path?q=1"), None);
        assert_eq!(validate_url("example.org"), None);
        assert_eq!(validate_url("not a url"), Some(INVALID_URL_MESSAGE));
        assert_eq!(validate_url(""), Some(INVALID_URL_MESSAGE));
    }
}
