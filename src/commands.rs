//! Reference commands: convert selections, list definitions.

use serde::Serialize;

use crate::config::{Config, Placement};
use crate::error::Error;
use crate::host::{Host, PromptRequest, Prompter};
use crate::parser;
use crate::types::{Edit, Reference, ReferenceKind, Selection};
use crate::writer;

/// Result of a convert command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The edits were applied using this reference.
    Applied(Reference),
    /// The user dismissed the URL prompt; nothing changed.
    Cancelled,
}

/// Every definition in a document plus the index the next new one would get.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    /// The index a new URL would be assigned.
    pub next_index: u64,
    /// Definitions, top of document first.
    pub references: Vec<Reference>,
}

/// Replace every selection with a `kind` reference to `url`, adding a
/// definition line unless the URL is already defined.
///
/// Without a `url` the user is prompted for one.
///
/// # Errors
///
/// Returns `Error::NoSelection` if the host has nothing selected,
/// `Error::InvalidUrl` if a supplied `url` fails the shape check, and any
/// error from prompting or from the host rejecting the edits.
pub fn insert_reference<H: Host, P: Prompter>(
    host: &mut H,
    prompter: &mut P,
    kind: ReferenceKind,
    url: Option<&str>,
    config: &Config,
) -> Result<Outcome, Error> {
    let selections = host.selections();
    if selections.is_empty() {
        return Err(Error::NoSelection);
    }

    let url = match url {
        Some(url) if parser::validate_url(url).is_some() => {
            return Err(Error::InvalidUrl { url: url.to_string() });
        },
        Some(url) => url.to_string(),
        None => {
            let request = PromptRequest {
                message: &config.prompt,
                placeholder: &config.placeholder,
                validate: parser::validate_url,
            };
            let Some(url) = prompter.prompt(&request)? else {
                log::debug!("url prompt cancelled");
                return Ok(Outcome::Cancelled);
            };
            url
        },
    };

    let lines = host.lines();
    let refs = parser::parse_existing_links(&lines);
    let reference = place(parser::resolve_or_allocate(&url, &refs, lines.len()), &lines, config.placement);

    let mut edits: Vec<Edit> = selections
        .iter()
        .map(|range| {
            let selected = host.text_in_range(*range);
            return Edit::Replace { range: *range, text: writer::format_replacement(kind, &selected, &reference) };
        })
        .collect();
    if !reference.existed {
        edits.push(own_line(writer::definition_edit(&lines, &reference), &selections));
    }

    host.apply_edits(&edits)?;
    log::debug!(
        "inserted {} reference(s) to [{}] ({})",
        selections.len(),
        reference.index,
        if reference.existed { "reused" } else { "new" }
    );
    return Ok(Outcome::Applied(reference));
}

/// Move a freshly allocated reference to where the placement policy wants it.
fn place(reference: Reference, lines: &[String], placement: Placement) -> Reference {
    if reference.existed {
        return reference;
    }
    return match placement {
        Placement::AfterLastDefinition => {
            let line = writer::find_insertion_line(lines);
            reference.with_line_number(line)
        },
        Placement::EndOfDocument => reference,
    };
}

/// Start the definition on a fresh line when a replacement ends right where
/// it is inserted; the replacement text lands first.
fn own_line(definition: Edit, selections: &[Selection]) -> Edit {
    return match definition {
        Edit::Insert { position, text }
            if !text.starts_with('\n') && selections.iter().any(|s| return s.end == position) =>
        {
            Edit::Insert { position, text: format!("\n{text}") }
        },
        other => other,
    };
}

/// Definitions in document order, with the next free index.
pub fn list_references<H: Host>(host: &H) -> Listing {
    let lines = host.lines();
    let mut references = parser::parse_existing_links(&lines);
    let next_index = parser::compute_next_index(&references);
    references.reverse();
    return Listing { next_index, references };
}
