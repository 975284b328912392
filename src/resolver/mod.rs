//! Reference resolution: from a marker's target string to extracted text.
//!
//! A target like `Note#Setup` names a document and optionally a section of
//! it. Resolution asks the store for the document, gates on its file type,
//! performs the (suspending) read, and slices out the requested section
//! using the store's structural metadata.
//!
//! Every recoverable condition is an explicit value, not an error:
//!
//! - an unknown target, a non-text target, or a failed read produce
//!   [`ResolveOutcome::Skipped`] — the caller keeps the marker verbatim;
//! - a missing anchor, missing header, or absent metadata produce
//!   [`ResolveOutcome::Content`] with a [`SectionFallback`] — the section
//!   request degrades to the whole document.
//!
//! Header matching is by exact text against the FIRST heading in document
//! order; when a document repeats a heading, later occurrences cannot be
//! addressed. The section runs until the next heading of the same or higher
//! level, so subsections are included.

use tracing::{debug, warn};

use crate::markdown::slugify;
use crate::store::{BlockSpan, Document, DocumentMetadata, DocumentStore};

/// The section of a target document a reference points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionRef {
    /// The whole document.
    Whole,
    /// A header section, addressed by exact heading text.
    Heading(String),
    /// An anchored block, addressed by `^id`.
    Block(String),
}

impl SectionRef {
    /// Split a marker target into link text and section reference.
    ///
    /// `#^` wins over `#`, so `Note#^id` is a block reference even though it
    /// also contains a plain `#`.
    #[must_use]
    pub fn parse(target: &str) -> (&str, SectionRef) {
        if let Some((link, anchor)) = target.split_once("#^") {
            (link, SectionRef::Block(anchor.to_string()))
        } else if let Some((link, heading)) = target.split_once('#') {
            (link, SectionRef::Heading(heading.to_string()))
        } else {
            (target, SectionRef::Whole)
        }
    }
}

/// Why a reference was skipped and its marker kept verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The store has no document for the link text.
    Unresolved,
    /// The target exists but is not a text document.
    NonText,
    /// The target's text could not be read.
    ReadFailed,
}

/// How a section request degraded to whole-document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionFallback {
    /// The store has no structural metadata for the document.
    MetadataUnavailable,
    /// No block with the requested anchor exists.
    AnchorNotFound,
    /// No heading with the requested text exists.
    HeaderNotFound,
}

/// Result of resolving one reference.
#[derive(Debug)]
pub enum ResolveOutcome {
    /// Extracted content ready for substitution.
    Content {
        doc: Document,
        text: String,
        /// Present when a requested sub-section degraded to full text.
        fallback: Option<SectionFallback>,
    },
    /// The marker must stay verbatim in the output.
    Skipped { reason: SkipReason },
}

/// Resolve `target` against the store, reading from `base_path`'s document.
pub async fn resolve<S: DocumentStore>(
    store: &S,
    target: &str,
    base_path: &str,
) -> ResolveOutcome {
    let (link, section) = SectionRef::parse(target);

    let Some(doc) = store.resolve_link(link, base_path) else {
        debug!(target, base = base_path, "reference did not resolve");
        return ResolveOutcome::Skipped {
            reason: SkipReason::Unresolved,
        };
    };

    if !doc.is_text() {
        debug!(target, path = %doc.path, "target is not a text document");
        return ResolveOutcome::Skipped {
            reason: SkipReason::NonText,
        };
    }

    let full = match store.read_text(&doc).await {
        Ok(text) => text,
        Err(err) => {
            warn!(target, path = %doc.path, error = %err, "failed to read target");
            return ResolveOutcome::Skipped {
                reason: SkipReason::ReadFailed,
            };
        }
    };

    let (text, fallback) = match section {
        SectionRef::Whole => (full, None),
        SectionRef::Block(anchor) => extract_block(&full, store.metadata(&doc), &anchor),
        SectionRef::Heading(name) => extract_heading(&full, store.metadata(&doc), &name),
    };

    if let Some(fallback) = fallback {
        warn!(target, path = %doc.path, ?fallback, "section not found, using whole document");
    }

    ResolveOutcome::Content { doc, text, fallback }
}

/// Extract an anchored block, or fall back to the whole text.
fn extract_block(
    full: &str,
    metadata: Option<DocumentMetadata>,
    anchor: &str,
) -> (String, Option<SectionFallback>) {
    let Some(metadata) = metadata else {
        return (full.to_string(), Some(SectionFallback::MetadataUnavailable));
    };

    let slug = slugify(anchor);
    let Some(&BlockSpan { start_line, end_line }) = metadata.blocks.get(&slug) else {
        return (full.to_string(), Some(SectionFallback::AnchorNotFound));
    };

    let extracted = slice_lines(full, start_line, end_line + 1);
    (strip_caret_token(&extracted, &slug), None)
}

/// Extract a header section, or fall back to the whole text.
///
/// The section starts at the matched heading's line and ends right before
/// the next heading whose level is less than or equal to the matched one,
/// or at end of document.
fn extract_heading(
    full: &str,
    metadata: Option<DocumentMetadata>,
    name: &str,
) -> (String, Option<SectionFallback>) {
    let Some(metadata) = metadata else {
        return (full.to_string(), Some(SectionFallback::MetadataUnavailable));
    };

    let Some(position) = metadata.headings.iter().position(|h| h.text == name) else {
        return (full.to_string(), Some(SectionFallback::HeaderNotFound));
    };
    let matched = &metadata.headings[position];

    let cut_line = metadata.headings[position + 1..]
        .iter()
        .find(|h| h.level <= matched.level)
        .map_or(usize::MAX, |h| h.start_line);

    (slice_lines(full, matched.start_line, cut_line), None)
}

/// Join lines `[start, end)` of `text`, clamping to its length.
fn slice_lines(text: &str, start: usize, end: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    if start >= lines.len() {
        return String::new();
    }
    let end = end.min(lines.len());
    lines[start..end].join("\n")
}

/// Remove a trailing `^anchor` token matching `slug` from extracted text.
///
/// The token is formatting markup, not content: a standalone `^anchor` line
/// is dropped entirely, a line-final token is trimmed off.
fn strip_caret_token(text: &str, slug: &str) -> String {
    let mut lines: Vec<&str> = text.lines().collect();

    if let Some(&last) = lines.last() {
        let trimmed = last.trim_end();
        if let Some(caret) = trimmed.rfind('^') {
            let (before, token) = trimmed.split_at(caret);
            let id = &token[1..];
            let standalone = before.trim().is_empty();
            if !id.is_empty()
                && slugify(id) == slug
                && (standalone || before.ends_with(char::is_whitespace))
            {
                if standalone {
                    lines.pop();
                } else {
                    let last_index = lines.len() - 1;
                    lines[last_index] = before.trim_end();
                }
            }
        }
    }

    lines.join("\n")
}
