//! Embed marker scanning for markdown text.
//!
//! An embed marker requests that another document's content (or a section of
//! it) be inlined in place:
//!
//! - `![[Note]]` — whole document
//! - `![[Note#Header]]` — one header section
//! - `![[Note#^block-id]]` — one anchored block
//! - `![[Note|shown as]]` — any of the above with a display alias
//!
//! Scanning is a pure function over the input text. Markers are returned in
//! order of appearance with their byte offsets, so callers can substitute
//! each occurrence individually even when the same marker appears twice.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Matches `![[...]]` with a non-greedy interior, single line only.
static EMBED_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[\[(.+?)\]\]").expect("embed pattern is valid"));

/// One embed marker occurrence in a scanned text span.
///
/// `target` and `alias` come from splitting the bracket interior on the
/// first `|`. The alias only affects how a rendered view labels the embed;
/// resolution and expansion ignore it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedRef {
    /// The raw marker substring, byte-for-byte as it appears in the text.
    pub raw: String,
    /// Document name or link path, possibly with a `#header` or `#^block`
    /// suffix.
    pub target: String,
    /// Display alias, if the marker carried one.
    pub alias: Option<String>,
    /// Byte offset of the marker's first byte in the scanned text.
    pub start: usize,
    /// Byte offset one past the marker's last byte.
    pub end: usize,
}

/// Scan a text span for embed markers.
///
/// Returns every match in first-to-last order, duplicates preserved. Never
/// fails; text without markers yields an empty vector.
///
/// # Examples
///
/// ```
/// use graft::markdown::find_embeds;
///
/// let found = find_embeds("intro ![[Note#Setup|setup]] outro");
/// assert_eq!(found.len(), 1);
/// assert_eq!(found[0].target, "Note#Setup");
/// assert_eq!(found[0].alias.as_deref(), Some("setup"));
/// ```
#[must_use]
pub fn find_embeds(text: &str) -> Vec<EmbedRef> {
    EMBED_PATTERN
        .captures_iter(text)
        .map(|caps| {
            let whole = caps.get(0).expect("match group 0 always present");
            let inner = caps.get(1).expect("embed pattern has one group").as_str();
            let (target, alias) = match inner.split_once('|') {
                Some((target, alias)) => (target, Some(alias.to_string())),
                None => (inner, None),
            };
            EmbedRef {
                raw: whole.as_str().to_string(),
                target: target.to_string(),
                alias,
                start: whole.start(),
                end: whole.end(),
            }
        })
        .collect()
}
