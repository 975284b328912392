//! The document store boundary.
//!
//! Expansion never touches a filesystem or editor buffer directly; it goes
//! through [`DocumentStore`], which supplies three things:
//!
//! - link resolution from marker text to a concrete [`Document`],
//! - the document's text (a suspending read — stores may hit disk or an
//!   async cache),
//! - structural metadata: an ordered heading outline and a map of block
//!   anchors to line spans.
//!
//! Metadata is defined-or-absent: a store that has no structural information
//! for a document returns `None` and section requests against it degrade to
//! whole-document extraction instead of failing.
//!
//! Two implementations ship with the crate: [`Vault`] over a directory tree
//! and [`MemoryStore`] over in-process content.

use std::collections::HashMap;
use thiserror::Error;

use crate::markdown::slugify;

pub mod memory;
pub mod vault;

pub use memory::MemoryStore;
pub use vault::Vault;

/// Extensions treated as expandable text documents.
const TEXT_EXTENSIONS: [&str; 3] = ["md", "markdown", "txt"];

/// A cheap handle to a stored document.
///
/// `path` is the store-relative identifier used for reads and as the base
/// path of nested resolutions; `name` is the logical name links may use as
/// shorthand (the file stem for file-backed stores).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Store-relative path, `/`-separated.
    pub path: String,
    /// Logical name, without directory or extension.
    pub name: String,
    /// Lower-cased file extension, empty when there is none.
    pub extension: String,
}

impl Document {
    /// Build a handle from a `/`-separated relative path.
    pub fn from_path(path: &str) -> Self {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        let (name, extension) = match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, ext.to_ascii_lowercase()),
            _ => (file_name, String::new()),
        };
        Self {
            path: path.to_string(),
            name: name.to_string(),
            extension,
        }
    }

    /// Whether the document holds expandable text content.
    ///
    /// Non-text targets (images, PDFs, ...) are never inlined; markers
    /// pointing at them stay verbatim in the output.
    #[must_use]
    pub fn is_text(&self) -> bool {
        TEXT_EXTENSIONS.contains(&self.extension.as_str())
    }
}

/// One heading in a document outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Heading text with the `#` markers and surrounding whitespace removed.
    pub text: String,
    /// Heading level, 1-6.
    pub level: u8,
    /// 0-based line the heading starts on.
    pub start_line: usize,
}

/// Inclusive 0-based line span of an anchored block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    pub start_line: usize,
    pub end_line: usize,
}

/// Structural metadata for one document.
///
/// Headings are listed in document order. Block anchors are keyed by their
/// slug-normalized id (see [`crate::markdown::slugify`]); each anchor is
/// unique per document, the first definition wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub headings: Vec<Heading>,
    pub blocks: HashMap<String, BlockSpan>,
}

impl DocumentMetadata {
    /// Derive metadata from markdown content.
    ///
    /// Headings come from ATX lines (`#` to `######` followed by a space).
    /// A `^anchor` token at the end of a line anchors the contiguous
    /// non-blank run containing it; a `^anchor` alone on its own line
    /// anchors the run immediately above it (the anchor line itself is then
    /// not part of the span).
    #[must_use]
    pub fn from_markdown(text: &str) -> Self {
        let lines: Vec<&str> = text.lines().collect();
        let mut headings = Vec::new();
        let mut blocks = HashMap::new();

        for (i, line) in lines.iter().enumerate() {
            if let Some(heading) = parse_heading(line, i) {
                headings.push(heading);
                continue;
            }

            if let Some((id, standalone)) = trailing_anchor(line) {
                if let Some(span) = anchor_span(&lines, i, standalone) {
                    blocks.entry(slugify(id)).or_insert(span);
                }
            }
        }

        Self { headings, blocks }
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn parse_heading(line: &str, start_line: usize) -> Option<Heading> {
    let hashes = line.len() - line.trim_start_matches('#').len();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }
    let text = rest.trim();
    if text.is_empty() {
        return None;
    }
    Some(Heading {
        text: text.to_string(),
        level: hashes as u8,
        start_line,
    })
}

/// Detect a `^anchor` token at the end of a line.
///
/// Returns the raw anchor id and whether the token is the whole line.
fn trailing_anchor(line: &str) -> Option<(&str, bool)> {
    let trimmed = line.trim_end();
    let caret = trimmed.rfind('^')?;
    let id = &trimmed[caret + 1..];
    if id.is_empty() || !id.chars().all(|c| c.is_alphanumeric() || c == '-') {
        return None;
    }
    let before = &trimmed[..caret];
    let standalone = before.trim().is_empty();
    if !standalone && !before.ends_with(char::is_whitespace) {
        return None;
    }
    Some((id, standalone))
}

/// Compute the span an anchor on line `anchor_line` covers.
fn anchor_span(lines: &[&str], anchor_line: usize, standalone: bool) -> Option<BlockSpan> {
    let run_start = |mut from: usize| {
        while from > 0 && !is_blank(lines[from - 1]) && parse_heading(lines[from - 1], 0).is_none()
        {
            from -= 1;
        }
        from
    };

    let start = run_start(anchor_line);
    if start < anchor_line || !standalone {
        // Anchor sits inside (or at the end of) its own run.
        return Some(BlockSpan {
            start_line: start,
            end_line: anchor_line,
        });
    }

    // Standalone anchor below a blank line: it names the previous run, and
    // the anchor line itself is not content.
    let mut above = anchor_line;
    while above > 0 && is_blank(lines[above - 1]) {
        above -= 1;
    }
    if above == 0 {
        return None;
    }
    Some(BlockSpan {
        start_line: run_start(above - 1),
        end_line: above - 1,
    })
}

/// Failures a store read can produce.
///
/// These stay inside the per-reference failure boundary of the expander;
/// they are logged and the offending marker is left verbatim.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("document '{path}' is not in the store")]
    UnknownDocument { path: String },
}

/// Read access to a body of documents.
///
/// Implementations are read-only from the expander's perspective; no method
/// mutates a document. `read_text` is async because stores may perform disk
/// or cache I/O; the expander awaits reads strictly in scan order, so no
/// `Send` bound is required on the returned futures.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Resolve link text to a document.
    ///
    /// Link text may omit the `.md` extension and may be store-root
    /// relative, relative to `from_path`'s directory, or a bare shorthand
    /// name; the first matching document wins. Returns `None` when nothing
    /// matches.
    fn resolve_link(&self, link: &str, from_path: &str) -> Option<Document>;

    /// Read the document's full text.
    async fn read_text(&self, doc: &Document) -> Result<String, StoreError>;

    /// Structural metadata for the document, if the store has any.
    fn metadata(&self, doc: &Document) -> Option<DocumentMetadata>;
}
