//! Leading frontmatter removal for transcluded content.
//!
//! Frontmatter is a metadata block at the very start of a document delimited
//! by `---` lines. It belongs to the document, not to the content being
//! embedded elsewhere, so extracted text has it stripped before substitution.

/// Strip a leading `---`-delimited frontmatter block, delimiters included.
///
/// The block must open on the first non-blank line and close on a later line
/// that is exactly `---`. Anything else (no opening delimiter, or an
/// unclosed block) leaves the text untouched. Frontmatter only ever appears
/// at the start of a full document, so this is a no-op for mid-document
/// extracts.
///
/// # Examples
///
/// ```
/// use graft::markdown::strip_frontmatter;
///
/// assert_eq!(strip_frontmatter("---\ntitle: x\n---\nbody"), "body");
/// assert_eq!(strip_frontmatter("no frontmatter here"), "no frontmatter here");
/// ```
#[must_use]
pub fn strip_frontmatter(text: &str) -> &str {
    let mut offset = 0;
    let mut opened = false;

    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);

        if !opened {
            if content.trim().is_empty() {
                offset += line.len();
                continue;
            }
            if content == "---" {
                opened = true;
                offset += line.len();
                continue;
            }
            // First real line is not a delimiter, nothing to strip.
            return text;
        }

        offset += line.len();
        if content == "---" {
            return &text[offset..];
        }
    }

    // Opening delimiter without a closing one is not frontmatter.
    text
}
