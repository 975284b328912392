//! Depth-bounded recursive expansion of embed markers.
//!
//! [`expand`] is the crate's entry point: it takes a text span, the path of
//! the document the span belongs to, and a depth limit, and returns the span
//! with every resolvable marker replaced by the content it points at.
//!
//! The walk is depth-first and strictly sequential: each reference is
//! resolved (one suspending read at a time) in scan order, and a nested
//! expansion completes before the next sibling marker is processed, so the
//! output is deterministic. The depth limit is the sole guard against cyclic
//! embed graphs; hitting it returns the current text unchanged and logs a
//! warning, which makes a cycle degrade into one unexpanded marker rather
//! than an error.
//!
//! No failure of a single reference aborts the call. Unresolved and
//! non-text targets keep their marker verbatim; section misses degrade to
//! whole-document content inside the resolver. The only value returned is
//! the best-effort expanded string; callers that need failure visibility
//! subscribe to the `tracing` diagnostics.
//!
//! # Examples
//!
//! ```
//! use graft::expander::expand;
//! use graft::store::MemoryStore;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut store = MemoryStore::new();
//! store.insert("Greeting.md", "hello from Greeting");
//!
//! let out = expand(&store, "> ![[Greeting]]", "Base.md", 4).await;
//! assert_eq!(out, "> hello from Greeting");
//! # }
//! ```

use futures::future::LocalBoxFuture;
use tracing::{debug, warn};

use crate::markdown::{find_embeds, strip_frontmatter};
use crate::resolver::{ResolveOutcome, resolve};
use crate::store::DocumentStore;

/// Depth limit used by the CLI when none is given.
pub const DEFAULT_MAX_DEPTH: u32 = 4;

/// Expand every embed marker in `text`, recursively, up to `max_depth`
/// levels of nesting.
///
/// `base_path` is the store path of the document the text belongs to; it
/// anchors relative link resolution. Text without markers comes back
/// unchanged.
pub async fn expand<S: DocumentStore>(
    store: &S,
    text: &str,
    base_path: &str,
    max_depth: u32,
) -> String {
    expand_from(store, text.to_string(), base_path.to_string(), 0, max_depth).await
}

/// [`expand`] starting from an explicit recursion depth.
///
/// Useful for callers that stitch expansions together and want the combined
/// result to respect one overall depth budget.
pub async fn expand_from<S: DocumentStore>(
    store: &S,
    text: String,
    base_path: String,
    depth: u32,
    max_depth: u32,
) -> String {
    expand_inner(store, text, base_path, depth, max_depth).await
}

/// Boxed recursion step. Substitution is positional: the output buffer is
/// rebuilt segment by segment from the scan offsets, so each marker
/// occurrence maps to exactly one expansion even when the same raw marker
/// appears several times.
fn expand_inner<'a, S: DocumentStore>(
    store: &'a S,
    text: String,
    base_path: String,
    depth: u32,
    max_depth: u32,
) -> LocalBoxFuture<'a, String> {
    Box::pin(async move {
        if depth >= max_depth {
            warn!(depth, max_depth, "depth limit reached, leaving text unexpanded");
            return text;
        }

        let embeds = find_embeds(&text);
        if embeds.is_empty() {
            return text;
        }
        debug!(count = embeds.len(), depth, base = %base_path, "expanding embeds");

        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;

        for embed in &embeds {
            out.push_str(&text[cursor..embed.start]);
            cursor = embed.end;

            match resolve(store, &embed.target, &base_path).await {
                ResolveOutcome::Skipped { reason } => {
                    debug!(target = %embed.target, ?reason, "keeping marker verbatim");
                    out.push_str(&embed.raw);
                }
                ResolveOutcome::Content { doc, text: extracted, .. } => {
                    let content = strip_frontmatter(&extracted);
                    let substitution = if find_embeds(content).is_empty() {
                        content.to_string()
                    } else {
                        expand_inner(
                            store,
                            content.to_string(),
                            doc.path.clone(),
                            depth + 1,
                            max_depth,
                        )
                        .await
                    };
                    out.push_str(&substitution);
                }
            }
        }

        out.push_str(&text[cursor..]);
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_no_markers_is_identity() {
        let store = MemoryStore::new();
        let text = "plain text, a [[wikilink]], nothing to expand";
        assert_eq!(expand(&store, text, "Base.md", 4).await, text);
    }

    #[tokio::test]
    async fn test_simple_substitution() {
        let mut store = MemoryStore::new();
        store.insert("Note.md", "embedded content");
        let out = expand(&store, "pre ![[Note]] post", "Base.md", 4).await;
        assert_eq!(out, "pre embedded content post");
    }

    #[tokio::test]
    async fn test_unresolved_marker_roundtrips_byte_for_byte() {
        let store = MemoryStore::new();
        let text = "keep ![[NoSuchDoc|alias]] intact";
        assert_eq!(expand(&store, text, "Base.md", 4).await, text);
    }

    #[tokio::test]
    async fn test_non_text_marker_is_untouched() {
        let mut store = MemoryStore::new();
        store.insert("chart.png", "binary");
        let text = "see ![[chart.png]]";
        assert_eq!(expand(&store, text, "Base.md", 4).await, text);
    }

    #[tokio::test]
    async fn test_one_bad_reference_does_not_stop_the_rest() {
        let mut store = MemoryStore::new();
        store.insert("Good.md", "good");
        let out = expand(&store, "![[Missing]] and ![[Good]]", "Base.md", 4).await;
        assert_eq!(out, "![[Missing]] and good");
    }

    #[tokio::test]
    async fn test_recursive_expansion() {
        let mut store = MemoryStore::new();
        store.insert("D.md", "wrapper: ![[E]]");
        store.insert("E.md", "innermost");
        let out = expand(&store, "![[D]]", "Base.md", 4).await;
        assert_eq!(out, "wrapper: innermost");
    }

    #[tokio::test]
    async fn test_depth_limit_stops_recursion() {
        let mut store = MemoryStore::new();
        store.insert("D.md", "level: ![[E]]");
        store.insert("E.md", "bottom");

        // max_depth 1: D's content is substituted but not recursed into.
        let out = expand(&store, "![[D]]", "Base.md", 1).await;
        assert_eq!(out, "level: ![[E]]");
    }

    #[tokio::test]
    async fn test_cycle_terminates() {
        let mut store = MemoryStore::new();
        store.insert("A.md", "a(![[B]])");
        store.insert("B.md", "b(![[A]])");

        let out = expand(&store, "![[A]]", "Base.md", 4).await;
        // Bounded: four levels of substitution, then the marker survives.
        assert_eq!(out, "a(b(a(b(![[A]]))))");
    }

    #[tokio::test]
    async fn test_zero_max_depth_returns_input() {
        let mut store = MemoryStore::new();
        store.insert("Note.md", "content");
        let text = "![[Note]]";
        assert_eq!(expand(&store, text, "Base.md", 0).await, text);
    }

    #[tokio::test]
    async fn test_frontmatter_stripped_from_substitution() {
        let mut store = MemoryStore::new();
        store.insert("Note.md", "---\ntitle: Note\n---\nvisible body");
        let out = expand(&store, "![[Note]]", "Base.md", 4).await;
        assert_eq!(out, "visible body");
    }

    #[tokio::test]
    async fn test_duplicate_markers_each_replaced_once() {
        let mut store = MemoryStore::new();
        store.insert("Note.md", "X");
        let out = expand(&store, "![[Note]] mid ![[Note]]", "Base.md", 4).await;
        assert_eq!(out, "X mid X");
    }

    #[tokio::test]
    async fn test_duplicate_markers_mixed_with_unresolved() {
        let mut store = MemoryStore::new();
        store.insert("Note.md", "X");
        let out =
            expand(&store, "![[Gone]] ![[Note]] ![[Gone]] ![[Note]]", "Base.md", 4).await;
        assert_eq!(out, "![[Gone]] X ![[Gone]] X");
    }

    #[tokio::test]
    async fn test_sibling_markers_expand_in_scan_order() {
        let mut store = MemoryStore::new();
        store.insert("One.md", "1");
        store.insert("Two.md", "2");
        let out = expand(&store, "![[Two]]![[One]]", "Base.md", 4).await;
        assert_eq!(out, "21");
    }

    #[tokio::test]
    async fn test_nested_relative_resolution_uses_resolved_document_path() {
        let mut store = MemoryStore::new();
        // sub/Inner.md is only reachable by shorthand or relative to sub/.
        store.insert("sub/Outer.md", "outer ![[Inner]]");
        store.insert("sub/Inner.md", "inner");
        let out = expand(&store, "![[sub/Outer]]", "Base.md", 4).await;
        assert_eq!(out, "outer inner");
    }

    #[tokio::test]
    async fn test_section_embed_recurses_into_section_content() {
        let mut store = MemoryStore::new();
        store.insert("Outer.md", "# Keep\n![[Leaf]]\n# Drop\nunrelated");
        store.insert("Leaf.md", "leaf body");
        let out = expand(&store, "![[Outer#Keep]]", "Base.md", 4).await;
        assert_eq!(out, "# Keep\nleaf body");
    }

    #[tokio::test]
    async fn test_expand_from_honors_initial_depth() {
        let mut store = MemoryStore::new();
        store.insert("Note.md", "content");
        let out = expand_from(
            &store,
            "![[Note]]".to_string(),
            "Base.md".to_string(),
            4,
            4,
        )
        .await;
        assert_eq!(out, "![[Note]]");
    }
}
