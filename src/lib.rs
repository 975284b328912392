//! graft — expand embedded note references (transclusions) in markdown text.
//!
//! Note-taking vaults link documents together with embed markers:
//! `![[Other Note]]` inlines a whole document, `![[Note#Section]]` one
//! header section, `![[Note#^block]]` one anchored block. graft replaces
//! those markers with the literal content they point at, recursively, up to
//! a bounded depth — turning a web of references into one self-contained
//! text.
//!
//! # Architecture
//!
//! - [`markdown`] — pure text primitives: marker scanning, frontmatter
//!   stripping, slug normalization.
//! - [`store`] — the document boundary: a [`DocumentStore`] trait plus a
//!   directory-backed [`Vault`] and an in-process [`MemoryStore`].
//! - [`resolver`] — turns a marker target into extracted text: link
//!   resolution, file-type gating, header/block section slicing with
//!   explicit fallback outcomes.
//! - [`expander`] — the depth-bounded recursive substitution loop.
//! - [`cli`], [`core`] — the command shell and its error types.
//!
//! Expansion is deliberately tolerant: a reference that cannot be resolved
//! keeps its marker byte-for-byte, a missing section degrades to the whole
//! document, and a cyclic embed graph terminates at the depth limit. The
//! caller always gets a best-effort string back; diagnostics flow through
//! [`tracing`].
//!
//! # Example
//!
//! ```
//! use graft::{MemoryStore, expand};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut store = MemoryStore::new();
//! store.insert("Recipe.md", "---\ntags: [food]\n---\nStir and serve.");
//!
//! let out = expand(&store, "Steps: ![[Recipe]]", "Plan.md", 4).await;
//! assert_eq!(out, "Steps: Stir and serve.");
//! # }
//! ```

pub mod cli;
pub mod core;
pub mod expander;
pub mod markdown;
pub mod resolver;
pub mod store;

pub use expander::{DEFAULT_MAX_DEPTH, expand, expand_from};
pub use resolver::{ResolveOutcome, SectionFallback, SectionRef, SkipReason, resolve};
pub use store::{
    BlockSpan, Document, DocumentMetadata, DocumentStore, Heading, MemoryStore, StoreError, Vault,
};
