//! Directory-backed document store.
//!
//! A [`Vault`] indexes every file under a root directory at open time and
//! serves reads through `tokio::fs`. Structural metadata for markdown
//! documents is derived once during indexing and cached.
//!
//! # Link resolution
//!
//! Link text rarely spells out a full path, so resolution tries, in order:
//!
//! 1. the text as a vault-root-relative path, with and without `.md`;
//! 2. the same relative to the referencing document's directory
//!    (`./` and `../` segments are honored);
//! 3. the first document, in sorted path order, whose name matches the
//!    link's final segment.
//!
//! The first hit wins, which keeps resolution deterministic for vaults that
//! contain several documents with the same name.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::core::GraftError;
use crate::store::{Document, DocumentMetadata, DocumentStore, StoreError};

/// A read-only view of a directory tree of documents.
pub struct Vault {
    root: PathBuf,
    /// All indexed documents, sorted by relative path.
    docs: Vec<Document>,
    /// Relative path -> index into `docs`.
    by_path: HashMap<String, usize>,
    /// Derived metadata for text documents, keyed by relative path.
    metadata: HashMap<String, DocumentMetadata>,
}

impl Vault {
    /// Open a vault rooted at `root`, indexing every file under it.
    ///
    /// Metadata derivation reads each markdown file once; unreadable files
    /// are indexed without metadata rather than failing the whole open.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, GraftError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(GraftError::VaultNotFound {
                path: root.display().to_string(),
            });
        }

        let mut docs = Vec::new();
        let mut metadata = HashMap::new();

        for entry in WalkDir::new(root).sort_by_file_name().into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(root) else {
                continue;
            };
            let rel = rel.to_string_lossy().replace('\\', "/");
            let doc = Document::from_path(&rel);

            if doc.is_text() {
                match std::fs::read_to_string(entry.path()) {
                    Ok(content) => {
                        metadata.insert(rel.clone(), DocumentMetadata::from_markdown(&content));
                    }
                    Err(err) => {
                        debug!(path = %rel, error = %err, "skipping metadata for unreadable file");
                    }
                }
            }
            docs.push(doc);
        }

        docs.sort_by(|a, b| a.path.cmp(&b.path));
        let by_path = docs.iter().enumerate().map(|(i, d)| (d.path.clone(), i)).collect();

        Ok(Self {
            root: root.to_path_buf(),
            docs,
            by_path,
            metadata,
        })
    }

    /// The vault root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of indexed documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    /// Look up a document by its exact relative path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Document> {
        self.by_path.get(path).map(|&i| &self.docs[i])
    }

    fn lookup(&self, candidate: &str) -> Option<&Document> {
        self.get(candidate).or_else(|| self.get(&format!("{candidate}.md")))
    }
}

/// Join `link` onto the directory of `from_path`, resolving `.` and `..`
/// without touching the filesystem. Returns `None` when `..` escapes the
/// vault root.
fn join_relative(from_path: &str, link: &str) -> Option<String> {
    let base_dir = match from_path.rsplit_once('/') {
        Some((dir, _)) => dir,
        None => "",
    };

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for part in link.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }
    Some(segments.join("/"))
}

impl DocumentStore for Vault {
    fn resolve_link(&self, link: &str, from_path: &str) -> Option<Document> {
        let link = link.trim().replace('\\', "/");
        let link = link.trim_start_matches("./");
        if link.is_empty() {
            return None;
        }

        // Vault-root relative.
        if let Some(doc) = self.lookup(link) {
            return Some(doc.clone());
        }

        // Relative to the referencing document.
        if let Some(joined) = join_relative(from_path, link) {
            if let Some(doc) = self.lookup(&joined) {
                return Some(doc.clone());
            }
        }

        // Shorthand: first document whose name matches the final segment.
        let shorthand = link.rsplit('/').next().unwrap_or(link);
        let shorthand = shorthand.strip_suffix(".md").unwrap_or(shorthand);
        let found = self.docs.iter().find(|d| d.name == shorthand).cloned();
        if found.is_none() {
            debug!(link, from = from_path, "link did not resolve to any document");
        }
        found
    }

    async fn read_text(&self, doc: &Document) -> Result<String, StoreError> {
        if !self.by_path.contains_key(&doc.path) {
            return Err(StoreError::UnknownDocument {
                path: doc.path.clone(),
            });
        }
        let full = self.root.join(&doc.path);
        tokio::fs::read_to_string(&full).await.map_err(|source| StoreError::Io {
            path: doc.path.clone(),
            source,
        })
    }

    fn metadata(&self, doc: &Document) -> Option<DocumentMetadata> {
        self.metadata.get(&doc.path).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn vault_with(files: &[(&str, &str)]) -> (TempDir, Vault) {
        let dir = TempDir::new().unwrap();
        for (path, content) in files {
            let full = dir.path().join(path);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(full, content).unwrap();
        }
        let vault = Vault::open(dir.path()).unwrap();
        (dir, vault)
    }

    #[test]
    fn test_open_missing_root_fails() {
        assert!(Vault::open("/definitely/not/a/real/dir").is_err());
    }

    #[test]
    fn test_indexes_all_file_types() {
        let (_dir, vault) = vault_with(&[("a.md", "x"), ("img/pic.png", "bin")]);
        assert_eq!(vault.len(), 2);
        assert!(vault.get("img/pic.png").is_some());
    }

    #[test]
    fn test_resolve_root_relative() {
        let (_dir, vault) = vault_with(&[("notes/A.md", "x")]);
        let doc = vault.resolve_link("notes/A", "B.md").unwrap();
        assert_eq!(doc.path, "notes/A.md");
        assert!(vault.resolve_link("notes/A.md", "B.md").is_some());
    }

    #[test]
    fn test_resolve_relative_to_base() {
        let (_dir, vault) = vault_with(&[("notes/A.md", "x"), ("notes/B.md", "y")]);
        let doc = vault.resolve_link("A", "notes/B.md").unwrap();
        assert_eq!(doc.path, "notes/A.md");
        let doc = vault.resolve_link("../notes/A", "notes/B.md").unwrap();
        assert_eq!(doc.path, "notes/A.md");
    }

    #[test]
    fn test_resolve_shorthand_first_match_in_sorted_order() {
        let (_dir, vault) =
            vault_with(&[("b/Note.md", "second"), ("a/Note.md", "first"), ("Other.md", "z")]);
        let doc = vault.resolve_link("Note", "Other.md").unwrap();
        assert_eq!(doc.path, "a/Note.md");
    }

    #[test]
    fn test_resolve_miss_returns_none() {
        let (_dir, vault) = vault_with(&[("A.md", "x")]);
        assert!(vault.resolve_link("NoSuchNote", "A.md").is_none());
        assert!(vault.resolve_link("", "A.md").is_none());
    }

    #[test]
    fn test_dotdot_escaping_root_falls_back_to_shorthand() {
        let (_dir, vault) = vault_with(&[("A.md", "x")]);
        let doc = vault.resolve_link("../../A", "A.md").unwrap();
        assert_eq!(doc.path, "A.md");
    }

    #[tokio::test]
    async fn test_read_text() {
        let (_dir, vault) = vault_with(&[("A.md", "hello vault")]);
        let doc = vault.get("A.md").unwrap().clone();
        assert_eq!(vault.read_text(&doc).await.unwrap(), "hello vault");
    }

    #[tokio::test]
    async fn test_read_unknown_document_fails() {
        let (_dir, vault) = vault_with(&[("A.md", "x")]);
        let ghost = Document::from_path("Ghost.md");
        assert!(matches!(
            vault.read_text(&ghost).await,
            Err(StoreError::UnknownDocument { .. })
        ));
    }

    #[test]
    fn test_metadata_for_markdown_only() {
        let (_dir, vault) =
            vault_with(&[("A.md", "# Title\nbody ^blk"), ("img/pic.png", "bin")]);
        let doc = vault.get("A.md").unwrap().clone();
        let meta = vault.metadata(&doc).unwrap();
        assert_eq!(meta.headings.len(), 1);
        assert!(meta.blocks.contains_key("blk"));

        let pic = vault.get("img/pic.png").unwrap().clone();
        assert!(vault.metadata(&pic).is_none());
    }
}
