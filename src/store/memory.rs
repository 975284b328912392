//! In-memory document store.
//!
//! Backs unit tests and embedding hosts that already hold document content
//! (an editor buffer, a cache layer). Insertion order is preserved and used
//! for shorthand resolution, so fixtures behave predictably.

use std::collections::HashMap;

use crate::store::{Document, DocumentMetadata, DocumentStore, StoreError};

/// Map-backed store with caller-controlled content and metadata.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: Vec<(Document, String)>,
    metadata: HashMap<String, DocumentMetadata>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document; metadata is derived from the content when the
    /// path has a text extension.
    pub fn insert(&mut self, path: &str, content: &str) -> Document {
        let doc = Document::from_path(path);
        if doc.is_text() {
            self.metadata.insert(path.to_string(), DocumentMetadata::from_markdown(content));
        }
        self.docs.push((doc.clone(), content.to_string()));
        doc
    }

    /// Insert a document with explicit metadata, bypassing derivation.
    pub fn insert_with_metadata(
        &mut self,
        path: &str,
        content: &str,
        metadata: DocumentMetadata,
    ) -> Document {
        let doc = Document::from_path(path);
        self.metadata.insert(path.to_string(), metadata);
        self.docs.push((doc.clone(), content.to_string()));
        doc
    }

    /// Insert a document that reports no structural metadata at all.
    pub fn insert_without_metadata(&mut self, path: &str, content: &str) -> Document {
        let doc = Document::from_path(path);
        self.docs.push((doc.clone(), content.to_string()));
        doc
    }
}

impl DocumentStore for MemoryStore {
    fn resolve_link(&self, link: &str, _from_path: &str) -> Option<Document> {
        let link = link.trim();
        if link.is_empty() {
            return None;
        }

        // Exact path, with or without extension.
        for (doc, _) in &self.docs {
            if doc.path == link || doc.path == format!("{link}.md") {
                return Some(doc.clone());
            }
        }

        // Shorthand by name, first insertion wins.
        let shorthand = link.rsplit('/').next().unwrap_or(link);
        let shorthand = shorthand.strip_suffix(".md").unwrap_or(shorthand);
        self.docs.iter().find(|(doc, _)| doc.name == shorthand).map(|(doc, _)| doc.clone())
    }

    async fn read_text(&self, doc: &Document) -> Result<String, StoreError> {
        self.docs
            .iter()
            .find(|(d, _)| d.path == doc.path)
            .map(|(_, content)| content.clone())
            .ok_or_else(|| StoreError::UnknownDocument {
                path: doc.path.clone(),
            })
    }

    fn metadata(&self, doc: &Document) -> Option<DocumentMetadata> {
        self.metadata.get(&doc.path).cloned()
    }
}
