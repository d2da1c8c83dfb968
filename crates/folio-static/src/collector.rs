//! Document discovery.
//!
//! Walks the content root and turns every `.mdx`/`.md` file into a
//! [`Document`]. A document that fails to load is reported and skipped; it
//! never aborts the whole collection.

use std::fs;
use std::path::{Path, PathBuf};

use folio_mdx::FrontmatterError;
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::document::Document;

/// Frontmatter of a single document is absent or invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}: {reason}", path.display())]
pub struct MalformedFrontMatterError {
    pub path: PathBuf,
    pub reason: FrontmatterError,
}

/// Per-document failure. Never fatal to a build.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("{}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    MalformedFrontMatter(#[from] MalformedFrontMatterError),

    #[error("{}: cannot derive a slug from this path", path.display())]
    NoSlug { path: PathBuf },
}

impl DocumentError {
    /// Source file the failure refers to.
    pub fn path(&self) -> &Path {
        match self {
            Self::Unreadable { path, .. } | Self::NoSlug { path } => path,
            Self::MalformedFrontMatter(e) => &e.path,
        }
    }
}

/// Outcome of scanning the content root.
#[derive(Debug, Default)]
pub struct Collection {
    /// Loaded documents, sorted by slug
    pub documents: Vec<Document>,
    /// Skipped sources, sorted by path
    pub failures: Vec<DocumentError>,
}

/// Scans a content root for documents.
#[derive(Debug, Clone)]
pub struct DocumentCollector {
    root: PathBuf,
}

impl DocumentCollector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Content files below the root in a stable, sorted order.
    pub fn sources(&self) -> impl Iterator<Item = PathBuf> + '_ {
        WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .map(walkdir::DirEntry::into_path)
            .filter(|path| is_content_file(path))
    }

    /// Lazily load every document in source order.
    ///
    /// The iterator re-reads the file system; calling this again on an
    /// unchanged tree yields the same sequence.
    pub fn documents(&self) -> impl Iterator<Item = Result<Document, DocumentError>> + '_ {
        self.sources().map(move |path| self.load(&path))
    }

    /// Load every document in parallel and merge deterministically.
    pub fn collect(&self) -> Collection {
        let sources: Vec<PathBuf> = self.sources().collect();

        let results: Vec<Result<Document, DocumentError>> =
            sources.par_iter().map(|path| self.load(path)).collect();

        let mut collection = Collection::default();
        for result in results {
            match result {
                Ok(doc) => collection.documents.push(doc),
                Err(e) => {
                    tracing::warn!("Skipping document: {}", e);
                    collection.failures.push(e);
                }
            }
        }

        collection.documents.sort_by(|a, b| {
            a.slug
                .cmp(&b.slug)
                .then_with(|| a.source_path.cmp(&b.source_path))
        });
        collection.failures.sort_by(|a, b| a.path().cmp(b.path()));

        tracing::debug!(
            "Collected {} documents ({} skipped) from {}",
            collection.documents.len(),
            collection.failures.len(),
            self.root.display()
        );

        collection
    }

    fn load(&self, path: &Path) -> Result<Document, DocumentError> {
        let source = fs::read_to_string(path).map_err(|e| DocumentError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        })?;
        let relative = path.strip_prefix(&self.root).unwrap_or(path);

        Document::parse(path, relative, &source)
    }
}

fn is_content_file(path: &Path) -> bool {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    ext == "mdx" || ext == "md"
}
