//! Optional site artifacts.
//!
//! Every emitter is a pure function of the configuration and the collected
//! documents. A disabled feature yields no artifact at all.

pub mod feed;
pub mod manifest;
pub mod offline;
pub mod sitemap;

use std::path::PathBuf;

use folio_config::{canonical_slug, SiteConfig};

use crate::document::Document;

/// A generated file, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: String,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// Site-relative paths of every page: home, static pages, then documents.
pub(crate) fn page_paths(config: &SiteConfig, documents: &[Document]) -> Vec<String> {
    let mut paths = vec![String::new()];

    for (_, slug) in config.static_routes() {
        let key = canonical_slug(&slug);
        if !key.is_empty() {
            paths.push(format!("{key}/"));
        }
    }

    paths.extend(documents.iter().map(Document::url_path));
    paths
}
