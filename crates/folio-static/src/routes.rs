//! Route resolution.
//!
//! Documents and static pages share one slug namespace. Two claimants for
//! the same slug always fail the build; neither one wins.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use folio_config::{canonical_slug, SiteConfig, StaticPage};

use crate::document::Document;

/// What a route renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteTarget {
    /// Index into the resolved document slice
    Document(usize),
    Page(StaticPage),
}

/// A slug bound to its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Slug as declared by its owner
    pub slug: String,
    pub target: RouteTarget,
    /// Human readable owner, used in diagnostics
    pub owner: String,
}

impl Route {
    /// Site-relative URL path, `""` for the home page.
    pub fn url_path(&self) -> String {
        let key = canonical_slug(&self.slug);
        if key.is_empty() {
            String::new()
        } else {
            format!("{key}/")
        }
    }

    /// HTML output location below `output_dir`.
    pub fn output_path(&self, output_dir: &Path) -> PathBuf {
        let key = canonical_slug(&self.slug);
        if key.is_empty() {
            output_dir.join("index.html")
        } else {
            output_dir.join(key).join("index.html")
        }
    }
}

/// Two entities claim the same slug.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Route `{slug}` is claimed by both {first} and {second}")]
pub struct RouteCollisionError {
    pub slug: String,
    pub first: String,
    pub second: String,
}

/// Every route of the site, keyed by canonical slug.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: BTreeMap<String, Route>,
}

impl RouteTable {
    /// Bind static pages and documents into one namespace.
    ///
    /// Fails on the first collision found; nothing is emitted before this
    /// succeeds.
    pub fn resolve(documents: &[Document], config: &SiteConfig) -> Result<Self, RouteCollisionError> {
        let mut table = Self::default();

        for (page, slug) in config.static_routes() {
            let owner = describe_page(config, page, &slug);
            table.insert(Route {
                slug,
                target: RouteTarget::Page(page),
                owner,
            })?;
        }

        for (index, doc) in documents.iter().enumerate() {
            table.insert(Route {
                slug: doc.slug.clone(),
                target: RouteTarget::Document(index),
                owner: format!("document {}", doc.source_path.display()),
            })?;
        }

        tracing::debug!("Resolved {} routes", table.len());
        Ok(table)
    }

    fn insert(&mut self, route: Route) -> Result<(), RouteCollisionError> {
        let key = canonical_slug(&route.slug).to_string();
        if let Some(existing) = self.routes.get(&key) {
            return Err(RouteCollisionError {
                slug: route.slug,
                first: existing.owner.clone(),
                second: route.owner,
            });
        }
        self.routes.insert(key, route);
        Ok(())
    }

    pub fn get(&self, slug: &str) -> Option<&Route> {
        self.routes.get(canonical_slug(slug))
    }

    /// Declared slugs in canonical order.
    pub fn slugs(&self) -> Vec<&str> {
        self.routes.values().map(|r| r.slug.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.values()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn describe_page(config: &SiteConfig, page: StaticPage, slug: &str) -> String {
    match page {
        StaticPage::Custom(i) => format!("page {}", config.pages[i].source.display()),
        StaticPage::Home => "the home page".to_string(),
        _ => format!("built-in page {slug}"),
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{} ({})", self.url_path(), self.owner)
    }
}
