//! Content-to-site pipeline for folio blogs.
//!
//! Collects MDX documents, binds them and the static pages into one route
//! namespace, and writes HTML pages plus the optional site artifacts (feed,
//! sitemap, manifest, service worker).

pub mod assets;
pub mod builder;
pub mod collector;
pub mod document;
pub mod emit;
pub mod routes;
pub mod templates;

pub use builder::{BuildError, BuildReport, SiteBuilder};
pub use collector::{Collection, DocumentCollector, DocumentError, MalformedFrontMatterError};
pub use document::Document;
pub use emit::Artifact;
pub use routes::{Route, RouteCollisionError, RouteTable, RouteTarget};
