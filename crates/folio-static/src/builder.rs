//! Static site builder.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;

use folio_config::{canonical_slug, Feature, PageDecl, SiteConfig, StaticPage, ARCHIVE_SLUG, TAGS_SLUG};
use folio_mdx::{parse_mdx, render_html, slugify};

use crate::assets::{AssetPipeline, STYLESHEET_PATH};
use crate::collector::{DocumentCollector, DocumentError};
use crate::document::{by_date_desc, Document};
use crate::emit::{self, feed::FeedError, Artifact};
use crate::routes::{Route, RouteCollisionError, RouteTable, RouteTarget};
use crate::templates::{
    Context, LinkItem, NavItem, PostSummary, SiteContext, TagGroup, TagLink, TemplateEngine,
    TocEntry,
};

/// Number of posts listed on the home page.
const HOME_POSTS: usize = 10;

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildReport {
    /// Number of HTML routes written, home page included
    pub routes: usize,

    /// Number of documents published
    pub documents: usize,

    /// Optional artifacts written, relative to the output directory
    pub artifacts: Vec<PathBuf>,

    /// Documents that were skipped
    pub failures: Vec<DocumentError>,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that abort a build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Content directory not found: {}", .0.display())]
    ContentDirMissing(PathBuf),

    #[error(transparent)]
    RouteCollision(#[from] RouteCollisionError),

    #[error("Failed to load page {slug}: {message}")]
    Page { slug: String, message: String },

    #[error("Failed to render template: {0}")]
    Template(#[from] minijinja::Error),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A declared page loaded from disk.
struct LoadedPage<'c> {
    decl: &'c PageDecl,
    html: String,
    toc: Vec<TocEntry>,
}

/// Static site builder.
///
/// Holds a reference to the already validated configuration; nothing is
/// shared between builds.
pub struct SiteBuilder<'c> {
    config: &'c SiteConfig,
    templates: TemplateEngine,
}

impl<'c> SiteBuilder<'c> {
    /// Create a new site builder.
    pub fn new(config: &'c SiteConfig) -> Self {
        Self {
            config,
            templates: TemplateEngine::new(),
        }
    }

    /// Build the static site.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let start = Instant::now();
        let output_dir = &self.config.paths.output_dir;

        let content_dir = &self.config.paths.content_dir;
        if !content_dir.is_dir() {
            return Err(BuildError::ContentDirMissing(content_dir.clone()));
        }

        let collection = DocumentCollector::new(content_dir).collect();
        let documents = collection.documents;

        // Nothing is written unless every route resolves
        let routes = RouteTable::resolve(&documents, self.config)?;
        let pages = self.load_pages()?;

        create_dir(output_dir)?;

        let site = self.site_context(&routes);

        // Render documents in parallel
        let written: Vec<Result<(), BuildError>> = routes
            .iter()
            .collect::<Vec<_>>()
            .par_iter()
            .map(|route| self.build_route(route, &site, &documents, &pages))
            .collect();
        for result in written {
            result?;
        }

        // The home page is always present, even when navigation omits it
        let mut route_count = routes.len();
        if routes.get("/").is_none() {
            let home = Route {
                slug: "/".to_string(),
                target: RouteTarget::Page(StaticPage::Home),
                owner: "the home page".to_string(),
            };
            self.build_route(&home, &site, &documents, &pages)?;
            route_count += 1;
        }

        self.write_stylesheet()?;
        let artifacts = self.write_artifacts(&documents)?;

        let duration = start.elapsed();

        Ok(BuildReport {
            routes: route_count,
            documents: documents.len(),
            artifacts,
            failures: collection.failures,
            duration_ms: duration.as_millis() as u64,
            output_dir: output_dir.clone(),
        })
    }

    /// Load and render every declared page. A missing page is fatal.
    fn load_pages(&self) -> Result<Vec<LoadedPage<'c>>, BuildError> {
        self.config
            .pages
            .iter()
            .map(|decl| {
                let page_error = |message: String| BuildError::Page {
                    slug: decl.slug.clone(),
                    message,
                };
                let source = fs::read_to_string(&decl.source)
                    .map_err(|e| page_error(format!("{}: {}", decl.source.display(), e)))?;
                let doc = parse_mdx(&source).map_err(|e| page_error(e.to_string()))?;

                Ok(LoadedPage {
                    decl,
                    html: render_html(&doc.content),
                    toc: doc.toc.into_iter().map(toc_entry).collect(),
                })
            })
            .collect()
    }

    fn site_context(&self, routes: &RouteTable) -> SiteContext {
        let config = self.config;
        let features = &config.features;

        SiteContext {
            title: config.site.title.clone(),
            description: config.site.description.clone(),
            author: config.site.author.clone(),
            language: config.site.language.clone(),
            theme_color: config.theme.theme_color.clone(),
            stylesheet: STYLESHEET_PATH.to_string(),
            nav: config
                .navigation
                .iter()
                .map(|nav| NavItem {
                    title: nav.title.clone(),
                    path: url_path(&nav.slug),
                    active: false,
                })
                .collect(),
            external_links: config
                .external_links
                .iter()
                .map(|link| LinkItem {
                    name: link.name.clone(),
                    url: link.url.clone(),
                })
                .collect(),
            feed: features.rss.then(|| config.feed.path.clone()),
            manifest: features
                .manifest
                .then(|| emit::manifest::MANIFEST_PATH.to_string()),
            service_worker: features
                .offline
                .then(|| emit::offline::SERVICE_WORKER_PATH.to_string()),
            analytics_id: if features.analytics {
                config.analytics_id.clone()
            } else {
                None
            },
            tags_page: routes
                .get(TAGS_SLUG)
                .filter(|route| route.target == RouteTarget::Page(StaticPage::Tags))
                .map(Route::url_path),
        }
    }

    /// Render and write a single route.
    fn build_route(
        &self,
        route: &Route,
        site: &SiteContext,
        documents: &[Document],
        pages: &[LoadedPage<'_>],
    ) -> Result<(), BuildError> {
        let path = route.url_path();

        let (template, context) = match route.target {
            RouteTarget::Document(index) => {
                let doc = &documents[index];
                let context = Context {
                    title: doc.title.clone(),
                    path,
                    content: render_html(&doc.body),
                    toc: doc.toc.iter().cloned().map(toc_entry).collect(),
                    date: Some(doc.date.format("%Y-%m-%d").to_string()),
                    tags: doc
                        .tags
                        .iter()
                        .map(|tag| TagLink {
                            name: tag.clone(),
                            id: slugify(tag),
                        })
                        .collect(),
                    ..Default::default()
                };
                ("post.html", context)
            }
            RouteTarget::Page(StaticPage::Home) => {
                let context = Context {
                    title: self.config.site.title.clone(),
                    path,
                    posts: by_date_desc(documents)
                        .into_iter()
                        .take(HOME_POSTS)
                        .map(summarize)
                        .collect(),
                    ..Default::default()
                };
                ("list.html", context)
            }
            RouteTarget::Page(StaticPage::Archive) => {
                let context = Context {
                    title: self.nav_title(ARCHIVE_SLUG, "Blog"),
                    path,
                    posts: by_date_desc(documents).into_iter().map(summarize).collect(),
                    ..Default::default()
                };
                ("list.html", context)
            }
            RouteTarget::Page(StaticPage::Tags) => {
                let context = Context {
                    title: self.nav_title(TAGS_SLUG, "Tags"),
                    path,
                    tag_groups: tag_groups(documents),
                    ..Default::default()
                };
                ("tags.html", context)
            }
            RouteTarget::Page(StaticPage::Custom(index)) => {
                let page = &pages[index];
                let context = Context {
                    title: page.decl.title.clone(),
                    path,
                    content: page.html.clone(),
                    toc: page.toc.clone(),
                    ..Default::default()
                };
                ("page.html", context)
            }
        };

        let html = self.templates.render_page(template, site, &context)?;
        let output_path = route.output_path(&self.config.paths.output_dir);
        write_file(&output_path, html)?;

        tracing::debug!("Wrote {}", route);
        Ok(())
    }

    fn nav_title(&self, slug: &str, fallback: &str) -> String {
        self.config
            .navigation
            .iter()
            .find(|nav| canonical_slug(&nav.slug) == canonical_slug(slug))
            .map(|nav| nav.title.clone())
            .unwrap_or_else(|| fallback.to_string())
    }

    fn write_stylesheet(&self) -> Result<(), BuildError> {
        let css = AssetPipeline::generate_css(&self.config.theme);
        let css = if self.config.minify {
            AssetPipeline::minify_css(&css).unwrap_or_else(|e| {
                tracing::warn!("Skipping CSS minification: {}", e);
                css
            })
        } else {
            css
        };
        write_file(&self.config.paths.output_dir.join(STYLESHEET_PATH), css)
    }

    /// Write every enabled artifact and remove stale ones of disabled features.
    fn write_artifacts(&self, documents: &[Document]) -> Result<Vec<PathBuf>, BuildError> {
        let config = self.config;
        let output_dir = &config.paths.output_dir;

        let produced: Vec<(Feature, Option<Artifact>)> = vec![
            (Feature::Rss, emit::feed::emit(config, documents)?),
            (Feature::Sitemap, emit::sitemap::emit(config, documents)),
            (Feature::Sitemap, emit::sitemap::emit_robots(config)),
            (Feature::Manifest, emit::manifest::emit(config)),
            (Feature::Offline, emit::offline::emit(config, documents)),
        ];

        let enabled: Vec<Feature> = config.features.enabled().collect();
        tracing::debug!(
            "Enabled features: {}",
            enabled.iter().map(|f| f.name()).collect::<Vec<_>>().join(", ")
        );
        for feature in Feature::ALL.into_iter().filter(|f| !enabled.contains(f)) {
            for path in self.artifact_paths(feature) {
                remove_stale(&output_dir.join(path))?;
            }
        }

        let mut written = Vec::new();
        for (feature, artifact) in produced {
            let Some(artifact) = artifact else { continue };
            write_file(&output_dir.join(&artifact.path), artifact.contents)?;
            tracing::debug!("Wrote {} ({})", artifact.path.display(), feature);
            written.push(artifact.path);
        }

        Ok(written)
    }
}

impl SiteBuilder<'_> {
    /// Files a feature writes below the output directory.
    fn artifact_paths(&self, feature: Feature) -> Vec<&str> {
        match feature {
            Feature::Rss => vec![self.config.feed.path.as_str()],
            Feature::Sitemap => vec![emit::sitemap::SITEMAP_PATH, emit::sitemap::ROBOTS_PATH],
            Feature::Manifest => vec![emit::manifest::MANIFEST_PATH],
            Feature::Offline => vec![emit::offline::SERVICE_WORKER_PATH],
            // Rendered into pages
            Feature::Analytics => Vec::new(),
        }
    }
}

fn toc_entry(entry: folio_mdx::TocEntry) -> TocEntry {
    TocEntry {
        title: entry.title,
        id: entry.id,
        level: entry.level,
    }
}

fn summarize(doc: &Document) -> PostSummary {
    PostSummary {
        title: doc.title.clone(),
        path: doc.url_path(),
        date: doc.date.format("%Y-%m-%d").to_string(),
        summary: doc.summary().to_string(),
    }
}

/// Group posts by tag, tags alphabetically, posts newest first.
fn tag_groups(documents: &[Document]) -> Vec<TagGroup> {
    let mut groups: BTreeMap<&str, Vec<PostSummary>> = BTreeMap::new();
    for doc in by_date_desc(documents) {
        for tag in &doc.tags {
            groups.entry(tag).or_default().push(summarize(doc));
        }
    }

    groups
        .into_iter()
        .map(|(name, posts)| TagGroup {
            name: name.to_string(),
            id: slugify(name),
            posts,
        })
        .collect()
}

fn url_path(slug: &str) -> String {
    let key = canonical_slug(slug);
    if key.is_empty() {
        String::new()
    } else {
        format!("{key}/")
    }
}

fn create_dir(path: &Path) -> Result<(), BuildError> {
    fs::create_dir_all(path).map_err(|e| BuildError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }
    fs::write(path, contents).map_err(|e| BuildError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

fn remove_stale(path: &Path) -> Result<(), BuildError> {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::debug!("Removed stale {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(BuildError::Write {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
