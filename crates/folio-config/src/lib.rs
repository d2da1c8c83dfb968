//! Site configuration for folio.
//!
//! A [`SiteConfig`] is merged from four layers, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. `folio.toml`
//! 3. environment overrides ([`EnvOverrides`])
//! 4. CLI settings ([`CliSettings`])
//!
//! The merged record is validated once and then passed by reference to
//! every build stage. It is never mutated afterwards.

mod features;
mod overrides;
mod raw;

use std::fs;
use std::path::{Path, PathBuf};

use folio_mdx::slugify;
use url::Url;

pub use features::{Feature, FeatureToggles};
pub use overrides::{CliSettings, EnvOverrides, ENV_ANALYTICS_ID, ENV_OUTPUT_DIR, ENV_SITE_URL};
pub use raw::{ConfigFile, ExternalLink, NavLink};

/// Configuration filename looked up in the working directory.
pub const CONFIG_FILENAME: &str = "folio.toml";

/// Slug of the home page.
pub const HOME_SLUG: &str = "/";
/// Slug of the built-in chronological archive.
pub const ARCHIVE_SLUG: &str = "/blog";
/// Slug of the built-in tag index.
pub const TAGS_SLUG: &str = "/tags";

/// Route-table key for a slug: surrounding slashes are not significant.
pub fn canonical_slug(slug: &str) -> &str {
    slug.trim_matches('/')
}

/// Descriptive site metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteMeta {
    pub title: String,
    pub title_alt: String,
    /// Public URL without a trailing slash, empty when unknown
    pub url: String,
    pub description: String,
    pub author: String,
    pub image: Option<String>,
    pub language: String,
}

/// Theme colours, used by the stylesheet and the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub theme_color: String,
    pub background_color: String,
}

/// Web-app manifest settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestSettings {
    pub short_name: String,
    pub start_url: String,
    pub display: String,
}

/// A standalone MDX page served at a fixed slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageDecl {
    pub slug: String,
    pub title: String,
    pub source: PathBuf,
}

/// Source and output locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub content_dir: PathBuf,
    pub output_dir: PathBuf,
}

/// RSS feed settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSettings {
    /// Output path relative to the output directory
    pub path: String,
    /// Maximum number of items, `None` for all
    pub limit: Option<usize>,
}

/// A page known to the site builder that navigation may point at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaticPage {
    Home,
    Archive,
    Tags,
    /// Index into [`SiteConfig::pages`]
    Custom(usize),
}

/// Fully merged and validated site configuration.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub site: SiteMeta,
    pub navigation: Vec<NavLink>,
    pub external_links: Vec<ExternalLink>,
    pub features: FeatureToggles,
    pub analytics_id: Option<String>,
    pub theme: Theme,
    pub manifest: ManifestSettings,
    pub pages: Vec<PageDecl>,
    pub paths: Paths,
    pub feed: FeedSettings,
    pub minify: bool,
}

impl SiteConfig {
    /// Load configuration from file with environment and CLI overrides.
    ///
    /// If `config_path` is provided it must exist. Otherwise `folio.toml` in
    /// the working directory is used when present, and defaults when not.
    /// Relative paths resolve against the directory holding the config file.
    pub fn load(
        config_path: Option<&Path>,
        env: &EnvOverrides,
        cli: &CliSettings,
    ) -> Result<Self, ConfigError> {
        let (file, base_dir) = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => (Self::read_file(path)?, parent_dir(path)),
            None => {
                let default_path = Path::new(CONFIG_FILENAME);
                if default_path.exists() {
                    (Self::read_file(default_path)?, PathBuf::from("."))
                } else {
                    tracing::debug!("No {} found, using defaults", CONFIG_FILENAME);
                    (ConfigFile::default(), PathBuf::from("."))
                }
            }
        };

        Self::from_layers(file, env, cli, &base_dir)
    }

    /// Parse a TOML document with no environment or CLI overrides.
    pub fn parse(toml: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(toml)?;
        Self::from_layers(file, &EnvOverrides::default(), &CliSettings::default(), base_dir)
    }

    fn read_file(path: &Path) -> Result<ConfigFile, ConfigError> {
        let content = fs::read_to_string(path)?;
        let file = toml::from_str(&content)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(file)
    }

    /// Merge the layers and validate the result.
    pub fn from_layers(
        file: ConfigFile,
        env: &EnvOverrides,
        cli: &CliSettings,
        base_dir: &Path,
    ) -> Result<Self, ConfigError> {
        let site_file = file.site;

        let url = cli
            .site_url
            .clone()
            .or_else(|| env.site_url.clone())
            .or(site_file.url)
            .unwrap_or_default()
            .trim_end_matches('/')
            .to_string();

        let title = site_file.title.unwrap_or_default();
        let description = site_file.description.unwrap_or_default();

        let analytics_id = env
            .analytics_id
            .clone()
            .or(file.analytics.tracking_id)
            .filter(|id| !id.trim().is_empty());

        let defaults = FeatureToggles::default();
        let features = FeatureToggles {
            sitemap: file.features.sitemap.unwrap_or(defaults.sitemap),
            manifest: file.features.manifest.unwrap_or(defaults.manifest),
            offline: file.features.offline.unwrap_or(defaults.offline),
            // Without a tracking id there is nothing to inject
            analytics: analytics_id.is_some()
                && file.features.analytics.unwrap_or(analytics_id.is_some()),
            rss: file.features.rss.unwrap_or(defaults.rss),
        };

        let content_dir = cli
            .content_dir
            .clone()
            .unwrap_or_else(|| base_dir.join(file.paths.content.unwrap_or_else(|| "content/posts".into())));
        let output_dir = cli
            .output_dir
            .clone()
            .or_else(|| env.output_dir.clone())
            .unwrap_or_else(|| base_dir.join(file.paths.output.unwrap_or_else(|| "public".into())));

        let pages = file
            .pages
            .into_iter()
            .map(|p| PageDecl {
                slug: p.slug,
                title: p.title,
                source: base_dir.join(p.source),
            })
            .collect();

        let config = Self {
            manifest: ManifestSettings {
                short_name: file
                    .manifest
                    .short_name
                    .unwrap_or_else(|| title.clone()),
                start_url: file.manifest.start_url.unwrap_or_else(|| "/".to_string()),
                display: file
                    .manifest
                    .display
                    .unwrap_or_else(|| "minimal-ui".to_string()),
            },
            site: SiteMeta {
                title_alt: site_file.title_alt.unwrap_or_else(|| title.clone()),
                title,
                url,
                description,
                author: site_file.author.unwrap_or_default(),
                image: site_file.image,
                language: site_file.language.unwrap_or_else(|| "en".to_string()),
            },
            navigation: file.navigation,
            external_links: file.external_links,
            features,
            analytics_id,
            theme: Theme {
                theme_color: site_file
                    .theme_color
                    .unwrap_or_else(|| "#3498DB".to_string()),
                background_color: site_file
                    .background_color
                    .unwrap_or_else(|| "#ffffff".to_string()),
            },
            pages,
            paths: Paths {
                content_dir,
                output_dir,
            },
            feed: FeedSettings {
                path: file.feed.path.unwrap_or_else(|| "rss.xml".to_string()),
                limit: file.feed.limit,
            },
            minify: cli.minify.or(file.build.minify).unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate required fields and cross references.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::MissingField("site.title"));
        }

        if !self.site.url.is_empty() && !is_absolute_url(&self.site.url) {
            return Err(ConfigError::Validation(format!(
                "site.url must be an absolute URL, got `{}`",
                self.site.url
            )));
        }

        for page in &self.pages {
            let key = canonical_slug(&page.slug);
            if !is_slug_path(key) {
                return Err(ConfigError::Validation(format!(
                    "page slug `{}` must be lower-case words joined by `-`, e.g. `/{}`",
                    page.slug,
                    key.split('/').map(slugify).collect::<Vec<_>>().join("/")
                )));
            }
            if key.is_empty()
                || key == canonical_slug(ARCHIVE_SLUG)
                || key == canonical_slug(TAGS_SLUG)
            {
                return Err(ConfigError::Validation(format!(
                    "page slug `{}` is reserved",
                    page.slug
                )));
            }
        }

        for link in &self.external_links {
            if !is_absolute_url(&link.url) {
                return Err(ConfigError::RelativeExternalLink {
                    name: link.name.clone(),
                    url: link.url.clone(),
                });
            }
        }

        for nav in &self.navigation {
            if self.static_page(&nav.slug).is_none() {
                return Err(ConfigError::UnknownNavigationTarget {
                    title: nav.title.clone(),
                    slug: nav.slug.clone(),
                });
            }
        }

        Ok(())
    }

    /// Look up the static page a slug refers to.
    pub fn static_page(&self, slug: &str) -> Option<StaticPage> {
        let key = canonical_slug(slug);
        if key == canonical_slug(HOME_SLUG) {
            return Some(StaticPage::Home);
        }
        if key == canonical_slug(ARCHIVE_SLUG) {
            return Some(StaticPage::Archive);
        }
        if key == canonical_slug(TAGS_SLUG) {
            return Some(StaticPage::Tags);
        }
        self.pages
            .iter()
            .position(|p| canonical_slug(&p.slug) == key)
            .map(StaticPage::Custom)
    }

    /// Whether navigation points at a built-in page.
    pub fn links_to(&self, page: StaticPage) -> bool {
        self.navigation
            .iter()
            .any(|nav| self.static_page(&nav.slug) == Some(page))
    }

    /// Static pages the site exposes as routes, with the slug that claims them.
    ///
    /// Declared pages come first in declaration order, then every built-in
    /// page that navigation references.
    pub fn static_routes(&self) -> Vec<(StaticPage, String)> {
        let mut routes: Vec<(StaticPage, String)> = self
            .pages
            .iter()
            .enumerate()
            .map(|(i, p)| (StaticPage::Custom(i), p.slug.clone()))
            .collect();

        for (page, slug) in [
            (StaticPage::Home, HOME_SLUG),
            (StaticPage::Archive, ARCHIVE_SLUG),
            (StaticPage::Tags, TAGS_SLUG),
        ] {
            if self.links_to(page) {
                routes.push((page, slug.to_string()));
            }
        }

        routes
    }

    /// Absolute URL for a site-relative path such as `python-generators/`.
    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}/{}", self.site.url, path.trim_start_matches('/'))
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Parses as a URL with a host, e.g. `https://example.com/blog`.
fn is_absolute_url(url: &str) -> bool {
    Url::parse(url).is_ok_and(|url| url.has_host())
}

/// Every `/`-separated segment is already in slug form.
///
/// Route keys are compared byte for byte, so `About` and `about` would be
/// distinct routes that share one file on case-insensitive file systems.
fn is_slug_path(key: &str) -> bool {
    key.is_empty()
        || key
            .split('/')
            .all(|segment| !segment.is_empty() && slugify(segment) == segment)
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Navigation entry `{title}` points at unknown route `{slug}`")]
    UnknownNavigationTarget { title: String, slug: String },

    #[error("External link `{name}` must be an absolute URL, got `{url}`")]
    RelativeExternalLink { name: String, url: String },

    #[error("Configuration error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BLOG_TOML: &str = r#"
[site]
title = "Lazy Evaluation"
url = "https://blog.example.com/"
author = "A. Writer"
description = "Notes on iterators and generators"

[[navigation]]
title = "Blog"
slug = "/blog"

[[navigation]]
title = "About"
slug = "/about"

[[navigation]]
title = "Home"
slug = "/"

[[external_links]]
name = "GitHub"
url = "https://github.com/example"

[[external_links]]
name = "Mastodon"
url = "https://hachyderm.io/@example"

[[pages]]
slug = "/about"
title = "About"
source = "pages/about.mdx"
"#;

    fn parse(toml: &str) -> Result<SiteConfig, ConfigError> {
        SiteConfig::parse(toml, Path::new("/site"))
    }

    #[test]
    fn preserves_declaration_order() {
        let config = parse(BLOG_TOML).unwrap();

        let nav: Vec<_> = config.navigation.iter().map(|n| n.slug.as_str()).collect();
        assert_eq!(nav, vec!["/blog", "/about", "/"]);

        let links: Vec<_> = config.external_links.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(links, vec!["GitHub", "Mastodon"]);
    }

    #[test]
    fn applies_defaults() {
        let config = parse("[site]\ntitle = \"T\"\n").unwrap();

        assert_eq!(config.site.title_alt, "T");
        assert_eq!(config.site.language, "en");
        assert_eq!(config.theme.theme_color, "#3498DB");
        assert_eq!(config.manifest.short_name, "T");
        assert_eq!(config.manifest.display, "minimal-ui");
        assert_eq!(config.paths.content_dir, PathBuf::from("/site/content/posts"));
        assert_eq!(config.paths.output_dir, PathBuf::from("/site/public"));
        assert_eq!(config.feed.path, "rss.xml");
        assert_eq!(config.features, FeatureToggles::default());
        assert!(config.minify);
    }

    #[test]
    fn trims_trailing_slash_from_site_url() {
        let config = parse(BLOG_TOML).unwrap();
        assert_eq!(config.site.url, "https://blog.example.com");
        assert_eq!(
            config.absolute_url("generators/"),
            "https://blog.example.com/generators/"
        );
    }

    #[test]
    fn missing_title_is_rejected() {
        let err = parse("[site]\nauthor = \"x\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField("site.title")));
    }

    #[test]
    fn unknown_navigation_target_is_rejected() {
        let err = parse("[site]\ntitle = \"T\"\n[[navigation]]\ntitle = \"Now\"\nslug = \"/now\"\n")
            .unwrap_err();
        assert!(
            matches!(err, ConfigError::UnknownNavigationTarget { ref slug, .. } if slug == "/now"),
            "Expected UnknownNavigationTarget, got {err:?}"
        );
    }

    #[test]
    fn relative_external_link_is_rejected() {
        let err = parse("[site]\ntitle = \"T\"\n[[external_links]]\nname = \"Me\"\nurl = \"/me\"\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::RelativeExternalLink { .. }));
    }

    #[test]
    fn reserved_page_slug_is_rejected() {
        let toml = "[site]\ntitle = \"T\"\n[[pages]]\nslug = \"/blog\"\ntitle = \"B\"\nsource = \"b.mdx\"\n";
        assert!(matches!(parse(toml).unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn resolves_static_pages() {
        let config = parse(BLOG_TOML).unwrap();

        assert_eq!(config.static_page("/"), Some(StaticPage::Home));
        assert_eq!(config.static_page("/blog/"), Some(StaticPage::Archive));
        assert_eq!(config.static_page("about"), Some(StaticPage::Custom(0)));
        assert_eq!(config.static_page("/tags"), Some(StaticPage::Tags));
        assert_eq!(config.static_page("/nope"), None);
        assert!(config.links_to(StaticPage::Archive));
        assert!(!config.links_to(StaticPage::Tags));
        assert_eq!(config.pages[0].source, PathBuf::from("/site/pages/about.mdx"));
    }

    #[test]
    fn static_routes_list_pages_then_linked_builtins() {
        let config = parse(BLOG_TOML).unwrap();

        let routes = config.static_routes();

        assert_eq!(
            routes,
            vec![
                (StaticPage::Custom(0), "/about".to_string()),
                (StaticPage::Home, "/".to_string()),
                (StaticPage::Archive, "/blog".to_string()),
            ]
        );
    }

    #[test]
    fn analytics_requires_tracking_id() {
        let config = parse("[site]\ntitle = \"T\"\n[features]\nanalytics = true\n").unwrap();
        assert!(!config.features.analytics);
        assert!(config.analytics_id.is_none());
    }

    #[test]
    fn analytics_follows_environment_id() {
        let file: ConfigFile = toml::from_str("[site]\ntitle = \"T\"\n").unwrap();
        let env = EnvOverrides::from_vars([(ENV_ANALYTICS_ID, "G-ABC123")]);

        let config =
            SiteConfig::from_layers(file, &env, &CliSettings::default(), Path::new(".")).unwrap();

        assert!(config.features.analytics);
        assert_eq!(config.analytics_id.as_deref(), Some("G-ABC123"));
    }

    #[test]
    fn explicit_disable_beats_tracking_id() {
        let file: ConfigFile =
            toml::from_str("[site]\ntitle = \"T\"\n[features]\nanalytics = false\n").unwrap();
        let env = EnvOverrides::from_vars([(ENV_ANALYTICS_ID, "G-ABC123")]);

        let config =
            SiteConfig::from_layers(file, &env, &CliSettings::default(), Path::new(".")).unwrap();

        assert!(!config.features.analytics);
    }

    #[test]
    fn layers_apply_in_precedence_order() {
        let file: ConfigFile = toml::from_str(
            "[site]\ntitle = \"T\"\nurl = \"https://file.example\"\n[paths]\noutput = \"out\"\n",
        )
        .unwrap();
        let env = EnvOverrides::from_vars([
            (ENV_SITE_URL, "https://env.example"),
            (ENV_OUTPUT_DIR, "/env/out"),
        ]);
        let cli = CliSettings {
            output_dir: Some(PathBuf::from("/cli/out")),
            minify: Some(false),
            ..Default::default()
        };

        let config = SiteConfig::from_layers(file, &env, &cli, Path::new("/base")).unwrap();

        assert_eq!(config.site.url, "https://env.example");
        assert_eq!(config.paths.output_dir, PathBuf::from("/cli/out"));
        assert!(!config.minify);
    }

    #[test]
    fn load_errors_on_missing_explicit_path() {
        let err = SiteConfig::load(
            Some(Path::new("/definitely/not/here/folio.toml")),
            &EnvOverrides::default(),
            &CliSettings::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn load_resolves_paths_against_config_dir() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        fs::write(&path, "[site]\ntitle = \"T\"\n[paths]\ncontent = \"posts\"\n").unwrap();

        let config =
            SiteConfig::load(Some(&path), &EnvOverrides::default(), &CliSettings::default())
                .unwrap();

        assert_eq!(config.paths.content_dir, temp.path().join("posts"));
    }

    #[test]
    fn absolute_url_check() {
        assert!(is_absolute_url("https://example.com"));
        assert!(is_absolute_url("http://localhost:8000/path"));
        assert!(!is_absolute_url("/relative"));
        assert!(!is_absolute_url("https://"));
        assert!(!is_absolute_url("example.com"));
        assert!(!is_absolute_url("https://example.com:99999"));
        assert!(!is_absolute_url("mailto:me@example.com"));
    }

    #[test]
    fn site_url_with_invalid_port_is_rejected() {
        let err = parse("[site]\ntitle = \"T\"\nurl = \"https://example.com:99999\"\n")
            .unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(ref msg) if msg.contains("site.url")),
            "Expected Validation, got {err:?}"
        );

        let err = parse(
            "[site]\ntitle = \"T\"\n[[external_links]]\nname = \"Me\"\nurl = \"https://me.example:0x50\"\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::RelativeExternalLink { .. }));
    }

    #[test]
    fn page_slug_must_be_lower_case() {
        let toml = "[site]\ntitle = \"T\"\n[[pages]]\nslug = \"/About\"\ntitle = \"About\"\nsource = \"about.mdx\"\n";

        let err = parse(toml).unwrap_err();

        assert!(
            matches!(err, ConfigError::Validation(ref msg) if msg.contains("`/about`")),
            "Expected Validation, got {err:?}"
        );
    }

    #[test]
    fn page_slug_cannot_leave_output_dir() {
        for slug in ["/../etc", "/notes//uses", "/notes/./uses", "/caf\u{e9}"] {
            let toml = format!(
                "[site]\ntitle = \"T\"\n[[pages]]\nslug = \"{slug}\"\ntitle = \"P\"\nsource = \"p.mdx\"\n"
            );
            assert!(
                matches!(parse(&toml), Err(ConfigError::Validation(_))),
                "{slug} should be rejected"
            );
        }

        let nested = "[site]\ntitle = \"T\"\n[[pages]]\nslug = \"/notes/uses\"\ntitle = \"Uses\"\nsource = \"uses.mdx\"\n";
        assert!(parse(nested).is_ok());
    }
}
