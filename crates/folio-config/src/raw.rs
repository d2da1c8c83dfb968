//! On-disk shape of `folio.toml`.
//!
//! Every value is optional here; defaults are applied when the layers are
//! merged into a [`SiteConfig`](crate::SiteConfig).

use std::path::PathBuf;

use serde::Deserialize;

/// Configuration file structure (folio.toml).
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub site: SiteSection,
    pub navigation: Vec<NavLink>,
    pub external_links: Vec<ExternalLink>,
    pub features: FeaturesSection,
    pub analytics: AnalyticsSection,
    pub manifest: ManifestSection,
    pub pages: Vec<PageSection>,
    pub paths: PathsSection,
    pub feed: FeedSection,
    pub build: BuildSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    pub title: Option<String>,
    pub title_alt: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub image: Option<String>,
    pub language: Option<String>,
    pub theme_color: Option<String>,
    pub background_color: Option<String>,
}

/// A navigation entry, rendered in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, serde::Serialize)]
pub struct NavLink {
    pub title: String,
    pub slug: String,
}

/// A link to another site, rendered in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, serde::Serialize)]
pub struct ExternalLink {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeaturesSection {
    pub sitemap: Option<bool>,
    pub manifest: Option<bool>,
    pub offline: Option<bool>,
    pub analytics: Option<bool>,
    pub rss: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyticsSection {
    pub tracking_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManifestSection {
    pub short_name: Option<String>,
    pub start_url: Option<String>,
    pub display: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageSection {
    pub slug: String,
    pub title: String,
    pub source: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsSection {
    pub content: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeedSection {
    pub path: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildSection {
    pub minify: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_empty_file() {
        let file: ConfigFile = toml::from_str("").unwrap();
        assert!(file.site.title.is_none());
        assert!(file.navigation.is_empty());
    }

    #[test]
    fn rejects_unknown_feature() {
        let result: Result<ConfigFile, _> = toml::from_str("[features]\nsitemapp = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn parses_arrays_of_tables() {
        let toml = r#"
[[navigation]]
title = "Blog"
slug = "/blog"

[[navigation]]
title = "About"
slug = "/about"

[[pages]]
slug = "/about"
title = "About"
source = "pages/about.mdx"
"#;
        let file: ConfigFile = toml::from_str(toml).unwrap();
        assert_eq!(file.navigation.len(), 2);
        assert_eq!(file.navigation[1].slug, "/about");
        assert_eq!(file.pages[0].source, PathBuf::from("pages/about.mdx"));
    }
}
