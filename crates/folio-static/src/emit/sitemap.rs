//! Sitemap generation.
//!
//! Generates a sitemap.xml file listing all pages for search engine indexing.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/generators/</loc>
//!     <lastmod>2019-07-14</lastmod>
//!   </url>
//! </urlset>
//! ```

use std::collections::HashMap;

use folio_config::SiteConfig;

use super::{page_paths, Artifact};
use crate::document::Document;

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

pub const SITEMAP_PATH: &str = "sitemap.xml";
pub const ROBOTS_PATH: &str = "robots.txt";

/// Build the sitemap if enabled in config.
///
/// Lists the home page, every static page, and every document. An empty
/// document set still yields a well-formed `<urlset>`.
pub fn emit(config: &SiteConfig, documents: &[Document]) -> Option<Artifact> {
    if !config.features.sitemap {
        return None;
    }

    let lastmod: HashMap<String, String> = documents
        .iter()
        .map(|doc| (doc.url_path(), doc.date.format("%Y-%m-%d").to_string()))
        .collect();

    let mut xml = String::with_capacity(4096);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
    xml.push('\n');

    for path in page_paths(config, documents) {
        xml.push_str("  <url>\n");
        xml.push_str(&format!(
            "    <loc>{}</loc>\n",
            escape_xml(&config.absolute_url(&path))
        ));
        if let Some(date) = lastmod.get(&path) {
            xml.push_str(&format!("    <lastmod>{date}</lastmod>\n"));
        }
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");

    Some(Artifact::new(SITEMAP_PATH, xml))
}

/// `robots.txt` pointing crawlers at the sitemap; only when the sitemap exists.
pub fn emit_robots(config: &SiteConfig) -> Option<Artifact> {
    if !config.features.sitemap {
        return None;
    }

    Some(Artifact::new(
        ROBOTS_PATH,
        format!(
            "User-agent: *\nAllow: /\nSitemap: {}\n",
            config.absolute_url(SITEMAP_PATH)
        ),
    ))
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::sample;
    use std::path::Path;

    fn config(extra: &str) -> SiteConfig {
        SiteConfig::parse(
            &format!("[site]\ntitle = \"T\"\nurl = \"https://example.com\"\n{extra}"),
            Path::new("."),
        )
        .unwrap()
    }

    #[test]
    fn lists_documents_with_lastmod() {
        let docs = vec![sample("generators", "2019-07-14")];

        let sitemap = emit(&config(""), &docs).unwrap();

        assert!(sitemap.contents.contains("<loc>https://example.com/</loc>"));
        assert!(sitemap
            .contents
            .contains("<loc>https://example.com/generators/</loc>\n    <lastmod>2019-07-14</lastmod>"));
    }

    #[test]
    fn empty_document_set_is_well_formed() {
        let sitemap = emit(&config(""), &[]).unwrap();

        assert!(sitemap.contents.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(sitemap.contents.contains(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#)));
        assert!(sitemap.contents.trim_end().ends_with("</urlset>"));
        assert_eq!(sitemap.contents.matches("<url>").count(), 1);
        assert!(!sitemap.contents.contains("<lastmod>"));
    }

    #[test]
    fn disabled_sitemap_emits_nothing() {
        let config = config("[features]\nsitemap = false\n");
        let docs = vec![sample("a", "2020-01-01")];

        assert!(emit(&config, &docs).is_none());
        assert!(emit_robots(&config).is_none());
    }

    #[test]
    fn robots_points_at_sitemap() {
        let robots = emit_robots(&config("")).unwrap();
        assert!(robots
            .contents
            .contains("Sitemap: https://example.com/sitemap.xml"));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a&b<c>"), "a&amp;b&lt;c&gt;");
        assert_eq!(escape_xml("\"'"), "&quot;&apos;");
    }
}
