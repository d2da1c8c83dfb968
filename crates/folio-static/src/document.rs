//! Publishable documents.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use folio_mdx::{parse_mdx, slug_from_path, FrontmatterError, ParseError, TocEntry};

use crate::collector::{DocumentError, MalformedFrontMatterError};

/// An article with validated frontmatter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Route slug derived from the content path
    pub slug: String,
    pub title: String,
    pub date: NaiveDate,
    pub tags: BTreeSet<String>,
    pub description: Option<String>,
    /// First prose paragraph, used when `description` is absent
    pub excerpt: String,
    /// MDX body after the frontmatter block
    pub body: String,
    pub toc: Vec<TocEntry>,
    pub source_path: PathBuf,
}

impl Document {
    /// Build a document from the source text of `path`.
    ///
    /// `relative` is the path below the content root and determines the slug.
    pub fn parse(path: &Path, relative: &Path, source: &str) -> Result<Self, DocumentError> {
        let slug = slug_from_path(relative).ok_or_else(|| DocumentError::NoSlug {
            path: path.to_path_buf(),
        })?;

        let malformed = |reason: FrontmatterError| MalformedFrontMatterError {
            path: path.to_path_buf(),
            reason,
        };

        let parsed = parse_mdx(source).map_err(|e| match e {
            ParseError::Frontmatter(reason) => malformed(reason),
        })?;
        let meta = parsed
            .frontmatter
            .ok_or(FrontmatterError::Missing)
            .and_then(|fm| fm.into_meta())
            .map_err(malformed)?;

        Ok(Self {
            slug,
            title: meta.title,
            date: meta.date,
            tags: meta.tags,
            description: meta.description,
            excerpt: parsed.excerpt,
            body: parsed.content,
            toc: parsed.toc,
            source_path: path.to_path_buf(),
        })
    }

    /// Site-relative URL path, e.g. `python-generators/`.
    pub fn url_path(&self) -> String {
        format!("{}/", self.slug)
    }

    /// Description if set, otherwise the excerpt.
    pub fn summary(&self) -> &str {
        self.description.as_deref().unwrap_or(&self.excerpt)
    }
}

/// Documents ordered newest first; equal dates fall back to slug order.
pub fn by_date_desc(documents: &[Document]) -> Vec<&Document> {
    let mut sorted: Vec<&Document> = documents.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));
    sorted
}

#[cfg(test)]
pub(crate) fn sample(slug: &str, date: &str) -> Document {
    Document {
        slug: slug.to_string(),
        title: format!("Post {slug}"),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        tags: BTreeSet::new(),
        description: None,
        excerpt: format!("About {slug}."),
        body: format!("# {slug}\n\nAbout {slug}."),
        toc: Vec::new(),
        source_path: PathBuf::from(format!("content/{slug}/index.mdx")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_document_from_subtree() {
        let source = "---\ntitle: Itertools\ndate: 2020-02-02\ntags: [python]\n---\n\nChaining iterables.\n";

        let doc = Document::parse(
            Path::new("content/Itertools Tour/index.mdx"),
            Path::new("Itertools Tour/index.mdx"),
            source,
        )
        .unwrap();

        assert_eq!(doc.slug, "itertools-tour");
        assert_eq!(doc.title, "Itertools");
        assert_eq!(doc.url_path(), "itertools-tour/");
        assert!(doc.tags.contains("python"));
        assert_eq!(doc.summary(), "Chaining iterables.");
    }

    #[test]
    fn missing_block_is_malformed() {
        let err = Document::parse(
            Path::new("content/a.mdx"),
            Path::new("a.mdx"),
            "# No frontmatter",
        )
        .unwrap_err();

        assert!(matches!(
            err,
            DocumentError::MalformedFrontMatter(MalformedFrontMatterError {
                reason: FrontmatterError::Missing,
                ..
            })
        ));
    }

    #[test]
    fn sorts_newest_first() {
        let docs = vec![
            sample("b", "2020-01-01"),
            sample("a", "2020-01-01"),
            sample("c", "2021-05-05"),
        ];

        let slugs: Vec<_> = by_date_desc(&docs).iter().map(|d| d.slug.as_str()).collect();

        assert_eq!(slugs, vec!["c", "a", "b"]);
    }
}
