//! MDX parsing for folio.
//!
//! This crate extracts YAML frontmatter from MDX articles, validates the
//! required `title` and `date` keys, derives route slugs from content paths,
//! and renders the markdown body to HTML.

pub mod frontmatter;
pub mod parser;
pub mod slug;

pub use frontmatter::{DocumentMeta, Frontmatter, FrontmatterError};
pub use parser::{parse_mdx, render_html, ParseError, ParsedDoc, TocEntry};
pub use slug::{slug_from_path, slugify};
