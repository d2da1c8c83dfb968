//! Slug derivation for documents and headings.

use std::path::{Component, Path};
use std::sync::LazyLock;

use deunicode::deunicode;
use regex::Regex;

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug pattern"));

/// Convert text to a URL-safe slug.
///
/// Transliterates to ASCII, lower-cases, and collapses every run of
/// non-alphanumeric characters into a single hyphen. Leading and trailing
/// hyphens are dropped.
pub fn slugify(text: &str) -> String {
    let lower = deunicode(text).to_lowercase();
    NON_ALPHANUMERIC
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// Derive a document slug from its path relative to the content root.
///
/// `python-generators/index.mdx` and `python-generators.mdx` both map to
/// `python-generators`; nested directories are joined with a hyphen.
/// Returns `None` when nothing slug-worthy remains (e.g. a root `index.mdx`).
pub fn slug_from_path(relative: &Path) -> Option<String> {
    let without_ext = relative.with_extension("");
    let subtree = match without_ext.file_name().and_then(|n| n.to_str()) {
        Some("index") => without_ext.parent().unwrap_or(Path::new("")).to_path_buf(),
        _ => without_ext,
    };

    let joined = subtree
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");

    let slug = slugify(&joined);
    (!slug.is_empty()).then_some(slug)
}
