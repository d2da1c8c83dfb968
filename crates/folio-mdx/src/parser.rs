//! MDX document parser.

use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};

use crate::frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};
use crate::slug::slugify;

/// Maximum excerpt length in characters.
const EXCERPT_LEN: usize = 200;

/// A parsed MDX document.
#[derive(Debug, Clone)]
pub struct ParsedDoc {
    /// Parsed frontmatter (if present)
    pub frontmatter: Option<Frontmatter>,

    /// Markdown content (without frontmatter)
    pub content: String,

    /// Table of contents entries
    pub toc: Vec<TocEntry>,

    /// Plain text of the first prose paragraph
    pub excerpt: String,
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// Errors that can occur when parsing MDX.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Parse an MDX document.
///
/// Extracts frontmatter, generates a table of contents and an excerpt.
/// The body itself is kept verbatim.
pub fn parse_mdx(source: &str) -> Result<ParsedDoc, ParseError> {
    let (frontmatter, content) = extract_frontmatter(source)?;

    let mut toc = Vec::new();
    let mut excerpt: Option<String> = None;

    let mut current_heading: Option<(u8, String)> = None; // (level, text)
    let mut current_paragraph: Option<String> = None;

    for event in Parser::new_ext(content, markdown_options()) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current_heading = Some((level as u8, String::new()));
            }

            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = current_heading.take() {
                    let id = slugify(&title);
                    toc.push(TocEntry { title, id, level });
                }
            }

            Event::Start(Tag::Paragraph) if excerpt.is_none() => {
                current_paragraph = Some(String::new());
            }

            Event::End(TagEnd::Paragraph) => {
                if let Some(text) = current_paragraph.take() {
                    let text = text.trim();
                    // ESM lines in MDX parse as paragraphs
                    if !text.is_empty() && !is_esm(text) {
                        excerpt = Some(truncate(text, EXCERPT_LEN));
                    }
                }
            }

            Event::Text(text) | Event::Code(text) => {
                if let Some((_, ref mut heading_text)) = current_heading {
                    heading_text.push_str(&text);
                } else if let Some(ref mut paragraph) = current_paragraph {
                    paragraph.push_str(&text);
                }
            }

            Event::SoftBreak | Event::HardBreak => {
                if let Some(ref mut paragraph) = current_paragraph {
                    paragraph.push(' ');
                }
            }

            _ => {}
        }
    }

    Ok(ParsedDoc {
        frontmatter,
        content: content.to_string(),
        toc,
        excerpt: excerpt.unwrap_or_default(),
    })
}

/// Render markdown to HTML, giving every heading an anchor id.
///
/// Ids match the ones produced for [`ParsedDoc::toc`].
pub fn render_html(content: &str) -> String {
    let mut events: Vec<Event> = Parser::new_ext(content, markdown_options()).collect();

    for i in 0..events.len() {
        if !matches!(events[i], Event::Start(Tag::Heading { id: None, .. })) {
            continue;
        }
        let anchor = slugify(&heading_text(&events[i + 1..]));
        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            *id = Some(CowStr::from(anchor));
        }
    }

    let mut html_output = String::new();
    html::push_html(&mut html_output, events.into_iter());
    html_output
}

fn heading_text(events: &[Event]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::End(TagEnd::Heading(_)) => break,
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            _ => {}
        }
    }
    text
}

fn is_esm(text: &str) -> bool {
    text.starts_with("import ") || text.starts_with("export ")
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    match cut.rfind(' ') {
        Some(pos) => format!("{}…", &cut[..pos]),
        None => format!("{cut}…"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_complete_mdx() {
        let source = r#"---
title: Generators
date: 2019-07-14
---

import Callout from '../components/callout'

# Generators

A generator is a lazy iterator.

```python
def count():
    yield 1
```

## The `send` method

Coroutines, almost.
"#;

        let doc = parse_mdx(source).unwrap();

        assert!(doc.frontmatter.is_some());
        assert_eq!(doc.toc.len(), 2);
        assert_eq!(doc.toc[0].title, "Generators");
        assert_eq!(doc.toc[0].level, 1);
        assert_eq!(doc.toc[0].id, "generators");
        assert_eq!(doc.toc[1].title, "The send method");
        assert_eq!(doc.toc[1].id, "the-send-method");
        assert_eq!(doc.excerpt, "A generator is a lazy iterator.");
    }

    #[test]
    fn parses_without_frontmatter() {
        let source = "# Just Markdown\n\nNo frontmatter.";

        let doc = parse_mdx(source).unwrap();

        assert!(doc.frontmatter.is_none());
        assert_eq!(doc.toc.len(), 1);
        assert_eq!(doc.toc[0].title, "Just Markdown");
        assert_eq!(doc.excerpt, "No frontmatter.");
    }

    #[test]
    fn renders_heading_anchors() {
        let html = render_html("## Lazy Evaluation\n\nText");

        assert!(html.contains(r#"<h2 id="lazy-evaluation">Lazy Evaluation</h2>"#));
        assert!(html.contains("<p>Text</p>"));
    }

    #[test]
    fn truncates_long_excerpts_on_word_boundary() {
        let long = "word ".repeat(100);
        let cut = truncate(long.trim(), 20);

        assert!(cut.ends_with('…'));
        assert!(cut.chars().count() <= 21);
    }
}
