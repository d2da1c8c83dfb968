//! Frontmatter extraction and parsing.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_yaml::Value;

/// Raw frontmatter as written at the top of an MDX file.
///
/// Every key is optional at this stage so that a missing `title` or `date`
/// surfaces as [`FrontmatterError::MissingField`] instead of a YAML error.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Frontmatter {
    /// Article title (required)
    #[serde(default)]
    pub title: Option<Value>,

    /// Publication date, ISO-8601 (required)
    #[serde(default)]
    pub date: Option<Value>,

    /// Free-form tags; scalars such as `2019` count as text
    #[serde(default)]
    pub tags: Vec<Value>,

    /// Short summary used by the feed
    #[serde(default)]
    pub description: Option<String>,
}

/// Validated frontmatter of a publishable document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMeta {
    pub title: String,
    pub date: NaiveDate,
    pub tags: BTreeSet<String>,
    pub description: Option<String>,
}

impl Frontmatter {
    /// Check required fields and normalise values.
    pub fn into_meta(self) -> Result<DocumentMeta, FrontmatterError> {
        let title = self
            .title
            .as_ref()
            .and_then(scalar_to_string)
            .filter(|t| !t.trim().is_empty())
            .ok_or(FrontmatterError::MissingField("title"))?;

        let raw_date = self
            .date
            .as_ref()
            .and_then(scalar_to_string)
            .filter(|d| !d.trim().is_empty())
            .ok_or(FrontmatterError::MissingField("date"))?;
        let date = parse_date(&raw_date)?;

        let tags = self
            .tags
            .iter()
            .filter_map(scalar_to_string)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();

        Ok(DocumentMeta {
            title: title.trim().to_string(),
            date,
            tags,
            description: self.description.filter(|d| !d.trim().is_empty()),
        })
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parse an ISO-8601 calendar date or datetime, keeping only the date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, FrontmatterError> {
    let raw = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Ok(datetime.date_naive());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(datetime.date());
    }

    Err(FrontmatterError::InvalidDate(raw.to_string()))
}

/// Extract frontmatter from MDX content.
///
/// Returns the parsed frontmatter and the remaining content after the frontmatter block.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    // Editors on Windows like to prepend a byte order mark
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Ok((None, source));
    }

    // Find the closing ---
    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    // The closing fence may be followed by trailing dashes or spaces
    let remaining = match remaining.find('\n') {
        Some(eol) if remaining[..eol].trim_matches(['-', ' ', '\r']).is_empty() => {
            &remaining[eol + 1..]
        }
        None if remaining.trim_matches(['-', ' ', '\r']).is_empty() => "",
        _ => remaining,
    };

    let frontmatter = if yaml_content.is_empty() {
        Frontmatter::default()
    } else {
        serde_yaml::from_str(yaml_content)
            .map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?
    };

    Ok((Some(frontmatter), remaining.trim_start()))
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Missing frontmatter block")]
    Missing,

    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),

    #[error("Missing required frontmatter field `{0}`")]
    MissingField(&'static str),

    #[error("Invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_valid_frontmatter() {
        let source = r#"---
title: Iterators all the way down
date: 2019-06-01
tags:
  - python
  - generators
---

# Iterators
"#;

        let (fm, content) = extract_frontmatter(source).unwrap();
        let meta = fm.unwrap().into_meta().unwrap();

        assert_eq!(meta.title, "Iterators all the way down");
        assert_eq!(meta.date, NaiveDate::from_ymd_opt(2019, 6, 1).unwrap());
        assert_eq!(
            meta.tags.into_iter().collect::<Vec<_>>(),
            vec!["generators".to_string(), "python".to_string()]
        );
        assert!(content.starts_with("# Iterators"));
    }

    #[test]
    fn handles_no_frontmatter() {
        let source = "# Just Markdown\n\nNo frontmatter here.";

        let (fm, content) = extract_frontmatter(source).unwrap();

        assert!(fm.is_none());
        assert_eq!(content, source);
    }

    #[test]
    fn errors_on_unclosed_frontmatter() {
        let source = "---\ntitle: Test\n# No closing";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::Unclosed)));
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let source = "---\ntitle: [invalid yaml\n---\n";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }

    #[test]
    fn missing_date_is_reported() {
        let source = "---\ntitle: Undated\n---\nbody";

        let (fm, _) = extract_frontmatter(source).unwrap();
        let err = fm.unwrap().into_meta().unwrap_err();

        assert_eq!(err, FrontmatterError::MissingField("date"));
    }

    #[test]
    fn missing_title_is_reported() {
        let source = "---\ndate: \"2020-01-01\"\n---\nbody";

        let (fm, _) = extract_frontmatter(source).unwrap();
        let err = fm.unwrap().into_meta().unwrap_err();

        assert_eq!(err, FrontmatterError::MissingField("title"));
    }

    #[test]
    fn empty_block_lacks_title() {
        let (fm, content) = extract_frontmatter("---\n---\nbody").unwrap();

        assert_eq!(content, "body");
        assert_eq!(
            fm.unwrap().into_meta().unwrap_err(),
            FrontmatterError::MissingField("title")
        );
    }

    #[test]
    fn skips_byte_order_mark() {
        let source = "\u{feff}---\ntitle: A\ndate: 2020-01-01\n---\nx";

        let (fm, content) = extract_frontmatter(source).unwrap();

        assert_eq!(fm.unwrap().into_meta().unwrap().title, "A");
        assert_eq!(content, "x");
    }

    #[test]
    fn numeric_tags_are_text() {
        let source = "---\ntitle: Retro\ndate: 2020-01-01\ntags: [2019, python, true]\n---\n";

        let (fm, _) = extract_frontmatter(source).unwrap();
        let meta = fm.unwrap().into_meta().unwrap();

        assert_eq!(
            meta.tags.into_iter().collect::<Vec<_>>(),
            vec!["2019".to_string(), "python".to_string(), "true".to_string()]
        );
    }

    #[test]
    fn parses_datetime_dates() {
        assert_eq!(
            parse_date("2021-03-04T10:15:00Z").unwrap(),
            NaiveDate::from_ymd_opt(2021, 3, 4).unwrap()
        );
        assert_eq!(
            parse_date("2021-03-04T10:15:00").unwrap(),
            NaiveDate::from_ymd_opt(2021, 3, 4).unwrap()
        );
        assert!(matches!(
            parse_date("last tuesday"),
            Err(FrontmatterError::InvalidDate(_))
        ));
    }
}
