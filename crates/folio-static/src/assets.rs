//! Theme stylesheet generation.

use folio_config::Theme;

/// Stylesheet location relative to the output directory.
pub const STYLESHEET_PATH: &str = "assets/main.css";

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the main CSS file with the configured theme colours.
    pub fn generate_css(theme: &Theme) -> String {
        format!(
            ":root {{\n  --theme: {};\n  --background: {};\n}}\n{}",
            theme.theme_color, theme.background_color, BLOG_CSS
        )
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const BLOG_CSS: &str = r#"
* {
  box-sizing: border-box;
}

body {
  margin: 0;
  font-family: system-ui, -apple-system, sans-serif;
  background: var(--background);
  color: #222;
  line-height: 1.65;
}

.site-header {
  display: flex;
  flex-wrap: wrap;
  align-items: baseline;
  justify-content: space-between;
  gap: 1rem;
  padding: 1.25rem 2rem;
  border-bottom: 3px solid var(--theme);
}

.site-title {
  font-weight: 700;
  font-size: 1.25rem;
  color: inherit;
  text-decoration: none;
}

.site-nav ul {
  display: flex;
  gap: 1rem;
  list-style: none;
  margin: 0;
  padding: 0;
}

.site-nav a {
  color: inherit;
  text-decoration: none;
}

.site-nav a:hover,
.content a {
  color: var(--theme);
}

main {
  max-width: 46rem;
  margin: 0 auto;
  padding: 2rem 1.25rem 4rem;
}

.post-meta {
  color: #666;
  font-size: 0.9rem;
}

.tags {
  display: flex;
  flex-wrap: wrap;
  gap: 0.5rem;
  list-style: none;
  padding: 0;
}

.tags a,
.tags span {
  padding: 0.125rem 0.5rem;
  border-radius: 999px;
  background: #f0f0f0;
  color: inherit;
  font-size: 0.8rem;
  text-decoration: none;
}

.post-list {
  list-style: none;
  padding: 0;
}

.post-list li {
  margin-bottom: 1.5rem;
}

.toc {
  border-left: 3px solid var(--theme);
  padding-left: 1rem;
  margin: 1.5rem 0;
}

.toc ul {
  list-style: none;
  padding: 0;
}

.toc-level-3 {
  margin-left: 1rem;
}

.content pre {
  background: #f6f8fa;
  border-radius: 0.5rem;
  padding: 1rem;
  overflow-x: auto;
  font-size: 0.875rem;
}

.content code {
  font-family: ui-monospace, monospace;
}

.site-footer {
  text-align: center;
  padding: 2rem;
  color: #666;
  font-size: 0.875rem;
}

.site-footer ul {
  display: flex;
  justify-content: center;
  gap: 1rem;
  list-style: none;
  padding: 0;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn theme() -> Theme {
        Theme {
            theme_color: "#3498DB".to_string(),
            background_color: "#ffffff".to_string(),
        }
    }

    #[test]
    fn injects_theme_colours() {
        let css = AssetPipeline::generate_css(&theme());

        assert!(css.contains("--theme: #3498DB;"));
        assert!(css.contains("--background: #ffffff;"));
    }

    #[test]
    fn minifies_generated_css() {
        let css = AssetPipeline::generate_css(&theme());

        let minified = AssetPipeline::minify_css(&css).unwrap();

        assert!(minified.len() < css.len());
    }
}
