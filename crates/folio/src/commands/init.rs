//! Scaffold a new blog.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use folio_config::CONFIG_FILENAME;

/// Run the init command in the working directory.
pub async fn run(yes: bool) -> Result<()> {
    tracing::info!("Initializing folio...");

    init_in(Path::new("."), yes)?;

    tracing::info!("Initialization complete!");
    tracing::info!("Run 'folio watch' to build and rebuild on every change.");

    Ok(())
}

/// Write the starter config and first post below `root`.
///
/// Existing files are left alone unless `overwrite` is set.
pub fn init_in(root: &Path, overwrite: bool) -> Result<()> {
    let files = [
        (root.join(CONFIG_FILENAME), DEFAULT_CONFIG),
        (
            root.join("content/posts/hello-world/index.mdx"),
            DEFAULT_POST,
        ),
        (root.join("content/pages/about.mdx"), DEFAULT_ABOUT),
    ];

    for (path, contents) in files {
        if path.exists() && !overwrite {
            tracing::warn!("{} already exists. Use --yes to overwrite.", path.display());
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Created {}", path.display());
    }

    Ok(())
}

const DEFAULT_CONFIG: &str = r##"# folio configuration

[site]
title = "My Blog"
# Absolute URL the site is served from; FOLIO_SITE_URL overrides it
url = "https://example.com"
description = "Notes and essays"
author = ""
language = "en"
theme_color = "#3498DB"
background_color = "#ffffff"

[[navigation]]
title = "Blog"
slug = "/blog"

[[navigation]]
title = "Tags"
slug = "/tags"

[[navigation]]
title = "About"
slug = "/about"

[[pages]]
slug = "/about"
title = "About"
source = "content/pages/about.mdx"

# [[external_links]]
# name = "GitHub"
# url = "https://github.com/you"

[features]
sitemap = true
manifest = true
rss = true
# Precache every page in a service worker
offline = false
# Analytics turns on once a tracking id is set, either below or through
# FOLIO_ANALYTICS_ID. Set to false to keep it off regardless.
# analytics = false

# [analytics]
# tracking_id = "G-XXXXXXX"

[paths]
content = "content/posts"
output = "public"

[build]
minify = true
"##;

const DEFAULT_POST: &str = r#"---
title: Hello, world
date: 2024-01-01
tags: [meta]
description: The first post on this blog.
---

# Hello, world

Every directory under `content/posts` with an `index.mdx` becomes a post.
The directory name is the post's URL.

## Frontmatter

Each post needs a `title` and a `date`. `tags` and `description` are
optional.
"#;

const DEFAULT_ABOUT: &str = r#"## About

Write something about yourself here.
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use folio_config::{CliSettings, EnvOverrides, SiteConfig};
    use folio_static::SiteBuilder;
    use tempfile::tempdir;

    #[test]
    fn scaffold_builds() {
        let temp = tempdir().unwrap();

        init_in(temp.path(), false).unwrap();

        let config = SiteConfig::load(
            Some(&temp.path().join(CONFIG_FILENAME)),
            &EnvOverrides::default(),
            &CliSettings::default(),
        )
        .unwrap();
        let report = SiteBuilder::new(&config).build().unwrap();

        assert_eq!(report.documents, 1);
        assert!(report.failures.is_empty());
        assert!(temp.path().join("public/hello-world/index.html").exists());
        assert!(temp.path().join("public/about/index.html").exists());
    }

    #[test]
    fn keeps_existing_files_without_overwrite() {
        let temp = tempdir().unwrap();
        let config = temp.path().join(CONFIG_FILENAME);
        fs::write(&config, "# mine").unwrap();

        init_in(temp.path(), false).unwrap();
        assert_eq!(fs::read_to_string(&config).unwrap(), "# mine");

        init_in(temp.path(), true).unwrap();
        assert!(fs::read_to_string(&config).unwrap().contains("[site]"));
    }
}
