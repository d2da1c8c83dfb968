//! Web-app manifest.

use folio_config::SiteConfig;
use serde::Serialize;

use super::Artifact;

pub const MANIFEST_PATH: &str = "manifest.json";

#[derive(Debug, Serialize)]
struct WebManifest<'a> {
    name: &'a str,
    short_name: &'a str,
    description: &'a str,
    start_url: &'a str,
    background_color: &'a str,
    theme_color: &'a str,
    display: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    icons: Vec<Icon<'a>>,
}

#[derive(Debug, Serialize)]
struct Icon<'a> {
    src: &'a str,
    sizes: &'static str,
    #[serde(rename = "type")]
    mime: &'static str,
}

/// Build `manifest.json` if enabled in config.
pub fn emit(config: &SiteConfig) -> Option<Artifact> {
    if !config.features.manifest {
        return None;
    }

    let icons = config
        .site
        .image
        .as_deref()
        .map(|src| Icon {
            src,
            sizes: "512x512",
            mime: image_mime(src),
        })
        .into_iter()
        .collect();

    let manifest = WebManifest {
        name: &config.site.title,
        short_name: &config.manifest.short_name,
        description: &config.site.description,
        start_url: &config.manifest.start_url,
        background_color: &config.theme.background_color,
        theme_color: &config.theme.theme_color,
        display: &config.manifest.display,
        icons,
    };

    // Serializing plain strings cannot fail
    let json = serde_json::to_string_pretty(&manifest).unwrap_or_default();
    Some(Artifact::new(MANIFEST_PATH, json))
}

fn image_mime(src: &str) -> &'static str {
    let ext = src.rsplit('.').next().unwrap_or("").to_ascii_lowercase();
    match ext.as_str() {
        "svg" => "image/svg+xml",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        _ => "image/png",
    }
}
