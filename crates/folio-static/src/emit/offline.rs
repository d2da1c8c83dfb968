//! Offline-cache service worker.

use folio_config::SiteConfig;

use super::{page_paths, Artifact};
use crate::assets::STYLESHEET_PATH;
use crate::document::Document;

pub const SERVICE_WORKER_PATH: &str = "sw.js";

/// Build `sw.js` if offline caching is enabled.
///
/// The cache name is a content hash of the precache list and documents, so
/// an edited site evicts the previous cache on activation.
pub fn emit(config: &SiteConfig, documents: &[Document]) -> Option<Artifact> {
    if !config.features.offline {
        return None;
    }

    let mut precache: Vec<String> = page_paths(config, documents)
        .into_iter()
        .map(|path| format!("/{path}"))
        .collect();
    precache.push(format!("/{STYLESHEET_PATH}"));

    let list = serde_json::to_string(&precache).unwrap_or_else(|_| "[]".to_string());

    let mut hasher = blake3::Hasher::new();
    hasher.update(list.as_bytes());
    for doc in documents {
        hasher.update(doc.date.to_string().as_bytes());
        hasher.update(doc.body.as_bytes());
    }
    let cache_name = format!("folio-{}", &hasher.finalize().to_hex()[..16]);

    Some(Artifact::new(
        SERVICE_WORKER_PATH,
        SERVICE_WORKER
            .replace("__CACHE_NAME__", &cache_name)
            .replace("__PRECACHE__", &list),
    ))
}

const SERVICE_WORKER: &str = r#"const CACHE = "__CACHE_NAME__";
const PRECACHE = __PRECACHE__;

self.addEventListener("install", (event) => {
  event.waitUntil(caches.open(CACHE).then((cache) => cache.addAll(PRECACHE)));
  self.skipWaiting();
});

self.addEventListener("activate", (event) => {
  event.waitUntil(
    caches.keys().then((keys) =>
      Promise.all(keys.filter((key) => key !== CACHE).map((key) => caches.delete(key)))
    )
  );
  self.clients.claim();
});

self.addEventListener("fetch", (event) => {
  if (event.request.method !== "GET") return;
  event.respondWith(
    caches.match(event.request).then((cached) => cached || fetch(event.request))
  );
});
"#;
