//! Rebuild on change.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use folio_config::{CliSettings, SiteConfig, CONFIG_FILENAME};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc as async_mpsc;

use super::build::{build_site, load_config};

/// Events that trigger a rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A post or page source changed
    Content(PathBuf),

    /// The configuration file changed
    Config(PathBuf),
}

/// Sources the watcher listens to.
#[derive(Debug, Clone)]
struct WatchSet {
    config_file: PathBuf,
    output_dir: PathBuf,
}

impl WatchSet {
    fn classify(&self, path: &Path, kind: &notify::EventKind) -> Option<WatchEvent> {
        use notify::EventKind;

        if !matches!(
            kind,
            EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
        ) {
            return None;
        }

        // Our own writes
        if path.starts_with(&self.output_dir) {
            return None;
        }

        if path.file_name() == self.config_file.file_name() {
            return Some(WatchEvent::Config(path.to_path_buf()));
        }

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if ext == "mdx" || ext == "md" {
            return Some(WatchEvent::Content(path.to_path_buf()));
        }

        // A removed directory takes its documents with it
        matches!(kind, EventKind::Remove(_)).then(|| WatchEvent::Content(path.to_path_buf()))
    }
}

/// File watcher for the content tree and config file.
struct FileWatcher {
    _watcher: RecommendedWatcher,
}

impl FileWatcher {
    /// Start watching. Returns the watcher and a channel to receive events.
    fn new(
        paths: &[PathBuf],
        set: WatchSet,
    ) -> Result<(Self, async_mpsc::Receiver<WatchEvent>), std::io::Error> {
        let (sync_tx, sync_rx) = mpsc::channel();
        let (async_tx, async_rx) = async_mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: Result<notify::Event, _>| {
            if let Ok(event) = res {
                let _ = sync_tx.send(event);
            }
        })
        .map_err(std::io::Error::other)?;

        for path in paths {
            if path.exists() {
                watcher
                    .watch(path, RecursiveMode::Recursive)
                    .map_err(std::io::Error::other)?;
            }
        }

        std::thread::spawn(move || {
            while let Ok(event) = sync_rx.recv() {
                for path in &event.paths {
                    if let Some(e) = set.classify(path, &event.kind) {
                        if async_tx.blocking_send(e).is_err() {
                            return;
                        }
                    }
                }
            }
        });

        Ok((Self { _watcher: watcher }, async_rx))
    }
}

/// Everything a watcher should observe for `config`.
fn watch_paths(config: &SiteConfig, config_file: &Path) -> Vec<PathBuf> {
    let mut paths = vec![config.paths.content_dir.clone()];
    paths.extend(config.pages.iter().map(|page| page.source.clone()));
    if config_file.exists() {
        paths.push(config_file.to_path_buf());
    }
    paths
}

/// Run the watch command.
pub async fn run(config_path: Option<&Path>, cli: CliSettings) -> Result<()> {
    let config_file = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

    let mut config = load_config(config_path, &cli)?;
    if let Err(e) = build_site(&config) {
        tracing::error!("{:#}", e);
    }

    loop {
        let set = WatchSet {
            config_file: config_file.clone(),
            output_dir: config.paths.output_dir.clone(),
        };
        let (watcher, mut rx) = FileWatcher::new(&watch_paths(&config, &config_file), set)
            .context("Failed to start file watcher")?;

        tracing::info!(
            "Watching {} for changes (Ctrl+C to stop)",
            config.paths.content_dir.display()
        );

        let reload = loop {
            let first = tokio::select! {
                event = rx.recv() => match event {
                    Some(event) => event,
                    None => return Ok(()),
                },
                _ = tokio::signal::ctrl_c() => return Ok(()),
            };

            // Collapse bursts from editors that write in several steps
            let mut events = vec![first];
            let deadline = tokio::time::Instant::now() + Duration::from_millis(100);
            while let Ok(Some(event)) =
                tokio::time::timeout_at(deadline, rx.recv()).await
            {
                events.push(event);
            }

            let reload = events.iter().any(|e| matches!(e, WatchEvent::Config(_)));
            for event in &events {
                tracing::debug!("Change: {:?}", event);
            }
            if reload {
                break true;
            }

            tracing::info!("Content changed, rebuilding...");
            if let Err(e) = build_site(&config) {
                tracing::error!("{:#}", e);
            }
        };

        drop(watcher);

        if reload {
            tracing::info!("Configuration changed, reloading...");
            match load_config(config_path, &cli) {
                Ok(new_config) => config = new_config,
                Err(e) => {
                    tracing::error!("{:#}", e);
                    tracing::warn!("Keeping the previous configuration");
                }
            }
            if let Err(e) = build_site(&config) {
                tracing::error!("{:#}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RemoveKind};
    use notify::EventKind;
    use std::fs;
    use tempfile::tempdir;

    fn set() -> WatchSet {
        WatchSet {
            config_file: PathBuf::from("/blog/folio.toml"),
            output_dir: PathBuf::from("/blog/public"),
        }
    }

    #[test]
    fn classifies_sources() {
        let modify = EventKind::Modify(ModifyKind::Any);

        assert_eq!(
            set().classify(Path::new("/blog/content/posts/a/index.mdx"), &modify),
            Some(WatchEvent::Content(PathBuf::from("/blog/content/posts/a/index.mdx")))
        );
        assert_eq!(
            set().classify(Path::new("/blog/folio.toml"), &modify),
            Some(WatchEvent::Config(PathBuf::from("/blog/folio.toml")))
        );
        assert_eq!(
            set().classify(Path::new("/blog/content/posts/a/photo.png"), &modify),
            None
        );
    }

    #[test]
    fn ignores_output_and_access_events() {
        assert_eq!(
            set().classify(
                Path::new("/blog/public/a/index.md"),
                &EventKind::Create(CreateKind::File)
            ),
            None
        );
        assert_eq!(
            set().classify(
                Path::new("/blog/content/posts/a/index.mdx"),
                &EventKind::Access(notify::event::AccessKind::Any)
            ),
            None
        );
    }

    #[test]
    fn removed_directory_triggers_rebuild() {
        assert_eq!(
            set().classify(
                Path::new("/blog/content/posts/old"),
                &EventKind::Remove(RemoveKind::Folder)
            ),
            Some(WatchEvent::Content(PathBuf::from("/blog/content/posts/old")))
        );
    }

    #[tokio::test]
    async fn watches_file_changes() {
        let temp = tempdir().unwrap();
        let set = WatchSet {
            config_file: temp.path().join("folio.toml"),
            output_dir: temp.path().join("public"),
        };

        let (watcher, mut rx) = FileWatcher::new(&[temp.path().to_path_buf()], set).unwrap();

        // Give inotify time to set up
        tokio::time::sleep(Duration::from_millis(100)).await;

        fs::write(temp.path().join("post.mdx"), "# Created").unwrap();

        let event = tokio::time::timeout(Duration::from_secs(3), rx.recv()).await;

        drop(watcher);

        assert!(event.is_ok(), "timeout waiting for file watch event");
        assert!(event.unwrap().is_some(), "channel should not be closed");
    }
}
