//! Preview server command.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::Router;
use folio_config::CliSettings;
use tower_http::services::ServeDir;

use super::build::load_config;

/// Run the serve command.
pub async fn run(
    config_path: Option<&Path>,
    port: u16,
    dir: Option<PathBuf>,
    open_browser: bool,
) -> Result<()> {
    let dir = match dir {
        Some(dir) => dir,
        None => load_config(config_path, &CliSettings::default())?.paths.output_dir,
    };

    if !dir.exists() {
        anyhow::bail!(
            "Directory not found: {}. Run 'folio build' first.",
            dir.display()
        );
    }

    let addr: SocketAddr = format!("127.0.0.1:{}", port)
        .parse()
        .context("Invalid address")?;

    tracing::info!("Serving {} at http://{}", dir.display(), addr);

    let app = Router::new().fallback_service(ServeDir::new(&dir));

    let listener = tokio::net::TcpListener::bind(addr).await?;

    if open_browser {
        let url = format!("http://{}", addr);
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;

    Ok(())
}
