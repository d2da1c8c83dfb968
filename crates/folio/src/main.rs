//! folio CLI - build a static blog from a folder of MDX posts.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use folio_config::CliSettings;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Build a static blog from a folder of MDX posts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to folio.toml config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create folio.toml and a first post
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Build the static site
    Build {
        #[command(flatten)]
        overrides: BuildArgs,
    },

    /// Preview the built site
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve (defaults to the configured output directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Build, then rebuild whenever content or config changes
    Watch {
        #[command(flatten)]
        overrides: BuildArgs,
    },
}

#[derive(clap::Args)]
struct BuildArgs {
    /// Output directory (defaults to config or "public")
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Content directory (defaults to config or "content/posts")
    #[arg(long)]
    content: Option<PathBuf>,

    /// Public site URL
    #[arg(long)]
    site_url: Option<String>,

    /// Skip minification
    #[arg(long)]
    no_minify: bool,
}

impl BuildArgs {
    fn into_settings(self) -> CliSettings {
        CliSettings {
            output_dir: self.output,
            content_dir: self.content,
            site_url: self.site_url,
            minify: if self.no_minify { Some(false) } else { None },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbosity flag
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt().with_env_filter(filter).with_target(false).init();

    let config = cli.config.as_deref();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(yes).await?;
        }
        Commands::Build { overrides } => {
            commands::build::run(config, overrides.into_settings()).await?;
        }
        Commands::Serve { port, dir, no_open } => {
            commands::serve::run(config, port, dir, !no_open).await?;
        }
        Commands::Watch { overrides } => {
            commands::watch::run(config, overrides.into_settings()).await?;
        }
    }

    Ok(())
}
