//! procdeck - A terminal dashboard for supervised services
//!
//! This is the binary entry point: argument parsing, settings resolution and
//! the choice between the TUI and headless runners.

mod headless;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{eyre, Result};

use procdeck_app::config::{self, Settings};
use procdeck_app::Engine;
use procdeck_client::{ApiClient, Mode};
use procdeck_core::prelude::*;

/// procdeck - A terminal dashboard for supervised services
#[derive(Parser, Debug)]
#[command(name = "procdeck")]
#[command(about = "A terminal dashboard for supervised services", long_about = None)]
struct Args {
    /// Backend address, overrides the config file
    #[arg(long, value_name = "HOST:PORT")]
    server: Option<String>,

    /// Talk to the development backend on localhost:8080
    #[arg(long, conflicts_with = "server")]
    dev: bool,

    /// Path to the config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run without the TUI, printing registry snapshots as NDJSON
    #[arg(long)]
    headless: bool,

    /// Write a commented default config file and exit
    #[arg(long)]
    init_config: bool,
}

impl Args {
    /// Fold CLI overrides into the loaded settings.
    fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(server) = &self.server {
            settings.server.address = server.clone();
            settings.server.mode = Mode::Prod;
        }
        if self.dev {
            settings.server.mode = Mode::Dev;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let config_path = match args.config.clone().or_else(config::default_config_path) {
        Some(path) => path,
        None => return Err(eyre!("No config directory on this platform; pass --config")),
    };

    if args.init_config {
        if config::init_config_file(&config_path)? {
            println!("Wrote {}", config_path.display());
        } else {
            println!("{} already exists", config_path.display());
        }
        return Ok(());
    }

    procdeck_core::logging::init()?;

    let mut settings = config::load_settings(&config_path);
    args.apply_overrides(&mut settings);

    let endpoint = settings.server.endpoint()?;
    info!(
        "Backend {} ({} mode)",
        endpoint.authority(),
        settings.server.mode
    );
    let client = ApiClient::new(endpoint.clone(), settings.server.request_timeout())?;

    let mut engine = Engine::new(client, settings, endpoint.authority());
    engine.start();

    let result = if args.headless {
        headless::run_headless(&mut engine).await
    } else {
        procdeck_tui::run(&mut engine).await
    };

    engine.shutdown().await;
    info!("procdeck exiting");

    result?;
    Ok(())
}
