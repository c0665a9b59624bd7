mod app;
mod backend;
mod error;
mod model;
mod settings;
mod util;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use backend::{HttpBackend, SharedBackend};
use settings::Settings;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Base URL of the analysis backend (overrides the settings file)
    #[arg(long)]
    backend_url: Option<String>,

    /// TOML settings file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(base_url) = args.backend_url {
        settings.backend.base_url = base_url;
    }

    let http = HttpBackend::new(&settings.backend)?;
    info!(backend = %http.base_url(), "starting viewer");
    let backend: SharedBackend = Arc::new(http);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "RippleScope",
        options,
        Box::new(move |cc| Ok(Box::new(app::RippleApp::new(cc, settings, backend)))),
    )
    .map_err(|error| anyhow!("viewer exited with an error: {error}"))
}
