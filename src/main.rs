mod app;

use std::path::PathBuf;

use anyhow::{Context, anyhow};
use clap::Parser;
use relgraph::EngineConfig;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "relgraph=info";

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Graph JSON with `nodes` and `links` arrays.
    graph: PathBuf,

    /// Engine settings as JSON; omitted fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    hide_labels: bool,

    /// Seed for the initial placement jitter.
    #[arg(long)]
    seed: Option<u64>,

    /// Tracing filter directives. Takes precedence over `RUST_LOG`.
    #[arg(long)]
    log_filter: Option<String>,
}

fn init_tracing(directives: Option<&str>) {
    let filter = match directives {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_filter.as_deref());

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading --config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if args.hide_labels {
        config.view.show_labels = false;
    }
    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(graph = %args.graph.display(), seed, "starting relgraph");

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "relgraph",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::RelGraphApp::new(
                cc,
                args.graph.clone(),
                config.clone(),
                seed,
            )))
        }),
    )
    .map_err(|err| anyhow!("failed to run the viewer: {err}"))
}
