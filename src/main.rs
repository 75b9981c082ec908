use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use cotton_atlas::app::run_app;
use cotton_atlas::config::ViewerConfig;
use cotton_atlas::logging::init_logging;
use cotton_atlas::timeline::export::export_timeline;
use cotton_atlas::timeline::Catalog;

#[derive(Parser, Debug)]
#[command(name = "cotton_atlas")]
#[command(about = "Step through the history of the global cotton trade on a world map")]
struct Args {
    /// Event catalog as JSON (uses the bundled catalog if not specified)
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Viewer settings as JSON; command-line flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Id of the event to open on
    #[arg(short, long)]
    start_at: Option<u64>,

    /// Map zoom level (1-8)
    #[arg(short, long)]
    zoom: Option<f64>,

    /// Hide the map legend
    #[arg(long)]
    no_legend: bool,

    /// Export the timeline to a text file (e.g., "chronicle.txt") and exit
    #[arg(long)]
    export_timeline: Option<PathBuf>,

    /// Write logs to this file (logging is off otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log level filter, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    init_logging(args.log_file.as_deref(), &args.log_level)?;

    let catalog = match &args.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin()?,
    };
    info!(
        events = catalog.len(),
        routes = catalog.routes().len(),
        regions = catalog.regions().len(),
        "catalog ready"
    );

    if let Some(ref path) = args.export_timeline {
        export_timeline(&catalog, path)?;
        println!("Exported timeline to: {}", path.display());
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(id) = args.start_at {
        config.start_at = Some(id);
    }
    if let Some(zoom) = args.zoom {
        config.zoom = zoom;
    }
    if args.no_legend {
        config.show_legend = false;
    }

    run_app(&catalog, &config.normalized())
}
