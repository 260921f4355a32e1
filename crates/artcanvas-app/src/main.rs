//! Main application entry point.

use artcanvas_app::{App, AppConfig, AppResult, Session};
use clap::Parser;
use std::path::PathBuf;

/// Replay an Art Canvas input session and export the final frame.
#[derive(Debug, Parser)]
#[command(name = "artcanvas", version)]
struct Args {
    /// Session file with the actions to replay.
    session: PathBuf,
    /// Host configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// PNG output path, overriding the configuration.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Stats JSON output path, overriding the configuration.
    #[arg(long)]
    stats: Option<PathBuf>,
}

fn run(args: Args) -> AppResult<()> {
    let mut config = match &args.config {
        Some(path) => AppConfig::from_json_file(path)?,
        None => AppConfig::default(),
    };
    if let Some(output) = args.output {
        config.output_png = Some(output);
    }
    if args.stats.is_some() {
        config.output_stats = args.stats;
    }

    let session = Session::from_json_file(&args.session)?;
    let mut app = App::with_config(config)?;
    let report = app.run(&session)?;
    log::info!(
        "Replayed {} actions: {} frames, {} segments",
        session.actions.len(),
        report.frames,
        report.segments
    );
    app.export()
}

fn main() {
    env_logger::init();
    log::info!("Starting Art Canvas");

    if let Err(e) = run(Args::parse()) {
        log::error!("{}", e);
        eprintln!("artcanvas: {e}");
        std::process::exit(1);
    }
}
