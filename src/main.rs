use clap::Parser;
use farm_boundary::config::Config;
use farm_boundary::report::{build_report, write_report};
use std::path::Path;

/// Compute bounding boxes, areas and imagery parameters for farm boundaries.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input config file.
    #[arg(short, long)]
    config_filepath: String,
}

fn try_main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::load(Path::new(&args.config_filepath))?;

    let report = build_report(&config)?;
    log::info!("Computed reports for {} farms", report.farms.len());

    if let Some(report_path) = &config.report_path {
        log::info!("Writing report to {:?}", report_path);
        write_report(&report, report_path)?;
    }
    Ok(())
}

fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    env_logger::init();

    if let Err(e) = try_main() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1)
    }
}
