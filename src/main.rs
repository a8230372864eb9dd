use anyhow::Result;
use clap::{Arg, Command};
use log::{error, info};
use std::path::PathBuf;

fn main() -> Result<()> {
    let matches = Command::new("regionlapse")
        .version(regionlapse::VERSION)
        .about("Select a screen region and save it to disk at a fixed interval")
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .takes_value(false)
                .help("Log at debug level"),
        )
        .arg(
            Arg::new("log-dir")
                .long("log-dir")
                .takes_value(true)
                .value_name("DIR")
                .help("Also write a log file into this directory"),
        )
        .arg(
            Arg::new("output-dir")
                .long("output-dir")
                .takes_value(true)
                .value_name("DIR")
                .help("Directory captures are written to (default: ./out or the saved setting)"),
        )
        .get_matches();

    let log_dir = matches.value_of("log-dir");
    let verbose = matches.is_present("verbose");

    if let Err(e) = regionlapse::logger::init_logger(log_dir, verbose) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }

    let output_override = matches.value_of("output-dir").map(PathBuf::from);

    info!("Starting {} GUI", regionlapse::app_name());
    regionlapse::ui::run_ui(output_override).map_err(|e| {
        error!("GUI failed: {}", e);
        e
    })
}
