use anyhow::Result;
use log::{debug, error, info, LevelFilter};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::sync::Once;
use std::time::{SystemTime, UNIX_EPOCH};

// Ensure the logger is only initialized once
static INIT: Once = Once::new();

/// Initialize the logger, writing to `log_dir` when given and stderr otherwise
pub fn init_logger(log_dir: Option<&str>, verbose: bool) -> Result<()> {
    let mut outcome = Ok(());

    INIT.call_once(|| {
        let log_level = if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };

        let mut builder = env_logger::Builder::new();
        builder.filter_level(log_level);
        // RUST_LOG still wins for anyone narrowing a single module
        builder.parse_default_env();
        builder.format(|buf, record| {
            writeln!(
                buf,
                "[{} {} {}:{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args()
            )
        });

        match log_dir.map(open_log_file) {
            Some(Ok(file)) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Some(Err(e)) => {
                eprintln!("Warning: {}; logging to stderr", e);
                builder.target(env_logger::Target::Stderr);
            }
            None => {
                builder.target(env_logger::Target::Stderr);
            }
        }

        if let Err(e) = builder.try_init() {
            outcome = Err(anyhow::anyhow!("Failed to initialize logger: {}", e));
            return;
        }

        info!("Logger initialized at level {:?}", log_level);
        log_system_info();
    });

    outcome
}

/// Create `dir` and a fresh timestamped log file inside it
fn open_log_file(dir: &str) -> Result<File> {
    let log_dir_path = Path::new(dir);
    if !log_dir_path.exists() {
        fs::create_dir_all(log_dir_path)
            .map_err(|e| anyhow::anyhow!("Failed to create log directory {}: {}", dir, e))?;
    }

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let log_path = log_dir_path.join(format!("regionlapse_{}.log", timestamp));

    File::create(&log_path)
        .map_err(|e| anyhow::anyhow!("Failed to create log file at {:?}: {}", log_path, e))
}

/// Log version, OS and enabled features once at startup
fn log_system_info() {
    info!("{} v{}", crate::app_name(), crate::VERSION);

    #[cfg(target_os = "windows")]
    info!("Operating System: Windows");
    #[cfg(target_os = "macos")]
    info!("Operating System: macOS");
    #[cfg(target_os = "linux")]
    info!("Operating System: Linux");

    #[cfg(feature = "gui")]
    info!("Feature: GUI enabled");
    #[cfg(not(feature = "gui"))]
    info!("Feature: GUI disabled");
}

/// Log performance metrics for an operation
pub fn log_performance(operation: &str, duration_ms: f64) {
    debug!("PERF: {} took {:.2}ms", operation, duration_ms);
}

/// Log capture events
pub fn log_capture_event(region: &str, width: u32, height: u32) {
    debug!("CAPTURE: {} ({}x{})", region, width, height);
}

/// Log errors with context
pub fn log_error<E: std::fmt::Display>(context: &str, error: E) {
    error!("ERROR in {}: {}", context, error);
}
