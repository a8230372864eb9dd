// Public modules
pub mod capture;
pub mod logger;
pub mod ui;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get the application name
pub fn app_name() -> &'static str {
    "Region Lapse"
}

/// Get the application version
pub fn app_version() -> &'static str {
    VERSION
}
