use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "DocApp";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_PORT: u16 = 8080;

/// Get the application data directory (~/DocApp)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("DocApp")
}

/// Path to the SQLite database. `DOCAPP_DB` overrides the default location.
pub fn db_path() -> PathBuf {
    match std::env::var("DOCAPP_DB") {
        Ok(p) if !p.is_empty() => PathBuf::from(p),
        _ => app_data_dir().join("docapp.db"),
    }
}

/// Address the HTTP server binds to. `DOCAPP_PORT` overrides the port.
pub fn bind_addr() -> SocketAddr {
    let port = std::env::var("DOCAPP_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    SocketAddr::from(([0, 0, 0, 0], port))
}

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    format!("info,{}=debug", env!("CARGO_PKG_NAME"))
}
