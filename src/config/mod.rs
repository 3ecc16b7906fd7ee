use std::fmt;

use clap::Parser;

/// API key used when none is configured. Never acceptable outside development.
pub const DEFAULT_API_KEY: &str = "default_dev_key_change_in_production";

/// Service configuration.
///
/// Built once at startup from flags and environment (a `.env` file is loaded
/// first), then handed to the guard and the store.
#[derive(Clone, Parser)]
#[command(name = "preapproval")]
#[command(about = "Mortgage pre-approval API")]
pub struct Config {
    /// HTTP server listen address
    #[arg(long, default_value = "0.0.0.0:8000", env = "PREAPPROVAL_LISTEN_ADDR")]
    pub listen_addr: String,

    /// Secret expected in the X-API-Key header
    #[arg(long, default_value = DEFAULT_API_KEY, env = "API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// SQLite database URL
    #[arg(
        long,
        default_value = "sqlite://mortgage_applications.db",
        env = "DATABASE_URL"
    )]
    pub database_url: String,

    /// Maximum pooled database connections
    #[arg(long, default_value = "5", env = "PREAPPROVAL_DB_MAX_CONNECTIONS")]
    pub db_max_connections: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Enable graceful shutdown
    #[arg(long, default_value = "true", env = "PREAPPROVAL_GRACEFUL_SHUTDOWN")]
    pub graceful_shutdown: bool,
}

impl Config {
    /// Returns true if the built-in development key is in use.
    pub fn uses_default_api_key(&self) -> bool {
        self.api_key == DEFAULT_API_KEY
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("listen_addr", &self.listen_addr)
            .field("api_key", &"<redacted>")
            .field("database_url", &self.database_url)
            .field("db_max_connections", &self.db_max_connections)
            .field("log_level", &self.log_level)
            .field("graceful_shutdown", &self.graceful_shutdown)
            .finish()
    }
}
