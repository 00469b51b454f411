use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Server settings. Every flag can also come from the environment (or a `.env` file).
#[derive(Clone, Debug, Parser)]
#[command(name = "fanflux", version, about = "FanFlux creator/fan platform backend")]
pub struct ServerConfig {
    /// Address the HTTP server listens on.
    #[arg(long, env = "FANFLUX_BIND", default_value = "0.0.0.0:8080")]
    pub bind: String,

    /// Directory holding the libmdbx environment.
    #[arg(long, env = "FANFLUX_DB_PATH", default_value = "./fanflux-data")]
    pub db_path: PathBuf,

    /// tracing EnvFilter directive, e.g. `info` or `fanflux_service=debug`.
    #[arg(long, env = "FANFLUX_LOG", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "FANFLUX_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Load the demo posts and articles into empty tables on startup.
    #[arg(long, env = "FANFLUX_SEED")]
    pub seed: bool,
}
