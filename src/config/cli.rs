use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, builder::BoolishValueParser};

/// Command-line arguments for the channelcast binary.
#[derive(Debug, Parser)]
#[command(name = "channelcast", version, about = "RSS 2.0 and Atom feed server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "CHANNELCAST_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Serve feeds over HTTP.
    Serve(Box<ServeArgs>),
    /// Render one feed to stdout (`news` for RSS, `news.atom` for Atom).
    Render(RenderArgs),
    /// Remove cached feed documents.
    #[command(name = "drop-cache")]
    DropCache(DropCacheArgs),
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct StorageOverrides {
    /// Override the directory holding channel definitions.
    #[arg(long = "channels-directory", value_name = "PATH")]
    pub channels_directory: Option<PathBuf>,

    /// Override the feed cache directory.
    #[arg(long = "cache-directory", value_name = "PATH")]
    pub cache_directory: Option<PathBuf>,

    /// Enable or disable the feed cache.
    #[arg(
        long = "cache-enabled",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub cache_enabled: Option<bool>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    #[command(flatten)]
    pub storage: StorageOverrides,

    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the graceful shutdown timeout.
    #[arg(long = "server-graceful-shutdown-seconds", value_name = "SECONDS")]
    pub server_graceful_shutdown_seconds: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Override the public base URL feeds are served under.
    #[arg(long = "site-public-url", value_name = "URL")]
    pub site_public_url: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct RenderArgs {
    #[command(flatten)]
    pub storage: StorageOverrides,

    /// Feed path segment, e.g. `news` or `news.atom`.
    #[arg(value_name = "SEGMENT")]
    pub segment: String,
}

#[derive(Debug, Args, Clone)]
pub struct DropCacheArgs {
    /// Override the feed cache directory.
    #[arg(long = "cache-directory", value_name = "PATH")]
    pub cache_directory: Option<PathBuf>,

    /// Only drop one format (rss|atom|json); all formats when omitted.
    #[arg(long = "format", value_name = "FORMAT")]
    pub format: Option<String>,

    /// Channel to drop; every cached channel when omitted.
    #[arg(value_name = "CHANNEL")]
    pub channel: Option<String>,
}
