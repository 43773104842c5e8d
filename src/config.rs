//! Command-line configuration and logging setup.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One JSON array with every host
    Json,
    /// One JSON object per line
    Lines,
}

#[derive(Debug, Parser)]
#[command(name = "device-classifier")]
#[command(about = "Classify network devices from open ports and TLS/HTTP text evidence")]
pub struct Config {
    /// Path to the YAML rules file (port_roles + fingerprint_patterns)
    #[arg(long, env = "DEVICE_CLASSIFIER_RULES", default_value = "mappings.yaml")]
    pub rules: PathBuf,

    /// Optional OUI listing used to annotate reports with the MAC vendor
    #[arg(long)]
    pub oui: Option<PathBuf>,

    /// JSON file with scanned hosts; reads stdin when omitted
    #[arg(long)]
    pub evidence: Option<PathBuf>,

    /// Only search the first N bytes of each text artifact
    #[arg(long)]
    pub max_text_len: Option<usize>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Log filter directive, e.g. "info" or "device_classifier=debug"
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    /// Validate the rules file only (no classification)
    #[arg(long)]
    pub verify: bool,
}

/// Install the global subscriber. Logs go to stderr so stdout stays machine-readable.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}
