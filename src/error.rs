//! Error types. Load errors are startup-fatal; classification itself never fails.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building the port role table or the fingerprint rule set.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Port key that is not an integer in 1..=65535
    #[error("invalid port key {key:?}: expected an integer between 1 and 65535")]
    InvalidPort { key: String },

    /// Same port declared more than once
    #[error("duplicate port {port} in port role table")]
    DuplicatePort { port: u16 },

    /// Fingerprint regex that does not compile
    #[error("invalid pattern in fingerprint rule #{index} ({vendor}): {source}")]
    InvalidPattern {
        index: usize,
        vendor: String,
        #[source]
        source: regex::Error,
    },
}

/// Errors raised while reading a rule file, OUI file or host evidence from disk.
#[derive(Debug, Error)]
pub enum RulesFileError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error(transparent)]
    Load(#[from] LoadError),
}
