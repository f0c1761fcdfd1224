//! Error type shared by the loaders, config and report writers.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// The common error type used by this crate.
///
/// Only input that cannot be read at all is an error. Malformed lines and
/// empty result sets are counted and logged by the caller instead.
#[derive(Error, Debug)]
pub enum GlossaError {
    /// A required input file does not exist.
    #[error("required input file not found: {}", path.display())]
    MissingInput {
        /// Path that was looked up.
        path: PathBuf,
    },

    /// Any other I/O failure on a named file.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },

    /// The TOML configuration could not be parsed.
    #[error("invalid configuration in {}: {source}", path.display())]
    Config {
        /// Configuration file.
        path: PathBuf,
        /// Parser failure.
        #[source]
        source: toml::de::Error,
    },

    /// A paragraph partition map could not be parsed.
    #[error("invalid partition map in {}: {source}", path.display())]
    PartitionMap {
        /// Map file.
        path: PathBuf,
        /// Parser failure.
        #[source]
        source: serde_json::Error,
    },

    /// A partition declaration is unusable.
    #[error("invalid partition '{name}' in scheme '{scheme}': {reason}")]
    InvalidPartition {
        /// Scheme being built.
        scheme: String,
        /// Offending partition.
        name: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A signature declaration is unusable.
    #[error("invalid signature '{name}': {reason}")]
    InvalidSignature {
        /// Offending signature.
        name: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A signature's terms did not compile.
    #[error("signature '{name}' does not compile: {source}")]
    SignaturePattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// A scheme name was requested that the configuration does not declare.
    #[error("unknown partition scheme: {0}")]
    UnknownScheme(String),

    /// Tabular report output failed.
    #[error("CSV output failed: {0}")]
    Csv(#[from] csv::Error),

    /// JSON output failed.
    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl GlossaError {
    /// Wraps an I/O error, mapping `NotFound` to [`GlossaError::MissingInput`].
    pub fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            GlossaError::MissingInput {
                path: path.to_path_buf(),
            }
        } else {
            GlossaError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, GlossaError>;

/// Reads a whole file, mapping failures to [`GlossaError`].
pub(crate) fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| GlossaError::io(path, e))
}

/// Writes a whole file, mapping failures to [`GlossaError`].
pub(crate) fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|e| GlossaError::io(path, e))
}
