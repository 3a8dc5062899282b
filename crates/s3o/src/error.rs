//! Error types for model loading.

use thiserror::Error;

/// Errors that can occur while loading a model.
#[derive(Debug, Error)]
pub enum Error {
    /// No file with this name exists.
    #[error("could not find model file '{0}'")]
    MissingAsset(String),

    /// The file exists but could not be read.
    #[error("failed to read model file '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not a valid model.
    #[error("corrupt model file '{name}': {source}")]
    Decode {
        name: String,
        #[source]
        source: s3o_decode::DecodeError,
    },
}

/// Result type for loading operations.
pub type Result<T> = std::result::Result<T, Error>;
