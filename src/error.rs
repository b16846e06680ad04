//! Error types
//!
//! Import failures carry the notice shown to the user as their Display text.

use thiserror::Error;

/// Why an imported JSON document was refused
#[derive(Debug, Error)]
pub enum ImportError {
    /// The file content is not JSON at all
    #[error("No se pudo leer el JSON.")]
    Unparsable(#[source] serde_json::Error),
    /// Valid JSON, but not an object with a `cards` array
    #[error("JSON inválido. Debe tener {{ \"cards\": [ ... ] }}")]
    Malformed,
}

/// Failure writing to the persistent slot
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,
    #[error("storage write failed: {0}")]
    Write(String),
    #[error("could not serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Crate-wide error
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, Error>;
