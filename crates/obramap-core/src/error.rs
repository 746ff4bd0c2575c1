//! Error types for obramap

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObramapError {
    // Upstream API errors
    #[error("Upstream request failed for {url}: {reason}")]
    UpstreamRequest { url: String, reason: String },

    #[error("Upstream responded with status {status} for page {page}")]
    UpstreamStatus { status: u16, page: u32 },

    #[error("Unexpected upstream payload: {reason}")]
    UpstreamShape { reason: String },

    // Storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Obra not found: {id_unico}")]
    ObraNotFound { id_unico: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, ObramapError>;
