use std::path::PathBuf;

/// Failure taxonomy shared by every retrieval operation.
///
/// Nothing in this crate catches or retries; every failure surfaces to the
/// immediate caller as one of these variants.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid or missing arguments, raised before any I/O.
    #[error("invalid usage: {0}")]
    Usage(String),

    /// Network or HTTP failure on an outbound request.
    #[error("transport failure, error({0})")]
    Transport(#[from] reqwest::Error),

    /// Response or file contents did not match the expected JSON shape.
    #[error("failed to parse JSON, error({0})")]
    Parse(#[from] serde_json::Error),

    /// An expected local submission file was absent.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Any other filesystem failure.
    #[error("io failure, error({0})")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
