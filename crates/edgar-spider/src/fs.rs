use crate::error::{Error, Result};
use std::path::Path;
use tracing::trace;

/// Reads a `.json` file from `path`.
///
/// A missing file maps to [`Error::NotFound`]; any other filesystem failure
/// to [`Error::Io`].
pub async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    trace!("reading file path: {}", path.display());
    let file = tokio::fs::read(path).await.map_err(|err| match err.kind() {
        std::io::ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
        _ => Error::Io(err),
    })?;
    trace!("file read; deserializing bytes ...");
    let data: T = serde_json::from_slice(&file)?;
    Ok(data)
}
