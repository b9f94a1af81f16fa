//! Remote document storage.
//!
//! A repository on GitHub doubles as a tiny JSON document database. Every write
//! is a compare-and-swap against the file's current revision token: callers
//! read the file, compute a new document and write it back together with the
//! revision they read. Two requests racing on the same path can still lose an
//! update when both read before either writes and the remote accepts both.

mod github;
mod memory;

pub use github::*;
pub use memory::*;

use async_trait::async_trait;
use serde_json::Value;

/// Path of the reservation list.
pub const RESERVATIONS_PATH: &str = "data/reservations.json";
/// Path of the batch catalog.
pub const BATCHES_PATH: &str = "data/batches.json";
/// Path of the site copy.
pub const CONTENT_PATH: &str = "data/content.json";

/// A JSON document together with the revision it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteFile {
    pub path: String,
    pub content: Value,
    pub revision: String,
}

/// Errors raised by a [`RemoteFileStore`].
#[derive(Debug)]
pub enum StoreError {
    /// The revision supplied with a write is no longer current.
    Conflict { path: String },
    /// The stored payload is not valid base64 JSON.
    Decode { path: String, message: String },
    /// The remote API failed or could not be reached.
    Failure(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Conflict { path } => {
                write!(f, "{} was modified since it was read", path)
            }
            StoreError::Decode { path, message } => {
                write!(f, "Could not decode {}: {}", path, message)
            }
            StoreError::Failure(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for StoreError {}

/// Read/write access to JSON documents keyed by path.
#[async_trait]
pub trait RemoteFileStore: Send + Sync {
    /// Fetch a document. `Ok(None)` means the path does not exist yet.
    async fn read(&self, path: &str) -> Result<Option<RemoteFile>, StoreError>;

    /// Fetch only the current revision of a path, without decoding its content.
    async fn revision(&self, path: &str) -> Result<Option<String>, StoreError>;

    /// Replace a document if `revision` is still current.
    ///
    /// `None` creates the file; it conflicts when the path already exists.
    async fn write(
        &self,
        path: &str,
        content: &Value,
        revision: Option<&str>,
        message: &str,
    ) -> Result<(), StoreError>;
}

/// Overwrite a document with `content`, whatever it currently holds.
///
/// The revision is fetched immediately before the write, so the conflict
/// window is only as wide as the two requests.
pub async fn replace_document(
    store: &dyn RemoteFileStore,
    path: &str,
    content: &Value,
    message: &str,
) -> Result<(), StoreError> {
    let revision = store.revision(path).await?;
    store.write(path, content, revision.as_deref(), message).await?;
    tracing::info!(path, "Document replaced");
    Ok(())
}
