//! In-memory document store.
//!
//! Selected with `EGGS_STORE=memory` for local development, and used by the
//! tests. Writes follow
//! the same compare-and-swap rules as the GitHub Contents API.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{RemoteFile, RemoteFileStore, StoreError};

#[derive(Debug, Clone)]
struct StoredDocument {
    content: Value,
    revision: String,
}

/// A [`RemoteFileStore`] held in process memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, StoredDocument>>,
    next_revision: AtomicU64,
    writes: AtomicUsize,
    fail_next_write: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn mint_revision(&self) -> String {
        let n = self.next_revision.fetch_add(1, Ordering::SeqCst) + 1;
        format!("rev-{}", n)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, StoredDocument>> {
        self.documents.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
impl MemoryStore {
    /// Put a document in place without counting it as a write.
    pub fn seed(&self, path: &str, content: Value) {
        let revision = self.mint_revision();
        self.lock()
            .insert(path.to_string(), StoredDocument { content, revision });
    }

    /// Make the next write fail with a conflict, as if another writer got there first.
    pub fn fail_next_write(&self) {
        self.fail_next_write.store(true, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteFileStore for MemoryStore {
    async fn read(&self, path: &str) -> Result<Option<RemoteFile>, StoreError> {
        Ok(self.lock().get(path).map(|doc| RemoteFile {
            path: path.to_string(),
            content: doc.content.clone(),
            revision: doc.revision.clone(),
        }))
    }

    async fn revision(&self, path: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock().get(path).map(|doc| doc.revision.clone()))
    }

    async fn write(
        &self,
        path: &str,
        content: &Value,
        revision: Option<&str>,
        message: &str,
    ) -> Result<(), StoreError> {
        if self.fail_next_write.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Conflict {
                path: path.to_string(),
            });
        }

        let mut documents = self.lock();

        let current = documents.get(path).map(|doc| doc.revision.as_str());
        if current != revision {
            return Err(StoreError::Conflict {
                path: path.to_string(),
            });
        }

        let new_revision = self.mint_revision();
        documents.insert(
            path.to_string(),
            StoredDocument {
                content: content.clone(),
                revision: new_revision,
            },
        );
        self.writes.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(path, message, "Stored document in memory");

        Ok(())
    }
}
