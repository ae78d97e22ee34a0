//! Remote-procedure boundary: process a file that lives in an object store.
//!
//! A caller uploads a document to storage, then invokes the processor with
//! the stored file's id:
//!
//! ```json
//! { "fileID": "uploads/report.docx", "enableBionic": true }
//! ```
//!
//! The processor downloads the object, runs the pipeline, deletes the
//! object once the document was produced and answers with the document
//! fields plus `enableBionic` echoed back. The object is left in place when
//! processing fails so the caller can inspect or retry it.
//!
//! Storage is abstracted by [`ObjectStore`]; [`LocalObjectStore`] serves a
//! directory on disk.

use crate::config::ProcessingConfig;
use crate::error::ReaderError;
use crate::output::Document;
use crate::process::process;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::path::{Component, Path, PathBuf};
use tracing::{info, warn};

/// Invocation payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvokeRequest {
    #[serde(rename = "fileID")]
    pub file_id: String,

    /// Defaults to `false` when absent.
    #[serde(rename = "enableBionic", default)]
    pub enable_bionic: bool,
}

/// Invocation result: the document fields, flattened, plus the echoed flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeResponse {
    #[serde(flatten)]
    pub document: Document,

    #[serde(rename = "enableBionic")]
    pub enable_bionic: bool,
}

/// A downloaded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    /// Name used for extension dispatch.
    pub filename: String,
}

/// Storage the processor downloads from and cleans up.
pub trait ObjectStore: Send + Sync {
    fn download(
        &self,
        file_id: &str,
    ) -> impl Future<Output = Result<StoredObject, ReaderError>> + Send;

    fn delete(&self, file_id: &str) -> impl Future<Output = Result<(), ReaderError>> + Send;
}

/// Process the object named by `request`.
///
/// The request's `enableBionic` overrides `config.bionic_enabled`.
pub async fn invoke<S: ObjectStore>(
    store: &S,
    request: &InvokeRequest,
    config: &ProcessingConfig,
) -> Result<InvokeResponse, ReaderError> {
    info!(
        "Invoke: fileID={} enableBionic={}",
        request.file_id, request.enable_bionic
    );
    let object = store.download(&request.file_id).await?;

    let mut config = config.clone();
    config.bionic_enabled = request.enable_bionic;
    let document = process(object.bytes, &object.filename, &config).await?;

    store.delete(&request.file_id).await?;

    Ok(InvokeResponse {
        document,
        enable_bionic: request.enable_bionic,
    })
}

/// Objects stored as files under a root directory.
///
/// A file id is a relative path below the root; absolute paths and `..`
/// components are rejected.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, file_id: &str) -> Result<PathBuf, ReaderError> {
        let rel = Path::new(file_id);
        let safe = !file_id.is_empty()
            && rel
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !safe {
            return Err(ReaderError::InvalidInput {
                input: file_id.to_string(),
            });
        }
        Ok(self.root.join(rel))
    }
}

impl ObjectStore for LocalObjectStore {
    async fn download(&self, file_id: &str) -> Result<StoredObject, ReaderError> {
        let path = self.resolve(file_id)?;
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| ReaderError::ObjectStore {
                file_id: file_id.to_string(),
                detail: e.to_string(),
            })?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(StoredObject { bytes, filename })
    }

    async fn delete(&self, file_id: &str) -> Result<(), ReaderError> {
        let path = self.resolve(file_id)?;
        tokio::fs::remove_file(&path).await.map_err(|e| {
            warn!("Failed to delete {}: {}", path.display(), e);
            ReaderError::ObjectStore {
                file_id: file_id.to_string(),
                detail: e.to_string(),
            }
        })
    }
}
