//! The media store seam.
//!
//! Content records never hold file bytes. Uploads go to a [`MediaStore`],
//! which hands back a public URL and a deletion handle; the handle is the
//! only way to release the file again.
//!
//! Two backends ship with the crate:
//! - [`LocalMediaStore`]: files under a directory, served by the API under `/media`.
//! - [`S3MediaStore`]: any S3-compatible bucket.

use async_trait::async_trait;
use campus_core::media::{FileRef, ResourceKind};
use campus_core::types::Timestamp;

pub mod config;
pub mod error;
pub mod handle;
pub mod local;
pub mod reconcile;
pub mod s3;

pub use config::{MediaBackend, MediaConfig, S3Settings};
pub use error::MediaError;
pub use local::LocalMediaStore;
pub use reconcile::find_orphans;
pub use s3::S3MediaStore;

/// A file to be stored, already classified by the caller.
#[derive(Debug, Clone)]
pub struct MediaUpload {
    /// Owning department; becomes the first segment of the handle.
    pub department: String,
    /// Category slug; becomes the second segment of the handle.
    pub category: String,
    /// Client-supplied file name, used only for its extension.
    pub file_name: String,
    pub content_type: String,
    pub kind: ResourceKind,
    pub bytes: Vec<u8>,
}

/// An object currently held by a store, as reported by [`MediaStore::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub handle: String,
    pub last_modified: Timestamp,
}

#[async_trait]
pub trait MediaStore: Send + Sync + 'static {
    /// Short backend name for logs (`local`, `s3`).
    fn backend_tag(&self) -> &'static str;

    /// Store a file and return the reference to embed in a record.
    async fn upload(&self, upload: MediaUpload) -> Result<FileRef, MediaError>;

    /// Release a file. Deleting a handle that no longer exists succeeds.
    async fn delete(&self, deletion_handle: &str) -> Result<(), MediaError>;

    /// Every object the store currently holds.
    async fn list(&self) -> Result<Vec<StoredObject>, MediaError>;
}
