//! Filesystem-backed media store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use campus_core::media::FileRef;
use chrono::{DateTime, Utc};

use crate::error::MediaError;
use crate::handle::{new_handle, validate_handle};
use crate::{MediaStore, MediaUpload, StoredObject};

/// Stores files under `root`; the handle is the path relative to it.
///
/// Public URLs are `{public_base_url}/{handle}`. The API serves `root`
/// under `/media` when this backend is active.
pub struct LocalMediaStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, handle: &str) -> Result<PathBuf, MediaError> {
        validate_handle(handle)?;
        Ok(self.root.join(handle))
    }

    fn handle_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<&str> = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<_>>()?;
        Some(parts.join("/"))
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    fn backend_tag(&self) -> &'static str {
        "local"
    }

    async fn upload(&self, upload: MediaUpload) -> Result<FileRef, MediaError> {
        let handle = new_handle(&upload.department, &upload.category, &upload.file_name);
        let path = self.path_for(&handle)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &upload.bytes).await?;

        tracing::debug!(
            handle = %handle,
            size = upload.bytes.len(),
            "Stored media file on local disk",
        );

        Ok(FileRef {
            url: format!("{}/{}", self.public_base_url, handle),
            deletion_handle: handle,
            resource_kind: upload.kind,
        })
    }

    async fn delete(&self, deletion_handle: &str) -> Result<(), MediaError> {
        let path = self.path_for(deletion_handle)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(handle = %deletion_handle, "Media file already absent");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> Result<Vec<StoredObject>, MediaError> {
        let mut objects = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            while let Some(entry) = entries.next_entry().await? {
                let metadata = entry.metadata().await?;
                let path = entry.path();
                if metadata.is_dir() {
                    pending.push(path);
                    continue;
                }
                let Some(handle) = self.handle_for(&path) else {
                    continue;
                };
                let last_modified: DateTime<Utc> = metadata.modified()?.into();
                objects.push(StoredObject {
                    handle,
                    last_modified,
                });
            }
        }

        objects.sort_by(|a, b| a.handle.cmp(&b.handle));
        Ok(objects)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use campus_core::media::ResourceKind;

    use super::*;

    fn upload(department: &str, file_name: &str) -> MediaUpload {
        MediaUpload {
            department: department.to_string(),
            category: "syllabus".to_string(),
            file_name: file_name.to_string(),
            content_type: "application/pdf".to_string(),
            kind: ResourceKind::Document,
            bytes: b"%PDF-1.4 test".to_vec(),
        }
    }

    #[tokio::test]
    async fn upload_writes_file_and_returns_reference() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path(), "http://localhost:3000/media/");

        let file = store.upload(upload("Engineering", "cse.pdf")).await.unwrap();

        assert!(file.deletion_handle.starts_with("engineering/syllabus/"));
        assert_eq!(
            file.url,
            format!("http://localhost:3000/media/{}", file.deletion_handle)
        );
        assert_eq!(file.resource_kind, ResourceKind::Document);
        let on_disk = std::fs::read(dir.path().join(&file.deletion_handle)).unwrap();
        assert_eq!(on_disk, b"%PDF-1.4 test");
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path(), "http://media.test");
        let file = store.upload(upload("Law", "a.pdf")).await.unwrap();

        store.delete(&file.deletion_handle).await.unwrap();
        assert!(!dir.path().join(&file.deletion_handle).exists());
        store.delete(&file.deletion_handle).await.unwrap();
    }

    #[tokio::test]
    async fn delete_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path(), "http://media.test");
        let result = store.delete("../outside.txt").await;
        assert_matches!(result, Err(MediaError::InvalidHandle(_)));
    }

    #[tokio::test]
    async fn list_reports_every_stored_handle() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path(), "http://media.test");
        let a = store.upload(upload("Law", "a.pdf")).await.unwrap();
        let b = store.upload(upload("Physics", "b.pdf")).await.unwrap();

        let listed = store.list().await.unwrap();
        let mut handles: Vec<String> = listed.into_iter().map(|o| o.handle).collect();
        handles.sort();
        let mut expected = vec![a.deletion_handle, b.deletion_handle];
        expected.sort();
        assert_eq!(handles, expected);
    }

    #[tokio::test]
    async fn list_on_missing_root_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path().join("not-created"), "http://media.test");
        assert!(store.list().await.unwrap().is_empty());
    }
}
