//! S3-compatible media store (AWS S3, MinIO, R2, ...).

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use campus_core::media::FileRef;
use chrono::{DateTime, Utc};

use crate::config::S3Settings;
use crate::error::MediaError;
use crate::handle::{new_handle, validate_handle};
use crate::{MediaStore, MediaUpload, StoredObject};

/// Stores files as objects in one bucket; the handle is the object key.
pub struct S3MediaStore {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3MediaStore {
    /// Build a client from explicit settings.
    ///
    /// Static credentials are used when both keys are set; otherwise the
    /// default AWS provider chain applies. A custom endpoint switches to
    /// path-style addressing.
    pub async fn connect(settings: &S3Settings, public_base_url: &str) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()));

        if let (Some(key_id), Some(secret)) =
            (&settings.access_key_id, &settings.secret_access_key)
        {
            loader = loader.credentials_provider(Credentials::new(
                key_id.clone(),
                secret.clone(),
                None,
                None,
                "campus-env",
            ));
        }
        if let Some(endpoint) = &settings.endpoint {
            loader = loader.endpoint_url(endpoint.clone());
        }

        let sdk_config = loader.load().await;
        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(settings.endpoint.is_some())
            .build();

        Self {
            client: Client::from_conf(s3_config),
            bucket: settings.bucket.clone(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl MediaStore for S3MediaStore {
    fn backend_tag(&self) -> &'static str {
        "s3"
    }

    async fn upload(&self, upload: MediaUpload) -> Result<FileRef, MediaError> {
        let handle = new_handle(&upload.department, &upload.category, &upload.file_name);
        let size = upload.bytes.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&handle)
            .content_type(&upload.content_type)
            .body(ByteStream::from(upload.bytes))
            .send()
            .await
            .map_err(|e| MediaError::backend("put_object", DisplayErrorContext(&e)))?;

        tracing::debug!(bucket = %self.bucket, handle = %handle, size, "Stored media object");

        Ok(FileRef {
            url: format!("{}/{}", self.public_base_url, handle),
            deletion_handle: handle,
            resource_kind: upload.kind,
        })
    }

    async fn delete(&self, deletion_handle: &str) -> Result<(), MediaError> {
        validate_handle(deletion_handle)?;
        // DeleteObject succeeds for missing keys, which gives idempotency for free.
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(deletion_handle)
            .send()
            .await
            .map_err(|e| MediaError::backend("delete_object", DisplayErrorContext(&e)))?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<StoredObject>, MediaError> {
        let mut objects = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let page = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| MediaError::backend("list_objects_v2", DisplayErrorContext(&e)))?;

            for object in page.contents() {
                let Some(key) = object.key() else {
                    continue;
                };
                // Objects without a timestamp count as brand new so the
                // sweep never selects them.
                let last_modified = object
                    .last_modified()
                    .and_then(|t| DateTime::<Utc>::from_timestamp(t.secs(), t.subsec_nanos()))
                    .unwrap_or_else(Utc::now);
                objects.push(StoredObject {
                    handle: key.to_string(),
                    last_modified,
                });
            }

            match (page.is_truncated(), page.next_continuation_token()) {
                (Some(true), Some(token)) => continuation = Some(token.to_string()),
                _ => break,
            }
        }

        Ok(objects)
    }
}
