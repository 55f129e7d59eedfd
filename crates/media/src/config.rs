use std::path::PathBuf;
use std::sync::Arc;

use crate::error::MediaError;
use crate::{LocalMediaStore, MediaStore, S3MediaStore};

/// Which media backend to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaBackend {
    Local,
    S3,
}

impl MediaBackend {
    pub fn parse(value: &str) -> Result<Self, MediaError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(MediaBackend::Local),
            "s3" => Ok(MediaBackend::S3),
            other => Err(MediaError::Config(format!(
                "Unknown MEDIA_BACKEND '{other}'. Must be one of: local, s3"
            ))),
        }
    }
}

/// Connection settings for the S3 backend.
#[derive(Debug, Clone)]
pub struct S3Settings {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible services; `None` means AWS.
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

/// Media store configuration.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub backend: MediaBackend,
    /// Directory for the local backend.
    pub root: PathBuf,
    /// Prefix for public URLs (`{base}/{handle}`).
    pub public_base_url: String,
    /// Present only when `backend` is [`MediaBackend::S3`].
    pub s3: Option<S3Settings>,
}

impl MediaConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                        |
    /// |-------------------------|--------------------------------|
    /// | `MEDIA_BACKEND`         | `local`                        |
    /// | `MEDIA_ROOT`            | `./media`                      |
    /// | `MEDIA_PUBLIC_BASE_URL` | `http://localhost:3000/media`  |
    /// | `S3_BUCKET`             | required when backend is `s3`  |
    /// | `S3_REGION`             | `us-east-1`                    |
    /// | `S3_ENDPOINT`           | (none)                         |
    /// | `S3_ACCESS_KEY_ID`      | (none, provider chain)         |
    /// | `S3_SECRET_ACCESS_KEY`  | (none, provider chain)         |
    pub fn from_env() -> Result<Self, MediaError> {
        let backend = MediaBackend::parse(
            &std::env::var("MEDIA_BACKEND").unwrap_or_else(|_| "local".into()),
        )?;

        let root = PathBuf::from(std::env::var("MEDIA_ROOT").unwrap_or_else(|_| "./media".into()));

        let public_base_url = std::env::var("MEDIA_PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000/media".into());

        let s3 = match backend {
            MediaBackend::Local => None,
            MediaBackend::S3 => {
                let bucket = non_empty_var("S3_BUCKET").ok_or_else(|| {
                    MediaError::Config("S3_BUCKET is required when MEDIA_BACKEND=s3".into())
                })?;
                Some(S3Settings {
                    bucket,
                    region: non_empty_var("S3_REGION").unwrap_or_else(|| "us-east-1".into()),
                    endpoint: non_empty_var("S3_ENDPOINT"),
                    access_key_id: non_empty_var("S3_ACCESS_KEY_ID"),
                    secret_access_key: non_empty_var("S3_SECRET_ACCESS_KEY"),
                })
            }
        };

        Ok(Self {
            backend,
            root,
            public_base_url,
            s3,
        })
    }

    /// Construct the configured backend.
    pub async fn build_store(&self) -> Result<Arc<dyn MediaStore>, MediaError> {
        match self.backend {
            MediaBackend::Local => Ok(Arc::new(LocalMediaStore::new(
                self.root.clone(),
                &self.public_base_url,
            ))),
            MediaBackend::S3 => {
                let settings = self.s3.as_ref().ok_or_else(|| {
                    MediaError::Config("S3 backend selected without S3 settings".into())
                })?;
                Ok(Arc::new(
                    S3MediaStore::connect(settings, &self.public_base_url).await,
                ))
            }
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_backend_names() {
        assert_eq!(MediaBackend::parse("local").unwrap(), MediaBackend::Local);
        assert_eq!(MediaBackend::parse(" S3 ").unwrap(), MediaBackend::S3);
        assert_matches!(MediaBackend::parse("ftp"), Err(MediaError::Config(_)));
    }

    #[tokio::test]
    async fn local_config_builds_local_store() {
        let config = MediaConfig {
            backend: MediaBackend::Local,
            root: PathBuf::from("./media"),
            public_base_url: "http://localhost/media".into(),
            s3: None,
        };
        let store = config.build_store().await.unwrap();
        assert_eq!(store.backend_tag(), "local");
    }

    #[tokio::test]
    async fn s3_backend_without_settings_is_rejected() {
        let config = MediaConfig {
            backend: MediaBackend::S3,
            root: PathBuf::from("./media"),
            public_base_url: "http://localhost/media".into(),
            s3: None,
        };
        assert_matches!(config.build_store().await.err(), Some(MediaError::Config(_)));
    }
}
