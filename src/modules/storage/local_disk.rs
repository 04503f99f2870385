use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;

use crate::core::config::StorageConfig;
use crate::core::error::{AppError, Result};

lazy_static! {
    /// Characters allowed to survive in an uploaded filename. Everything
    /// else (path separators, spaces, shell metacharacters) becomes "_".
    static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^a-zA-Z0-9.\-]").unwrap();
}

/// A file persisted to the upload directory.
#[derive(Debug, Clone)]
pub struct StoredFile {
    /// Final on-disk filename (sanitized, timestamp-prefixed)
    pub filename: String,
    /// Full path the file was written to
    pub path: String,
}

/// Local-disk attachment sink. Files land under the configured upload
/// directory and are served back under the `/uploads` static route.
pub struct LocalDiskStorage {
    root: PathBuf,
}

impl LocalDiskStorage {
    /// Create the storage handle, ensuring the upload directory exists.
    pub async fn init(config: &StorageConfig) -> Result<Self> {
        tokio::fs::create_dir_all(&config.upload_dir)
            .await
            .map_err(|e| {
                AppError::Internal(format!(
                    "Failed to create upload directory {}: {}",
                    config.upload_dir.display(),
                    e
                ))
            })?;

        Ok(Self {
            root: config.upload_dir.clone(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Strip anything that could escape the upload directory or confuse a
    /// static file server out of a client-supplied filename.
    pub fn sanitize_filename(name: &str) -> String {
        UNSAFE_FILENAME_CHARS.replace_all(name, "_").into_owned()
    }

    /// Persist one uploaded file under a sanitized, millisecond-timestamp
    /// prefixed name and return where it landed.
    pub async fn save(&self, original_name: &str, data: &[u8]) -> Result<StoredFile> {
        let safe_name = Self::sanitize_filename(original_name);
        let filename = format!("{}-{}", chrono::Utc::now().timestamp_millis(), safe_name);
        let path = self.root.join(&filename);

        tokio::fs::write(&path, data).await.map_err(|e| {
            tracing::error!("Failed to write upload {}: {}", path.display(), e);
            AppError::Internal(format!("Failed to store uploaded file: {}", e))
        })?;

        Ok(StoredFile {
            filename,
            path: path.to_string_lossy().into_owned(),
        })
    }

    /// Best-effort removal, used to undo writes when a creation transaction
    /// rolls back. Failures are logged, not surfaced.
    pub async fn remove(&self, stored: &StoredFile) {
        if let Err(e) = tokio::fs::remove_file(&stored.path).await {
            tracing::warn!("Failed to remove orphaned upload {}: {}", stored.path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_storage() -> LocalDiskStorage {
        let root = std::env::temp_dir().join(format!("sitelog-test-{}", Uuid::new_v4()));
        std::fs::create_dir_all(&root).unwrap();
        LocalDiskStorage { root }
    }

    #[test]
    fn sanitize_replaces_path_separators() {
        assert_eq!(
            LocalDiskStorage::sanitize_filename("../../etc/passwd"),
            ".._.._etc_passwd"
        );
        assert_eq!(
            LocalDiskStorage::sanitize_filename("north yard (1).jpg"),
            "north_yard__1_.jpg"
        );
    }

    #[test]
    fn sanitize_keeps_safe_names() {
        assert_eq!(
            LocalDiskStorage::sanitize_filename("tipping-face_2024.jpg"),
            "tipping-face_2024.jpg"
        );
    }

    #[tokio::test]
    async fn save_writes_file_with_timestamp_prefix() {
        let storage = temp_storage();
        let stored = storage.save("cell4.jpg", b"jpegdata").await.unwrap();

        assert!(stored.filename.ends_with("-cell4.jpg"));
        let prefix = stored.filename.split('-').next().unwrap();
        assert!(prefix.parse::<i64>().is_ok());

        let on_disk = std::fs::read(&stored.path).unwrap();
        assert_eq!(on_disk, b"jpegdata");

        storage.remove(&stored).await;
        assert!(!std::path::Path::new(&stored.path).exists());
    }

    #[tokio::test]
    async fn remove_missing_file_is_silent() {
        let storage = temp_storage();
        let ghost = StoredFile {
            filename: "ghost.jpg".to_string(),
            path: storage.root().join("ghost.jpg").to_string_lossy().into_owned(),
        };
        // must not panic
        storage.remove(&ghost).await;
    }
}
