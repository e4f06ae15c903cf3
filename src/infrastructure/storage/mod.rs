//! Image storage
//!
//! Uploaded post images are written to a local directory under a random
//! name and served back as static files from the configured URL prefix.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use uuid::Uuid;

use crate::config::UploadSettings;
use crate::domain::NewImage;
use crate::shared::error::AppError;

/// Where uploaded image bytes go.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store the bytes and return the filename and public URL they got.
    async fn save(&self, original_filename: &str, bytes: &[u8]) -> Result<NewImage, AppError>;

    /// Remove a stored file. Missing files are not an error.
    async fn remove(&self, filename: &str) -> Result<(), AppError>;
}

/// Stores images as flat files in one directory.
pub struct LocalImageStore {
    dir: PathBuf,
    settings: UploadSettings,
}

impl LocalImageStore {
    /// Create the store, making the upload directory if needed.
    pub async fn new(settings: &UploadSettings) -> Result<Self, AppError> {
        let dir = PathBuf::from(&settings.directory);
        fs::create_dir_all(&dir).await?;
        tracing::info!("Image upload directory: {}", dir.display());
        Ok(Self {
            dir,
            settings: settings.clone(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Random stored name keeping the upload's lowercased extension.
pub fn stored_filename(original_filename: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    match Path::new(original_filename)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(ext) => format!("{}.{}", id, ext.to_ascii_lowercase()),
        None => id,
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn save(&self, original_filename: &str, bytes: &[u8]) -> Result<NewImage, AppError> {
        let filename = stored_filename(original_filename);
        let path = self.dir.join(&filename);
        fs::write(&path, bytes).await?;

        tracing::debug!(file = %path.display(), size = bytes.len(), "Stored image");
        Ok(NewImage {
            url: self.settings.url_for(&filename),
            filename,
        })
    }

    async fn remove(&self, filename: &str) -> Result<(), AppError> {
        let path = self.dir.join(filename);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(file = %path.display(), "Image file already gone");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
