//! Filesystem-based storage implementation.
//!
//! Folders map onto directories below a root that a web server exposes under a
//! public prefix, so `{root}/videos/vimeo/clip.mp4` is served as
//! `{prefix}/videos/vimeo/clip.mp4`.

use crate::{DuplicationBehavior, MediaStorage};
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;
use vimirror_error::{StorageError, StorageErrorKind, VimirrorResult};

/// Filesystem storage backend.
///
/// # Example Structure
///
/// ```text
/// /var/www/public/            <- root, served as /fileadmin
/// └── videos/
///     └── vimeo/
///         ├── clip_3f1c...e9.mp4
///         └── clip_a07b...41.mp4
/// ```
///
/// # Features
///
/// - **Atomic writes**: files are copied next to their destination, then renamed into place
/// - **Confined paths**: folders and names cannot escape the root
#[derive(Debug, Clone)]
pub struct FileSystemStorage {
    base_path: PathBuf,
    public_prefix: String,
}

impl FileSystemStorage {
    /// Create a new filesystem storage backend.
    ///
    /// Creates the root directory if it doesn't exist.
    ///
    /// # Arguments
    ///
    /// * `base_path` - Root directory of the storage
    /// * `public_prefix` - URL path under which the root is served (e.g. `/fileadmin`)
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created.
    #[tracing::instrument(skip(base_path, public_prefix))]
    pub fn new(
        base_path: impl Into<PathBuf>,
        public_prefix: impl Into<String>,
    ) -> VimirrorResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        let public_prefix = public_prefix.into().trim_end_matches('/').to_string();

        tracing::info!(
            path = %base_path.display(),
            prefix = %public_prefix,
            "Created filesystem storage"
        );
        Ok(Self {
            base_path,
            public_prefix,
        })
    }

    /// Root directory of the storage.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a folder to a directory below the root.
    fn folder_path(&self, folder: &str) -> VimirrorResult<PathBuf> {
        let relative = Path::new(folder.trim_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::new(StorageErrorKind::InvalidPath(folder.to_string())).into());
        }
        Ok(self.base_path.join(relative))
    }

    fn validate_name(name: &str) -> VimirrorResult<()> {
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(StorageError::new(StorageErrorKind::InvalidPath(name.to_string())).into());
        }
        Ok(())
    }

    /// Pick the destination name according to the duplication behavior.
    async fn resolve_name(
        dir: &Path,
        name: &str,
        behavior: DuplicationBehavior,
    ) -> VimirrorResult<String> {
        let taken = |candidate: &str| {
            let path = dir.join(candidate);
            async move { tokio::fs::try_exists(&path).await.unwrap_or(false) }
        };

        if !taken(name).await {
            return Ok(name.to_string());
        }

        match behavior {
            DuplicationBehavior::Replace => Ok(name.to_string()),
            DuplicationBehavior::Cancel => Err(StorageError::new(StorageErrorKind::Collision(
                dir.join(name).display().to_string(),
            ))
            .into()),
            DuplicationBehavior::Rename => {
                let (stem, extension) = match name.rsplit_once('.') {
                    Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
                    _ => (name, None),
                };
                let mut counter = 1u32;
                loop {
                    let candidate = match extension {
                        Some(ext) => format!("{}_{}.{}", stem, counter, ext),
                        None => format!("{}_{}", stem, counter),
                    };
                    if !taken(&candidate).await {
                        return Ok(candidate);
                    }
                    counter += 1;
                }
            }
        }
    }
}

#[async_trait::async_trait]
impl MediaStorage for FileSystemStorage {
    #[tracing::instrument(skip(self))]
    async fn has_folder(&self, folder: &str) -> VimirrorResult<bool> {
        let path = self.folder_path(folder)?;
        Ok(tokio::fs::metadata(&path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    #[tracing::instrument(skip(self))]
    async fn create_folder(&self, folder: &str) -> VimirrorResult<()> {
        let path = self.folder_path(folder)?;
        tokio::fs::create_dir_all(&path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        tracing::info!(path = %path.display(), "Created storage folder");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn list_files(&self, folder: &str) -> VimirrorResult<Vec<String>> {
        let path = self.folder_path(folder)?;

        let mut read_dir = match tokio::fs::read_dir(&path).await {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Folder does not exist yet");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
                .into());
            }
        };

        let mut names = Vec::new();
        while let Some(entry) = read_dir.next_entry().await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })? {
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            let name = entry.file_name().to_string_lossy().to_string();
            // Dot-files are in-flight copies from add_file
            if is_file && !name.starts_with('.') {
                names.push(name);
            }
        }
        names.sort();

        tracing::debug!(path = %path.display(), count = names.len(), "Listed folder");
        Ok(names)
    }

    #[tracing::instrument(skip(self, local_path), fields(source = %local_path.display()))]
    async fn add_file(
        &self,
        local_path: &Path,
        folder: &str,
        name: &str,
        behavior: DuplicationBehavior,
    ) -> VimirrorResult<String> {
        Self::validate_name(name)?;
        let dir = self.folder_path(folder)?;

        if !self.has_folder(folder).await? {
            return Err(StorageError::new(StorageErrorKind::NotFound(
                dir.display().to_string(),
            ))
            .into());
        }

        let stored_name = Self::resolve_name(&dir, name, behavior).await?;
        let path = dir.join(&stored_name);

        // Copy next to the destination first, then rename for atomicity
        let temp_path = dir.join(format!(".{}.{}.part", stored_name, Uuid::new_v4()));
        if let Err(e) = tokio::fs::copy(local_path, &temp_path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "copy {} to {}: {}",
                local_path.display(),
                temp_path.display(),
                e
            )))
            .into());
        }

        if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
            .into());
        }

        tracing::info!(
            path = %path.display(),
            behavior = %behavior,
            "Stored file"
        );

        Ok(stored_name)
    }

    fn public_path(&self, folder: &str, name: &str) -> String {
        let folder = folder.trim_matches('/');
        if folder.is_empty() {
            format!("{}/{}", self.public_prefix, name)
        } else {
            format!("{}/{}/{}", self.public_prefix, folder, name)
        }
    }
}
