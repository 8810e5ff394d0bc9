//! Reconciling remote renditions with the local mirror folder.

use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use vimirror_core::{ContentFingerprint, MirroredFiles, RenditionDescriptor, target_filename};
use vimirror_error::{StorageError, StorageErrorKind, VimirrorResult};
use vimirror_storage::{DuplicationBehavior, MediaStorage};
use vimirror_vimeo::VideoSource;

/// Ensures every remote rendition has a local copy in one storage folder.
///
/// A rendition counts as mirrored when a file in the folder embeds its content
/// fingerprint, whatever the rest of the filename says. Only renditions without
/// such a file are downloaded.
pub struct Mirror<'a> {
    source: &'a dyn VideoSource,
    storage: &'a dyn MediaStorage,
    folder: &'a str,
    buffer_dir: PathBuf,
}

impl<'a> Mirror<'a> {
    /// Create a mirror writing into `folder`, buffering downloads in `buffer_dir`.
    pub fn new(
        source: &'a dyn VideoSource,
        storage: &'a dyn MediaStorage,
        folder: &'a str,
        buffer_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source,
            storage,
            folder,
            buffer_dir: buffer_dir.into(),
        }
    }

    /// Resolve each descriptor to a stored file, downloading what is missing.
    ///
    /// Descriptors are handled in order. Renditions whose download or storage
    /// fails are logged and left out of the result; they never abort the pass.
    #[instrument(skip(self, descriptors, existing), fields(folder = %self.folder, renditions = descriptors.len(), existing = existing.len()))]
    pub async fn reconcile(
        &self,
        descriptors: &[RenditionDescriptor],
        existing: &[String],
    ) -> MirroredFiles {
        let mut known: Vec<String> = existing.to_vec();
        let mut files = MirroredFiles::new();
        let mut folder_ready = false;

        for descriptor in descriptors {
            let fingerprint = ContentFingerprint::of(descriptor);

            if let Some(name) = known.iter().find(|name| fingerprint.matches_filename(name)) {
                debug!(
                    rendition = %descriptor.rendition(),
                    file = %name,
                    "Rendition already mirrored"
                );
                files.insert(descriptor.rendition().clone(), name.clone());
                continue;
            }

            if descriptor.link().is_empty() {
                warn!(rendition = %descriptor.rendition(), "Rendition has no download link, skipping");
                continue;
            }

            if !folder_ready {
                match self.ensure_folder().await {
                    Ok(()) => folder_ready = true,
                    Err(e) => {
                        warn!(error = %e, "Cannot prepare mirror folders, skipping rendition");
                        continue;
                    }
                }
            }

            if let Some(stored) = self.fetch_and_store(descriptor).await {
                known.push(stored.clone());
                files.insert(descriptor.rendition().clone(), stored);
            }
        }

        info!(mirrored = files.len(), "Reconciled renditions");
        files
    }

    async fn ensure_folder(&self) -> VimirrorResult<()> {
        if !self.storage.has_folder(self.folder).await? {
            self.storage.create_folder(self.folder).await?;
        }
        tokio::fs::create_dir_all(&self.buffer_dir)
            .await
            .map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    self.buffer_dir.display(),
                    e
                )))
            })?;
        Ok(())
    }

    async fn fetch_and_store(&self, descriptor: &RenditionDescriptor) -> Option<String> {
        let buffer = self
            .buffer_dir
            .join(format!("vimeo_download_{}.part", Uuid::new_v4()));
        let name = target_filename(descriptor);

        let stored = self.download_into(descriptor, &buffer, &name).await;

        // The buffer goes whether or not the rendition made it into storage
        if let Err(e) = tokio::fs::remove_file(&buffer).await
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!(buffer = %buffer.display(), error = %e, "Failed to remove download buffer");
        }

        stored
    }

    async fn download_into(
        &self,
        descriptor: &RenditionDescriptor,
        buffer: &Path,
        name: &str,
    ) -> Option<String> {
        let bytes = match self.source.download(descriptor.link(), buffer).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(rendition = %descriptor.rendition(), error = %e, "Download failed, skipping rendition");
                return None;
            }
        };

        match self
            .storage
            .add_file(buffer, self.folder, name, DuplicationBehavior::Replace)
            .await
        {
            Ok(stored) => {
                info!(
                    rendition = %descriptor.rendition(),
                    file = %stored,
                    bytes,
                    "Mirrored rendition"
                );
                Some(stored)
            }
            Err(e) => {
                warn!(rendition = %descriptor.rendition(), error = %e, "Storing rendition failed, skipping");
                None
            }
        }
    }
}
