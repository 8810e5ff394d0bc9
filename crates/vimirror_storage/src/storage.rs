//! Storage trait definition.

use crate::DuplicationBehavior;
use std::path::Path;
use vimirror_error::VimirrorResult;

/// Trait for folder-based storage of mirrored files.
///
/// Folders are relative, `/`-separated paths inside the storage (e.g.
/// `"videos/vimeo"`); leading and trailing slashes are ignored.
#[async_trait::async_trait]
pub trait MediaStorage: Send + Sync {
    /// Check whether a folder exists.
    async fn has_folder(&self, folder: &str) -> VimirrorResult<bool>;

    /// Create a folder, including missing parents. Existing folders are fine.
    async fn create_folder(&self, folder: &str) -> VimirrorResult<()>;

    /// List the names of the files directly inside a folder.
    ///
    /// A folder that does not exist yet has no files.
    async fn list_files(&self, folder: &str) -> VimirrorResult<Vec<String>>;

    /// Copy a local file into a folder under `name`.
    ///
    /// # Arguments
    ///
    /// * `local_path` - The file to add; it is left in place for the caller to remove
    /// * `folder` - Destination folder, which must exist
    /// * `name` - Requested filename
    /// * `behavior` - What to do if `name` is taken
    ///
    /// # Returns
    ///
    /// The name the file was actually stored under.
    async fn add_file(
        &self,
        local_path: &Path,
        folder: &str,
        name: &str,
        behavior: DuplicationBehavior,
    ) -> VimirrorResult<String>;

    /// Public URL of a stored file.
    fn public_path(&self, folder: &str, name: &str) -> String;
}
