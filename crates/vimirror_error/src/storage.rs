//! Storage error types.

/// Kinds of storage errors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create a storage folder
    #[display("Failed to create storage folder: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write file
    #[display("Failed to write file: {}", _0)]
    FileWrite(String),
    /// Failed to read file or folder listing
    #[display("Failed to read file: {}", _0)]
    FileRead(String),
    /// Folder or file not found at the specified location
    #[display("Not found: {}", _0)]
    NotFound(String),
    /// Invalid storage path (absolute, or escaping the storage root)
    #[display("Invalid storage path: {}", _0)]
    InvalidPath(String),
    /// A file with the requested name exists and the duplication behavior forbids replacing it
    #[display("File already exists: {}", _0)]
    Collision(String),
}

/// Storage error with location tracking.
///
/// # Examples
///
/// ```
/// use vimirror_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::NotFound("videos/vimeo".to_string()));
/// assert!(format!("{}", err).contains("Not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// The kind of error that occurred
    pub kind: StorageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StorageError {
    /// Create a new storage error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
