//! Top-level error wrapper types.

use crate::{ConfigError, DownloadError, FetchError, JsonError, StorageError};

/// Every error condition vimirror can produce.
///
/// # Examples
///
/// ```
/// use vimirror_error::{ConfigError, VimirrorError};
///
/// let config_err = ConfigError::new("Vimeo API token not set");
/// let err: VimirrorError = config_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum VimirrorErrorKind {
    /// Missing or invalid configuration
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Metadata request failed
    #[from(FetchError)]
    Fetch(FetchError),
    /// Rendition download failed
    #[from(DownloadError)]
    Download(DownloadError),
    /// Local storage error
    #[from(StorageError)]
    Storage(StorageError),
}

/// vimirror error with kind discrimination.
///
/// # Examples
///
/// ```
/// use vimirror_error::{ConfigError, VimirrorErrorKind, VimirrorResult};
///
/// fn might_fail() -> VimirrorResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), VimirrorErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("vimirror Error: {}", _0)]
pub struct VimirrorError(Box<VimirrorErrorKind>);

impl VimirrorError {
    /// Create a new error from a kind.
    pub fn new(kind: VimirrorErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &VimirrorErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to VimirrorErrorKind
impl<T> From<T> for VimirrorError
where
    T: Into<VimirrorErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for vimirror operations.
pub type VimirrorResult<T> = std::result::Result<T, VimirrorError>;
