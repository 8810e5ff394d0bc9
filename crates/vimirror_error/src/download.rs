//! Rendition download error types.

/// Ways a single rendition download can fail.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum DownloadErrorKind {
    /// Connection failure, timeout, or interrupted body
    #[display("Transport failure: {}", _0)]
    Transport(String),
    /// Server answered with a non-success status
    #[display("Unexpected status {}", _0)]
    Status(u16),
    /// Writing the transient buffer file failed
    #[display("Buffer write failed: {}", _0)]
    Buffer(String),
}

/// Rendition download error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Download Error: {} at line {} in {}", kind, line, file)]
pub struct DownloadError {
    /// The kind of error that occurred
    pub kind: DownloadErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl DownloadError {
    /// Create a new download error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DownloadErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
