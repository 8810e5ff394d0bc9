//! Metadata fetch error types.

/// Ways a metadata request can fail.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum FetchErrorKind {
    /// Connection failure, timeout, or interrupted body
    #[display("Transport failure: {}", _0)]
    Transport(String),
    /// Server answered with a non-success status
    #[display("Unexpected status {}: {}", status, message)]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, if readable
        message: String,
    },
    /// Body was not valid JSON or did not match the expected shape
    #[display("Failed to parse API response: {}", _0)]
    Decode(String),
    /// Payload decoded but carried an explicit `error` field
    #[display("API reported an error: {}", _0)]
    Api(String),
}

/// Metadata fetch error with location tracking.
///
/// # Examples
///
/// ```
/// use vimirror_error::{FetchError, FetchErrorKind};
///
/// let err = FetchError::new(FetchErrorKind::Api("The requested video couldn't be found.".into()));
/// assert!(format!("{}", err).contains("API reported an error"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Fetch Error: {} at line {} in {}", kind, line, file)]
pub struct FetchError {
    /// The kind of error that occurred
    pub kind: FetchErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl FetchError {
    /// Create a new fetch error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: FetchErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
