//! Error types for vimirror.
//!
//! This crate provides the error types shared by every vimirror crate.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! The top-level helper never lets these escape: configuration errors become a
//! short diagnostic string, everything else degrades the rendered markup.
//!
//! # Examples
//!
//! ```
//! use vimirror_error::{FetchError, FetchErrorKind, VimirrorResult};
//!
//! fn fetch_data() -> VimirrorResult<String> {
//!     Err(FetchError::new(FetchErrorKind::Transport("Connection refused".into())))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod download;
mod error;
mod fetch;
mod json;
mod storage;

pub use config::ConfigError;
pub use download::{DownloadError, DownloadErrorKind};
pub use error::{VimirrorError, VimirrorErrorKind, VimirrorResult};
pub use fetch::{FetchError, FetchErrorKind};
pub use json::JsonError;
pub use storage::{StorageError, StorageErrorKind};
