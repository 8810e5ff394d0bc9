//! Local storage for mirrored renditions.
//!
//! The mirror only needs a handful of capabilities from its storage: check and
//! create a folder, list the names in it, add a local file under a chosen name,
//! and turn a stored name into a public URL. [`MediaStorage`] captures exactly
//! that, and [`FileSystemStorage`] implements it on a directory tree served by
//! a web server.
//!
//! # Example
//!
//! ```rust
//! use vimirror_storage::{DuplicationBehavior, FileSystemStorage, MediaStorage};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = FileSystemStorage::new("/tmp/public", "/fileadmin")?;
//!
//! if !storage.has_folder("videos/vimeo").await? {
//!     storage.create_folder("videos/vimeo").await?;
//! }
//!
//! let stored = storage
//!     .add_file(
//!         std::path::Path::new("/tmp/download.part"),
//!         "videos/vimeo",
//!         "clip.mp4",
//!         DuplicationBehavior::Replace,
//!     )
//!     .await?;
//! println!("{}", storage.public_path("videos/vimeo", &stored));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod duplication;
mod filesystem;
mod storage;

pub use duplication::DuplicationBehavior;
pub use filesystem::FileSystemStorage;
pub use storage::MediaStorage;
pub use vimirror_error::{StorageError, StorageErrorKind};
