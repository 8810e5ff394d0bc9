//! Mirror Vimeo renditions into local storage and render responsive `<video>` tags.
//!
//! [`Helper::render`] is the entry point a page template calls with a video id
//! and the desired tag attributes. It asks the Vimeo API which renditions can
//! be downloaded, copies the ones not yet present into the configured storage
//! folder, remembers the outcome in a TTL cache, and returns a `<video>` element
//! whose `<source>` children are ordered by width with media queries assigned.
//!
//! The pieces are usable on their own:
//!
//! - [`Mirror`] reconciles remote renditions with a storage folder
//! - [`compose`] and [`breakpoints`] build the markup
//! - [`VimirrorConfig`] loads settings from files and the environment
//!
//! Lower layers live in their own crates and are re-exported here.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cli;
mod compose;
mod config;
mod helper;
mod mirror;

pub use cli::{Cli, Commands, TagArgs, open_helper};
pub use compose::{Source, breakpoints, compose, empty_tag};
pub use config::VimirrorConfig;
pub use helper::{CONFIG_MISSING_MESSAGE, CONFIG_UNAVAILABLE_MESSAGE, Helper};
pub use mirror::Mirror;

pub use vimirror_cache::{CacheConfig, CacheEntry, ResultCache};
pub use vimirror_core::{
    ContentFingerprint, MirroredFiles, Preload, RenditionDescriptor, VideoAttributes, VideoId,
    target_filename,
};
pub use vimirror_error::{ConfigError, VimirrorError, VimirrorErrorKind, VimirrorResult};
pub use vimirror_storage::{DuplicationBehavior, FileSystemStorage, MediaStorage};
pub use vimirror_vimeo::{VideoSource, VimeoClient};
