//! Core data types for vimirror.
//!
//! This crate holds the pieces every other vimirror crate agrees on:
//!
//! - [`RenditionDescriptor`] - one remote encoding of a video, as reported by the API
//! - [`ContentFingerprint`] - the de-duplication key derived from a rendition's
//!   immutable attributes, and the filename convention that embeds it
//! - [`MirroredFiles`] - which stored file serves which rendition
//! - [`VideoAttributes`] - the optional attributes of the emitted `<video>` tag
//! - [`VideoId`] - a video identifier parsed from a bare id or a Vimeo URL

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod attributes;
mod fingerprint;
mod rendition;
mod video_id;

pub use attributes::{Preload, VideoAttributes, VideoAttributesBuilder, parse_flag};
pub use fingerprint::{ContentFingerprint, MIRROR_EXTENSION, target_filename};
pub use rendition::{MirroredFiles, RenditionDescriptor, RenditionDescriptorBuilder};
pub use video_id::VideoId;
