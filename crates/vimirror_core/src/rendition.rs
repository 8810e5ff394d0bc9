//! Remote rendition descriptors.

use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping from rendition label (e.g. `"1080p"`) to the stored filename serving it.
///
/// Renditions that could not be mirrored are simply absent.
pub type MirroredFiles = BTreeMap<String, String>;

/// One encoding quality of a remote video, as reported by the metadata API.
///
/// Deserializes straight from an entry of the Vimeo `download` array; fields the
/// API sends that are not listed here are ignored.
///
/// The download `link` is signed and expires, so it is never serialized: a
/// descriptor written to the result cache comes back with an empty link.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use vimirror_core::RenditionDescriptor;
///
/// let descriptor = RenditionDescriptor::builder()
///     .rendition("1080p")
///     .width(1920u32)
///     .created_time(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
///     .size(52_428_800u64)
///     .link("https://player.vimeo.com/progressive_redirect/download/123/rendition/1080p/clip.mp4")
///     .build()
///     .unwrap();
///
/// assert_eq!(*descriptor.width(), 1920);
/// ```
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct RenditionDescriptor {
    /// Quality label distinguishing renditions of the same video
    rendition: String,
    /// Frame width in pixels, used for breakpoint ordering
    width: u32,
    /// Creation time of the encoded asset
    created_time: DateTime<Utc>,
    /// Size of the encoded asset in bytes
    size: u64,
    /// Signed, time-limited download URL
    #[serde(default, skip_serializing)]
    #[builder(default)]
    link: String,
}

impl RenditionDescriptor {
    /// Creates a new descriptor builder.
    pub fn builder() -> RenditionDescriptorBuilder {
        RenditionDescriptorBuilder::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_vimeo_download_entry() {
        let json = r#"{
            "quality": "hd",
            "rendition": "1080p",
            "type": "video/mp4",
            "width": 1920,
            "height": 1080,
            "expires": "2024-03-02T12:00:00+00:00",
            "link": "https://player.vimeo.com/play/abc?s=123",
            "created_time": "2024-03-01T12:00:00+00:00",
            "fps": 25,
            "size": 52428800,
            "md5": null,
            "public_name": "1080p",
            "size_short": "50 MB"
        }"#;

        let descriptor: RenditionDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.rendition(), "1080p");
        assert_eq!(*descriptor.width(), 1920);
        assert_eq!(*descriptor.size(), 52_428_800);
        assert_eq!(descriptor.created_time().timestamp(), 1_709_294_400);
        assert_eq!(descriptor.link(), "https://player.vimeo.com/play/abc?s=123");
    }

    #[test]
    fn link_is_not_persisted() {
        let descriptor = RenditionDescriptor::builder()
            .rendition("360p")
            .width(640u32)
            .created_time(DateTime::from_timestamp(1_700_000_000, 0).unwrap())
            .size(1024u64)
            .link("https://example.com/signed?token=secret")
            .build()
            .unwrap();

        let json = serde_json::to_string(&descriptor).unwrap();
        assert!(!json.contains("secret"));

        let restored: RenditionDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.rendition(), "360p");
        assert!(restored.link().is_empty());
    }
}
