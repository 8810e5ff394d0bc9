//! Content fingerprints and the mirrored filename convention.
//!
//! A rendition's fingerprint is the MD5 of its RFC 3339 creation time followed
//! by its decimal byte size, both immutable once Vimeo has encoded the asset. Two descriptors with the same
//! fingerprint are treated as the same bytes, whatever their filenames say.
//!
//! Mirrored files are named `{stem}_{fingerprint}.mp4`; the fingerprint is read
//! back out of existing filenames to decide whether a download can be skipped.

use crate::RenditionDescriptor;
use percent_encoding::percent_decode_str;
use regex::Regex;
use md5::{Digest, Md5};
use std::sync::LazyLock;

/// Extension given to every mirrored rendition.
pub const MIRROR_EXTENSION: &str = "mp4";

static FINGERPRINT_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"_(?P<hash>[a-f0-9]{32})\.mp4$").expect("Valid fingerprint suffix regex")
});

/// Fixed-length content hash of a rendition's immutable attributes.
///
/// # Examples
///
/// ```
/// use vimirror_core::ContentFingerprint;
///
/// let name = "clip_0123456789abcdef0123456789abcdef.mp4";
/// let fingerprint = ContentFingerprint::from_filename(name).unwrap();
/// assert_eq!(fingerprint.as_str(), "0123456789abcdef0123456789abcdef");
/// assert!(ContentFingerprint::from_filename("clip.mp4").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("{}", _0)]
pub struct ContentFingerprint(String);

impl ContentFingerprint {
    /// Derive the fingerprint of a descriptor from `(created_time, size)`.
    ///
    /// The creation time is rendered as the API reports it, e.g.
    /// `2024-03-01T12:00:00+00:00`, so existing mirrors keep matching.
    pub fn of(descriptor: &RenditionDescriptor) -> Self {
        let input = format!(
            "{}{}",
            descriptor.created_time().to_rfc3339(),
            descriptor.size()
        );
        Self(format!("{:x}", Md5::digest(input.as_bytes())))
    }

    /// Extract the fingerprint embedded in a mirrored filename, if any.
    pub fn from_filename(name: &str) -> Option<Self> {
        FINGERPRINT_SUFFIX
            .captures(name)
            .and_then(|captures| captures.name("hash"))
            .map(|hash| Self(hash.as_str().to_string()))
    }

    /// Whether `name` embeds this fingerprint.
    pub fn matches_filename(&self, name: &str) -> bool {
        Self::from_filename(name).is_some_and(|embedded| embedded == *self)
    }

    /// The hex representation.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Filename under which a rendition is mirrored.
///
/// Takes the last segment of the download link's path, percent-decodes it,
/// drops its extension and appends the fingerprint with a `.mp4` extension.
/// Falls back to the rendition label when the link has no usable path.
///
/// # Examples
///
/// ```
/// use chrono::DateTime;
/// use vimirror_core::{ContentFingerprint, RenditionDescriptor, target_filename};
///
/// let descriptor = RenditionDescriptor::builder()
///     .rendition("720p")
///     .width(1280u32)
///     .created_time(DateTime::from_timestamp(1_700_000_000, 0).unwrap())
///     .size(4096u64)
///     .link("https://vod.example.com/download/My%20Clip%20(720p).mov?sig=abc")
///     .build()
///     .unwrap();
///
/// let name = target_filename(&descriptor);
/// let fingerprint = ContentFingerprint::of(&descriptor);
/// assert_eq!(name, format!("My Clip (720p)_{}.mp4", fingerprint));
/// ```
pub fn target_filename(descriptor: &RenditionDescriptor) -> String {
    let stem = link_stem(descriptor.link()).unwrap_or_else(|| descriptor.rendition().clone());
    format!(
        "{}_{}.{}",
        stem,
        ContentFingerprint::of(descriptor),
        MIRROR_EXTENSION
    )
}

fn link_stem(link: &str) -> Option<String> {
    let url = url::Url::parse(link).ok()?;
    let segment = url.path_segments()?.rev().find(|s| !s.is_empty())?;
    let decoded = percent_decode_str(segment).decode_utf8_lossy();
    let basename = decoded.rsplit(['/', '\\']).next().unwrap_or_default();

    let stem = match basename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => basename,
    };

    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn descriptor(rendition: &str, created: i64, size: u64, link: &str) -> RenditionDescriptor {
        RenditionDescriptor::builder()
            .rendition(rendition)
            .width(640u32)
            .created_time(DateTime::from_timestamp(created, 0).unwrap())
            .size(size)
            .link(link)
            .build()
            .unwrap()
    }

    #[test]
    fn fingerprint_matches_established_digest() {
        let created = DateTime::parse_from_rfc3339("2024-03-01T12:00:00+00:00")
            .unwrap()
            .timestamp();
        let d = descriptor("1080p", created, 1000, "https://cdn.example/v/clip.mp4");

        assert_eq!(
            ContentFingerprint::of(&d).as_str(),
            "f1c589e2fe4f8dfe75ecefc526651373"
        );
        assert!(
            ContentFingerprint::of(&d)
                .matches_filename("clip_f1c589e2fe4f8dfe75ecefc526651373.mp4")
        );
    }

    #[test]
    fn fingerprint_ignores_rendition_and_link() {
        let a = descriptor("1080p", 1_700_000_000, 1000, "https://a.example/x.mp4");
        let b = descriptor("360p", 1_700_000_000, 1000, "https://b.example/y.mp4");
        assert_eq!(ContentFingerprint::of(&a), ContentFingerprint::of(&b));
    }

    #[test]
    fn fingerprint_changes_with_size_or_time() {
        let base = descriptor("1080p", 1_700_000_000, 1000, "");
        let bigger = descriptor("1080p", 1_700_000_000, 1001, "");
        let later = descriptor("1080p", 1_700_000_001, 1000, "");
        assert_ne!(ContentFingerprint::of(&base), ContentFingerprint::of(&bigger));
        assert_ne!(ContentFingerprint::of(&base), ContentFingerprint::of(&later));
    }

    #[test]
    fn fingerprint_is_32_lowercase_hex() {
        let fingerprint = ContentFingerprint::of(&descriptor("1080p", 0, 0, ""));
        assert_eq!(fingerprint.as_str().len(), 32);
        assert!(
            fingerprint
                .as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn target_filename_round_trips_through_suffix_pattern() {
        let d = descriptor("1080p", 1_700_000_000, 1000, "https://cdn.example/v/clip.mp4?x=1");
        let name = target_filename(&d);
        assert!(name.starts_with("clip_"));
        assert!(ContentFingerprint::of(&d).matches_filename(&name));
    }

    #[test]
    fn target_filename_falls_back_to_rendition() {
        let d = descriptor("540p", 1_700_000_000, 1000, "not a url");
        assert!(target_filename(&d).starts_with("540p_"));

        let d = descriptor("540p", 1_700_000_000, 1000, "https://cdn.example/");
        assert!(target_filename(&d).starts_with("540p_"));
    }

    #[test]
    fn suffix_pattern_rejects_other_names() {
        assert!(ContentFingerprint::from_filename("clip.mp4").is_none());
        assert!(
            ContentFingerprint::from_filename("clip_0123456789ABCDEF0123456789ABCDEF.mp4").is_none()
        );
        assert!(
            ContentFingerprint::from_filename("clip_0123456789abcdef0123456789abcdef.mov").is_none()
        );
    }
}
