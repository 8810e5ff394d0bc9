//! Optional attributes of the emitted `<video>` element.

use derive_getters::Getters;

/// Value of the `preload` attribute.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::AsRefStr,
    strum::Display,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Preload {
    /// Let the browser download the whole file
    Auto,
    /// Fetch only metadata (duration, dimensions)
    Metadata,
    /// Download nothing until playback starts
    None,
}

/// Caller-supplied attributes of the `<video>` element, plus the cache switch.
///
/// Text attributes are omitted from the markup when unset or empty, boolean
/// attributes are rendered bare when `true` and omitted when `false`.
///
/// # Examples
///
/// ```
/// use vimirror_core::{Preload, VideoAttributes};
///
/// let attributes = VideoAttributes::builder()
///     .class("video-js")
///     .preload(Preload::None)
///     .muted(true)
///     .build()
///     .unwrap();
///
/// assert_eq!(attributes.class().as_deref(), Some("video-js"));
/// assert!(*attributes.use_cache());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_builder::Builder)]
#[builder(setter(into), default)]
pub struct VideoAttributes {
    /// `id` attribute
    #[builder(setter(into, strip_option))]
    id: Option<String>,
    /// `class` attribute
    #[builder(setter(into, strip_option))]
    class: Option<String>,
    /// `preload` attribute
    #[builder(setter(into, strip_option))]
    preload: Option<Preload>,
    /// `poster` image URL
    #[builder(setter(into, strip_option))]
    poster: Option<String>,
    /// Start muted
    muted: bool,
    /// Restart when finished
    loop_playback: bool,
    /// Show native controls
    controls: bool,
    /// Start playing immediately
    autoplay: bool,
    /// Play inline on mobile instead of fullscreen
    playsinline: bool,
    /// Serve from the result cache when fresh
    use_cache: bool,
}

impl Default for VideoAttributes {
    fn default() -> Self {
        Self {
            id: None,
            class: None,
            preload: None,
            poster: None,
            muted: false,
            loop_playback: false,
            controls: false,
            autoplay: false,
            playsinline: false,
            use_cache: true,
        }
    }
}

impl VideoAttributes {
    /// Creates a new attributes builder.
    pub fn builder() -> VideoAttributesBuilder {
        VideoAttributesBuilder::default()
    }
}

/// Parse a template-engine boolean flag such as `useCache="0"`.
///
/// Accepts `1`/`0`, `true`/`false`, `yes`/`no` and `on`/`off` (case-insensitive).
///
/// # Examples
///
/// ```
/// use vimirror_core::parse_flag;
///
/// assert_eq!(parse_flag("1"), Some(true));
/// assert_eq!(parse_flag("0"), Some(false));
/// assert_eq!(parse_flag("maybe"), None);
/// ```
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn defaults_use_cache_and_no_attributes() {
        let attributes = VideoAttributes::default();
        assert!(*attributes.use_cache());
        assert!(!*attributes.muted());
        assert!(attributes.class().is_none());

        let built = VideoAttributes::builder().build().unwrap();
        assert_eq!(built, attributes);
    }

    #[test]
    fn builder_sets_flags() {
        let attributes = VideoAttributes::builder()
            .loop_playback(true)
            .use_cache(false)
            .build()
            .unwrap();
        assert!(*attributes.loop_playback());
        assert!(!*attributes.use_cache());
    }

    #[test]
    fn preload_parses_case_insensitively() {
        assert_eq!(Preload::from_str("none").unwrap(), Preload::None);
        assert_eq!(Preload::from_str("Metadata").unwrap(), Preload::Metadata);
        assert_eq!(Preload::Auto.as_ref(), "auto");
        assert!(Preload::from_str("eager").is_err());
    }
}
