//! Video identifier parsing.

use regex::Regex;
use std::sync::LazyLock;

static VIMEO_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)vimeo\.com/(?:channels/(?:\w+/)?|groups/[^/]*/videos/|album/\d+/video/|video/)?(\d+)",
    )
    .expect("Valid Vimeo URL regex")
});

/// Identifier of a remote video, used both for the API request and as the
/// result cache key.
///
/// Editors paste either the numeric id or a link to the video page, so both are
/// accepted; links are reduced to their numeric id.
///
/// # Examples
///
/// ```
/// use vimirror_core::VideoId;
///
/// assert_eq!(VideoId::parse("76979871").unwrap().as_str(), "76979871");
/// assert_eq!(VideoId::parse("https://vimeo.com/76979871").unwrap().as_str(), "76979871");
/// assert_eq!(
///     VideoId::parse("https://player.vimeo.com/video/76979871?h=8272103f6e").unwrap().as_str(),
///     "76979871"
/// );
/// assert!(VideoId::parse("   ").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("{}", _0)]
pub struct VideoId(String);

impl VideoId {
    /// Parse user input into a video id.
    ///
    /// Returns `None` for blank input. Input that is neither numeric nor a
    /// recognizable Vimeo link is kept verbatim and left for the API to judge.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        if trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Some(Self(trimmed.to_string()));
        }

        if let Some(id) = VIMEO_URL.captures(trimmed).and_then(|c| c.get(1)) {
            tracing::debug!(input = %trimmed, id = id.as_str(), "Extracted video id from URL");
            return Some(Self(id.as_str().to_string()));
        }

        Some(Self(trimmed.to_string()))
    }

    /// The identifier as sent to the API.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
