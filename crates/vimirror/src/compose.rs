//! Responsive `<video>` markup.

use tracing::debug;
use vimirror_core::{MirroredFiles, RenditionDescriptor, VideoAttributes};

/// One `<source>` child of the emitted tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    /// Public URL of the stored file
    pub src: String,
    /// Media query selecting this source, empty for the catch-all
    pub media: String,
}

/// Assign a width range to every rendition that has a mirrored file.
///
/// Renditions are ordered widest first. The widest source covers everything at
/// or above its width, each following one covers the gap up to the previous
/// width, and the narrowest gets an empty query so it catches all remaining
/// viewports. Descriptors without a file are skipped; when a rendition appears
/// twice, the width of the last descriptor wins.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use vimirror::breakpoints;
/// use vimirror_core::{MirroredFiles, RenditionDescriptor};
///
/// let descriptor = |rendition: &str, width: u32| {
///     RenditionDescriptor::builder()
///         .rendition(rendition)
///         .width(width)
///         .created_time(Utc::now())
///         .size(1u64)
///         .build()
///         .unwrap()
/// };
/// let files = MirroredFiles::from([
///     ("1080p".to_string(), "a.mp4".to_string()),
///     ("360p".to_string(), "b.mp4".to_string()),
/// ]);
///
/// let sources = breakpoints(&files, &[descriptor("360p", 640), descriptor("1080p", 1920)], |f| f.to_string());
/// assert_eq!(sources[0].media, "(min-width: 1920px)");
/// assert_eq!(sources[1].media, "");
/// ```
pub fn breakpoints(
    files: &MirroredFiles,
    descriptors: &[RenditionDescriptor],
    url_for: impl Fn(&str) -> String,
) -> Vec<Source> {
    // Rendition order is first appearance, width is last appearance
    let mut matched: Vec<(&str, u32, &String)> = Vec::new();
    for descriptor in descriptors {
        let Some(file) = files.get(descriptor.rendition()) else {
            continue;
        };
        match matched
            .iter_mut()
            .find(|(rendition, _, _)| *rendition == descriptor.rendition().as_str())
        {
            Some(seen) => seen.1 = *descriptor.width(),
            None => matched.push((descriptor.rendition().as_str(), *descriptor.width(), file)),
        }
    }

    // Stable, so equal widths keep descriptor order
    matched.sort_by(|(_, a, _), (_, b, _)| b.cmp(a));

    let mut sources = Vec::with_capacity(matched.len());
    let mut upper: Option<u32> = None;
    for (_, width, file) in matched {
        let media = match upper {
            None => format!("(min-width: {}px)", width),
            Some(max) => format!("(min-width: {}px) and (max-width: {}px)", width, max),
        };
        sources.push(Source {
            src: url_for(file),
            media,
        });
        upper = Some(width.saturating_sub(1));
    }

    if let Some(last) = sources.last_mut() {
        last.media.clear();
    }

    sources
}

/// Render the full `<video>` tag for the mirrored files.
///
/// With no matching files this is the same as [`empty_tag`].
pub fn compose(
    files: &MirroredFiles,
    descriptors: &[RenditionDescriptor],
    attributes: &VideoAttributes,
    url_for: impl Fn(&str) -> String,
) -> String {
    let sources = breakpoints(files, descriptors, url_for);
    debug!(sources = sources.len(), "Composing video tag");

    let children = sources
        .iter()
        .map(|source| {
            format!(
                r#"<source src="{}" type="video/mp4" media="{}">"#,
                escape(&source.src),
                escape(&source.media)
            )
        })
        .collect::<Vec<_>>()
        .join("\n    ");

    format!("<video{}>{}</video>", render_attributes(attributes), children)
}

/// The `<video>` element without any source.
pub fn empty_tag(attributes: &VideoAttributes) -> String {
    format!("<video{}></video>", render_attributes(attributes))
}

fn render_attributes(attributes: &VideoAttributes) -> String {
    let mut out = String::new();

    let mut text = |name: &str, value: Option<&str>| {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            out.push_str(&format!(r#" {}="{}""#, name, escape(value)));
        }
    };
    text("id", attributes.id().as_deref());
    text("class", attributes.class().as_deref());
    text("preload", attributes.preload().as_ref().map(AsRef::<str>::as_ref));

    for (name, on) in [
        ("muted", *attributes.muted()),
        ("loop", *attributes.loop_playback()),
        ("controls", *attributes.controls()),
        ("autoplay", *attributes.autoplay()),
        ("playsinline", *attributes.playsinline()),
    ] {
        if on {
            out.push(' ');
            out.push_str(name);
        }
    }

    if let Some(poster) = attributes.poster().as_deref().filter(|p| !p.is_empty()) {
        out.push_str(&format!(r#" poster="{}""#, escape(poster)));
    }

    out
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
