//! Command-line interface for vimirror.
//!
//! - `render` mirrors a video and prints its `<video>` tag
//! - `evict` prunes expired entries from the result cache

use crate::{CONFIG_UNAVAILABLE_MESSAGE, Helper, VimirrorConfig};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use vimirror_core::{Preload, VideoAttributes, parse_flag};

/// vimirror - Mirror Vimeo renditions locally and print responsive video tags.
#[derive(Debug, Parser)]
#[command(name = "vimirror")]
#[command(about = "Mirror Vimeo renditions and render responsive <video> tags", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file to load instead of the default locations
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Mirror a video and print its <video> tag
    Render {
        /// Vimeo video id or link
        video: String,

        #[command(flatten)]
        tag: TagArgs,
    },

    /// Delete cache entries past their maximum age
    Evict,
}

/// Attributes of the rendered `<video>` element.
#[derive(Debug, Clone, Default, Args)]
pub struct TagArgs {
    /// Element id
    #[arg(long)]
    pub id: Option<String>,

    /// CSS class list
    #[arg(long)]
    pub class: Option<String>,

    /// Preload hint (auto, metadata, none)
    #[arg(long)]
    pub preload: Option<Preload>,

    /// Poster image URL
    #[arg(long)]
    pub poster: Option<String>,

    /// Start muted
    #[arg(long)]
    pub muted: bool,

    /// Restart when finished
    #[arg(long = "loop")]
    pub loop_playback: bool,

    /// Show native controls
    #[arg(long)]
    pub controls: bool,

    /// Start playing immediately
    #[arg(long)]
    pub autoplay: bool,

    /// Play inline on mobile
    #[arg(long)]
    pub playsinline: bool,

    /// Whether a fresh cache entry may be served (1/0, true/false, yes/no, on/off)
    #[arg(long, value_name = "FLAG", value_parser = parse_cache_flag)]
    pub use_cache: Option<bool>,

    /// Always ask the API, ignoring a fresh cache entry
    #[arg(long, conflicts_with = "use_cache")]
    pub no_cache: bool,
}

fn parse_cache_flag(value: &str) -> Result<bool, String> {
    parse_flag(value)
        .ok_or_else(|| format!("expected 1/0, true/false, yes/no or on/off, got '{}'", value))
}

/// Load configuration and set up the helper for a CLI run.
///
/// Any failure, from unreadable configuration to a storage root or cache
/// document that cannot be opened, is logged and reported as
/// [`CONFIG_UNAVAILABLE_MESSAGE`].
pub async fn open_helper(config_path: Option<&Path>) -> Result<Helper, &'static str> {
    let loaded = match config_path {
        Some(path) => VimirrorConfig::from_file(path),
        None => VimirrorConfig::load(),
    };
    let config = loaded.map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        CONFIG_UNAVAILABLE_MESSAGE
    })?;

    Helper::from_config(config).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to set up helper");
        CONFIG_UNAVAILABLE_MESSAGE
    })
}

impl From<TagArgs> for VideoAttributes {
    fn from(args: TagArgs) -> Self {
        let mut builder = VideoAttributes::builder();
        builder
            .muted(args.muted)
            .loop_playback(args.loop_playback)
            .controls(args.controls)
            .autoplay(args.autoplay)
            .playsinline(args.playsinline)
            .use_cache(args.use_cache.unwrap_or(true) && !args.no_cache);

        if let Some(id) = args.id {
            builder.id(id);
        }
        if let Some(class) = args.class {
            builder.class(class);
        }
        if let Some(preload) = args.preload {
            builder.preload(preload);
        }
        if let Some(poster) = args.poster {
            builder.poster(poster);
        }

        // Every field has a default
        builder.build().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_render_flags() {
        let cli = Cli::parse_from([
            "vimirror",
            "render",
            "https://vimeo.com/76979871",
            "--class",
            "video-js",
            "--preload",
            "none",
            "--muted",
            "--loop",
            "--no-cache",
        ]);

        let Commands::Render { video, tag } = cli.command else {
            panic!("expected render");
        };
        assert_eq!(video, "https://vimeo.com/76979871");

        let attributes = VideoAttributes::from(tag);
        assert_eq!(attributes.class().as_deref(), Some("video-js"));
        assert_eq!(*attributes.preload(), Some(Preload::None));
        assert!(*attributes.muted());
        assert!(*attributes.loop_playback());
        assert!(!*attributes.controls());
        assert!(!*attributes.use_cache());
    }

    #[test]
    fn parses_template_style_cache_flag() {
        let cli = Cli::parse_from(["vimirror", "render", "123", "--use-cache", "0"]);
        let Commands::Render { tag, .. } = cli.command else {
            panic!("expected render");
        };
        assert!(!*VideoAttributes::from(tag).use_cache());

        let cli = Cli::parse_from(["vimirror", "render", "123", "--use-cache", "Yes"]);
        let Commands::Render { tag, .. } = cli.command else {
            panic!("expected render");
        };
        assert!(*VideoAttributes::from(tag).use_cache());

        let invalid = Cli::try_parse_from(["vimirror", "render", "123", "--use-cache", "maybe"]);
        assert!(invalid.is_err());
    }

    #[test]
    fn global_options_follow_subcommand() {
        let cli = Cli::parse_from(["vimirror", "evict", "-v", "--config", "site.toml"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("site.toml")));
        assert!(matches!(cli.command, Commands::Evict));
    }

    #[test]
    fn default_tag_args_use_cache() {
        let attributes = VideoAttributes::from(TagArgs::default());
        assert!(*attributes.use_cache());
        assert_eq!(attributes, VideoAttributes::default());
    }
}
