//! The page-level entry point: video id and attributes in, markup out.

use crate::{Mirror, VimirrorConfig, compose, empty_tag};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use vimirror_cache::{CacheEntry, ResultCache};
use vimirror_core::{MirroredFiles, RenditionDescriptor, VideoAttributes, VideoId};
use vimirror_error::VimirrorResult;
use vimirror_storage::{FileSystemStorage, MediaStorage};
use vimirror_vimeo::{VideoSource, VimeoClient};

/// Returned in place of markup when the API token or folder is missing.
pub const CONFIG_MISSING_MESSAGE: &str =
    "Error: Vimeo API token or folder not set in extension configuration";

/// Returned by callers that could not load any configuration at all.
pub const CONFIG_UNAVAILABLE_MESSAGE: &str =
    "Error: Unable to retrieve extension configuration";

/// Renders a responsive `<video>` tag for a Vimeo video, mirroring its
/// renditions into local storage on the way.
///
/// [`render`](Self::render) never fails. A blank id or a failed API request
/// yields an empty `<video>` element, missing credentials yield
/// [`CONFIG_MISSING_MESSAGE`], and individual renditions that cannot be
/// mirrored are left out of the tag.
///
/// # Example
///
/// ```no_run
/// use vimirror::{Helper, VimirrorConfig};
/// use vimirror_core::VideoAttributes;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let helper = Helper::from_config(VimirrorConfig::load()?).await?;
/// let attributes = VideoAttributes::builder().class("video-js").muted(true).build()?;
///
/// println!("{}", helper.render("76979871", &attributes).await);
/// # Ok(())
/// # }
/// ```
pub struct Helper {
    config: VimirrorConfig,
    source: Arc<dyn VideoSource>,
    storage: Arc<dyn MediaStorage>,
    cache: Arc<ResultCache>,
}

impl Helper {
    /// Assemble a helper from its collaborators.
    pub fn new(
        config: VimirrorConfig,
        source: Arc<dyn VideoSource>,
        storage: Arc<dyn MediaStorage>,
        cache: Arc<ResultCache>,
    ) -> Self {
        Self {
            config,
            source,
            storage,
            cache,
        }
    }

    /// Build the Vimeo client, filesystem storage and result cache from configuration.
    ///
    /// A missing API token is not an error here; [`render`](Self::render)
    /// reports it instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client, the storage root or the cache
    /// cannot be set up.
    #[instrument(skip(config))]
    pub async fn from_config(config: VimirrorConfig) -> VimirrorResult<Self> {
        let token = config.api_token().clone().unwrap_or_default();
        let source = VimeoClient::new(
            token.trim(),
            config.api_base_url().clone(),
            config.request_timeout(),
        )?
        .with_download_timeout(config.download_timeout());
        let storage = FileSystemStorage::new(
            config.storage_root().clone(),
            config.public_prefix().clone(),
        )?;
        let cache = ResultCache::open(config.cache_path(), config.cache_config()).await?;

        Ok(Self::new(
            config,
            Arc::new(source),
            Arc::new(storage),
            Arc::new(cache),
        ))
    }

    /// Configuration in use.
    pub fn config(&self) -> &VimirrorConfig {
        &self.config
    }

    /// The result cache shared by every render.
    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Render the `<video>` tag for `video_id`.
    #[instrument(skip(self, attributes), fields(use_cache = *attributes.use_cache()))]
    pub async fn render(&self, video_id: &str, attributes: &VideoAttributes) -> String {
        let Some(video_id) = VideoId::parse(video_id) else {
            debug!("No video id given");
            return empty_tag(attributes);
        };

        let folder = match self.config.credentials() {
            Ok((_, folder)) => folder,
            Err(e) => {
                warn!(error = %e, "Helper is not configured");
                return CONFIG_MISSING_MESSAGE.to_string();
            }
        };

        if *attributes.use_cache()
            && let Some(entry) = self.fresh_entry(&video_id).await
        {
            debug!(files = entry.files().len(), "Serving from cache");
            return compose(entry.files(), entry.download_infos(), attributes, |file| {
                self.storage.public_path(folder, file)
            });
        }

        let descriptors = match self.source.fetch_renditions(&video_id).await {
            Ok(descriptors) => descriptors,
            Err(e) => {
                error!(video_id = %video_id, error = %e, "Failed to fetch renditions");
                return empty_tag(attributes);
            }
        };

        let files = self.mirror(&video_id, folder, &descriptors).await;
        self.remember(&video_id, &files, &descriptors).await;

        compose(&files, &descriptors, attributes, |file| {
            self.storage.public_path(folder, file)
        })
    }

    async fn fresh_entry(&self, video_id: &VideoId) -> Option<CacheEntry> {
        match self.cache.get(video_id.as_str()).await {
            Ok(entry) if !self.cache.is_stale(entry.as_ref()) => entry,
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Cache read failed, fetching instead");
                None
            }
        }
    }

    async fn mirror(
        &self,
        video_id: &VideoId,
        folder: &str,
        descriptors: &[RenditionDescriptor],
    ) -> MirroredFiles {
        let existing = match self.storage.list_files(folder).await {
            Ok(existing) => existing,
            Err(e) => {
                warn!(error = %e, "Cannot list mirror folder, treating it as empty");
                Vec::new()
            }
        };

        let mirror = Mirror::new(
            self.source.as_ref(),
            self.storage.as_ref(),
            folder,
            self.config.download_buffer_dir(),
        );
        let files = mirror.reconcile(descriptors, &existing).await;

        info!(
            video_id = %video_id,
            renditions = descriptors.len(),
            mirrored = files.len(),
            "Mirrored video"
        );
        files
    }

    async fn remember(
        &self,
        video_id: &VideoId,
        files: &MirroredFiles,
        descriptors: &[RenditionDescriptor],
    ) {
        if let Err(e) = self
            .cache
            .put(video_id.as_str(), files.clone(), descriptors.to_vec())
            .await
        {
            warn!(error = %e, "Cache write failed");
        }
    }
}
