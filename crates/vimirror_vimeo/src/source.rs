//! Remote video source trait.

use std::path::Path;
use vimirror_core::{RenditionDescriptor, VideoId};
use vimirror_error::{DownloadError, FetchError};

/// Where rendition metadata and bytes come from.
#[async_trait::async_trait]
pub trait VideoSource: Send + Sync {
    /// Fetch the downloadable renditions of a video.
    ///
    /// A video without downloadable renditions yields an empty list.
    async fn fetch_renditions(
        &self,
        video_id: &VideoId,
    ) -> Result<Vec<RenditionDescriptor>, FetchError>;

    /// Download a rendition in full into `destination`, returning the byte count.
    ///
    /// On error `destination` may hold a partial body; the caller removes it.
    async fn download(&self, link: &str, destination: &Path) -> Result<u64, DownloadError>;
}
