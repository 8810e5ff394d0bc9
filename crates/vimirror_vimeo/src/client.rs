use crate::{VideoSource, parse_metadata};
use futures_util::StreamExt;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, instrument, warn};
use vimirror_core::{RenditionDescriptor, VideoId};
use vimirror_error::{
    ConfigError, DownloadError, DownloadErrorKind, FetchError, FetchErrorKind, VimirrorResult,
};

/// Production Vimeo API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.vimeo.com";

/// Upper bound for a metadata request, and for connecting or waiting on the
/// next chunk of a download.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound for a whole rendition download.
pub const DEFAULT_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Vimeo API client.
///
/// Authenticates every request, including rendition downloads, with the
/// configured bearer token.
///
/// Metadata requests must complete within `timeout`. Downloads may run up to
/// the download timeout as long as the body keeps arriving; a stall longer than
/// `timeout` between chunks aborts them.
#[derive(Debug, Clone)]
pub struct VimeoClient {
    client: Client,
    api_token: String,
    base_url: String,
    timeout: Duration,
    download_timeout: Duration,
}

impl VimeoClient {
    /// Creates a new Vimeo client.
    ///
    /// # Arguments
    ///
    /// * `api_token` - Vimeo personal access token
    /// * `base_url` - API root, normally [`DEFAULT_API_BASE_URL`]
    /// * `timeout` - Metadata request timeout and download idle timeout; expiry
    ///   counts as a transport failure
    pub fn new(
        api_token: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> VimirrorResult<Self> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .read_timeout(timeout)
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, timeout = ?timeout, "Creating new Vimeo client");

        Ok(Self {
            client,
            api_token: api_token.into(),
            base_url,
            timeout,
            download_timeout: DEFAULT_DOWNLOAD_TIMEOUT,
        })
    }

    /// Set the upper bound for a whole rendition download.
    pub fn with_download_timeout(mut self, download_timeout: Duration) -> Self {
        self.download_timeout = download_timeout;
        self
    }

    fn authorization(&self) -> String {
        format!("bearer {}", self.api_token)
    }
}

#[async_trait::async_trait]
impl VideoSource for VimeoClient {
    #[instrument(skip(self), fields(video_id = %video_id))]
    async fn fetch_renditions(
        &self,
        video_id: &VideoId,
    ) -> Result<Vec<RenditionDescriptor>, FetchError> {
        let url = format!("{}/videos/{}", self.base_url, video_id);
        debug!(url = %url, "Requesting video metadata");

        let response = self
            .client
            .get(&url)
            .query(&[("fields", "download")])
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send metadata request");
                FetchError::new(FetchErrorKind::Transport(e.to_string()))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(error = ?e, "Failed to read metadata response");
            FetchError::new(FetchErrorKind::Transport(e.to_string()))
        })?;

        if !status.is_success() {
            warn!(status = %status, body = %body, "Vimeo API returned error status");
            return Err(FetchError::new(FetchErrorKind::Status {
                status: status.as_u16(),
                message: body,
            }));
        }

        let renditions = parse_metadata(&body).inspect_err(|e| {
            warn!(error = %e, "Unusable metadata response");
        })?;

        debug!(count = renditions.len(), "Received rendition list");
        Ok(renditions)
    }

    #[instrument(skip(self, link), fields(destination = %destination.display()))]
    async fn download(&self, link: &str, destination: &Path) -> Result<u64, DownloadError> {
        let response = self
            .client
            .get(link)
            .header(reqwest::header::AUTHORIZATION, self.authorization())
            .timeout(self.download_timeout)
            .send()
            .await
            .map_err(|e| DownloadError::new(DownloadErrorKind::Transport(e.to_string())))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::new(DownloadErrorKind::Status(status.as_u16())));
        }

        let mut file = tokio::fs::File::create(destination)
            .await
            .map_err(|e| DownloadError::new(DownloadErrorKind::Buffer(e.to_string())))?;

        let mut written = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk =
                chunk.map_err(|e| DownloadError::new(DownloadErrorKind::Transport(e.to_string())))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| DownloadError::new(DownloadErrorKind::Buffer(e.to_string())))?;
            written += chunk.len() as u64;
        }

        file.flush()
            .await
            .map_err(|e| DownloadError::new(DownloadErrorKind::Buffer(e.to_string())))?;

        debug!(bytes = written, "Downloaded rendition");
        Ok(written)
    }
}
