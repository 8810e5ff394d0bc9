//! Configuration for the helper.
//!
//! Sources, later ones overriding earlier ones:
//! - Bundled defaults (include_str! from vimirror.toml)
//! - `~/.config/vimirror/vimirror.toml`
//! - `./vimirror.toml`
//! - `VIMIRROR_*` environment variables

use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, instrument};
use vimirror_cache::CacheConfig;
use vimirror_error::{ConfigError, VimirrorError, VimirrorResult};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../vimirror.toml");

/// Top-level vimirror configuration.
///
/// # Example
///
/// ```no_run
/// use vimirror::VimirrorConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = VimirrorConfig::load()?;
/// println!("Mirroring into {:?}", config.folder());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct VimirrorConfig {
    /// Vimeo API bearer token
    #[serde(default)]
    api_token: Option<String>,

    /// Storage folder receiving mirrored renditions
    #[serde(default)]
    folder: Option<String>,

    /// Vimeo API root
    #[serde(default = "default_api_base_url")]
    api_base_url: String,

    /// Directory backing the storage
    #[serde(default = "default_storage_root")]
    storage_root: PathBuf,

    /// URL path under which `storage_root` is served
    #[serde(default = "default_public_prefix")]
    public_prefix: String,

    /// Location of the result cache document
    #[serde(default = "default_cache_path")]
    cache_path: PathBuf,

    /// Seconds before a cached result is refetched
    #[serde(default = "default_cache_timeout_secs")]
    cache_timeout_secs: u64,

    /// Seconds before a cached result is deleted
    #[serde(default = "default_cache_max_age_secs")]
    cache_max_age_secs: u64,

    /// Metadata request timeout, and longest stall within a download, in seconds
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,

    /// Upper bound for a whole rendition download in seconds
    #[serde(default = "default_download_timeout_secs")]
    download_timeout_secs: u64,

    /// Directory for transient download buffers (system temp dir if unset)
    #[serde(default)]
    download_dir: Option<PathBuf>,
}

fn default_api_base_url() -> String {
    vimirror_vimeo::DEFAULT_API_BASE_URL.to_string()
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("public/fileadmin")
}

fn default_public_prefix() -> String {
    "/fileadmin".to_string()
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("var/vimirror/cache.json")
}

fn default_cache_timeout_secs() -> u64 {
    *CacheConfig::default().cache_timeout()
}

fn default_cache_max_age_secs() -> u64 {
    *CacheConfig::default().max_age()
}

fn default_request_timeout_secs() -> u64 {
    vimirror_vimeo::DEFAULT_TIMEOUT.as_secs()
}

fn default_download_timeout_secs() -> u64 {
    vimirror_vimeo::DEFAULT_DOWNLOAD_TIMEOUT.as_secs()
}

impl Default for VimirrorConfig {
    fn default() -> Self {
        Self {
            api_token: None,
            folder: None,
            api_base_url: default_api_base_url(),
            storage_root: default_storage_root(),
            public_prefix: default_public_prefix(),
            cache_path: default_cache_path(),
            cache_timeout_secs: default_cache_timeout_secs(),
            cache_max_age_secs: default_cache_max_age_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            download_timeout_secs: default_download_timeout_secs(),
            download_dir: None,
        }
    }
}

impl VimirrorConfig {
    /// Load configuration with precedence: environment > current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> VimirrorResult<Self> {
        debug!("Loading configuration");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(config_dir) = dirs::config_dir() {
            let home_config = config_dir.join("vimirror/vimirror.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder
            .add_source(File::with_name("vimirror").required(false))
            .add_source(Environment::with_prefix("VIMIRROR"));

        Self::finish(builder)
    }

    /// Load configuration from a specific file on top of the bundled defaults.
    ///
    /// Environment variables still take precedence over the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> VimirrorResult<Self> {
        debug!("Loading configuration from file");

        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()))
            .add_source(Environment::with_prefix("VIMIRROR"));

        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> VimirrorResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| {
                VimirrorError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                VimirrorError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;

        config.cache_config().validate()?;
        Ok(config)
    }

    /// Set the API token.
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Set the mirror folder.
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    /// Set the storage root directory.
    pub fn with_storage_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.storage_root = root.into();
        self
    }

    /// Set the cache document location.
    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.cache_path = path.into();
        self
    }

    /// Set the transient download directory.
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = Some(dir.into());
        self
    }

    /// Token and folder, both required before anything is fetched.
    ///
    /// # Errors
    ///
    /// Returns an error if either is missing or blank.
    pub fn credentials(&self) -> Result<(&str, &str), ConfigError> {
        let token = self
            .api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());
        let folder = self
            .folder
            .as_deref()
            .map(|f| f.trim().trim_matches('/'))
            .filter(|f| !f.is_empty());

        match (token, folder) {
            (Some(token), Some(folder)) => Ok((token, folder)),
            (None, _) => Err(ConfigError::new("Vimeo API token not set")),
            (_, None) => Err(ConfigError::new("Vimeo folder not set")),
        }
    }

    /// Result cache timing.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::default()
            .with_cache_timeout(self.cache_timeout_secs)
            .with_max_age(self.cache_max_age_secs)
    }

    /// Metadata request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Whole-download timeout.
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    /// Directory for transient download buffers.
    pub fn download_buffer_dir(&self) -> PathBuf {
        self.download_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
