//! Result cache implementation.

use crate::CacheConfig;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use uuid::Uuid;
use vimirror_core::{MirroredFiles, RenditionDescriptor};
use vimirror_error::{JsonError, StorageError, StorageErrorKind, VimirrorResult};

/// Cached outcome of one mirroring pass for a video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct CacheEntry {
    /// When the video was last checked against the API (unix seconds)
    last_check: i64,
    /// Rendition label to stored filename
    #[serde(default)]
    files: MirroredFiles,
    /// Descriptors the files were produced from, without download links
    #[serde(default)]
    download_infos: Vec<RenditionDescriptor>,
}

impl CacheEntry {
    /// Create an entry checked at `now`.
    pub fn new(
        files: MirroredFiles,
        download_infos: Vec<RenditionDescriptor>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            last_check: now.timestamp(),
            files,
            download_infos,
        }
    }

    /// Seconds elapsed between the last check and `now`.
    pub fn age_at(&self, now: DateTime<Utc>) -> i64 {
        now.timestamp() - self.last_check
    }

    /// The last check as a timestamp.
    pub fn last_checked_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.last_check, 0)
    }
}

type Document = BTreeMap<String, CacheEntry>;

/// Durable cache mapping a video id to its last mirrored rendition set.
///
/// The whole cache is one pretty-printed JSON document, reread before and
/// rewritten after every mutating operation, so several processes sharing the
/// file converge on the latest write. Writes go through a temporary file and an
/// atomic rename; within a process, operations are serialized by a mutex.
/// Concurrent writers in different processes can still lose each other's update.
///
/// # Example
///
/// ```no_run
/// use vimirror_cache::{CacheConfig, ResultCache};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let cache = ResultCache::open("/var/cache/vimirror/cache.json", CacheConfig::default()).await?;
///
/// let entry = cache.get("76979871").await?;
/// if cache.is_stale(entry.as_ref()) {
///     // fetch, mirror, then cache.put(...)
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ResultCache {
    path: PathBuf,
    config: CacheConfig,
    lock: Mutex<()>,
}

impl ResultCache {
    /// Open the cache document at `path`.
    ///
    /// The file is created lazily on the first write. An existing but corrupt
    /// document is treated as empty and replaced on the next write.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or an existing file
    /// cannot be read.
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub async fn open(path: impl AsRef<Path>, config: CacheConfig) -> VimirrorResult<Self> {
        config.validate()?;
        let path = path.as_ref().to_path_buf();

        let entries = Self::load(&path).await?;
        tracing::debug!(
            entries = entries.len(),
            cache_timeout = config.cache_timeout(),
            max_age = config.max_age(),
            "Opened result cache"
        );

        Ok(Self {
            path,
            config,
            lock: Mutex::new(()),
        })
    }

    /// Location of the cache document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Timing configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Look up a video, evicting expired entries first.
    pub async fn get(&self, video_id: &str) -> VimirrorResult<Option<CacheEntry>> {
        self.get_at(video_id, Utc::now()).await
    }

    /// [`get`](Self::get) as of `now`.
    #[tracing::instrument(skip(self, now))]
    pub async fn get_at(
        &self,
        video_id: &str,
        now: DateTime<Utc>,
    ) -> VimirrorResult<Option<CacheEntry>> {
        let _guard = self.lock.lock().await;
        let mut entries = Self::load(&self.path).await?;

        if self.evict_from(&mut entries, now) > 0 {
            self.persist(&entries).await?;
        }

        let entry = entries.remove(video_id);
        tracing::debug!(hit = entry.is_some(), "Cache lookup");
        Ok(entry)
    }

    /// Whether an entry needs to be refreshed. Absent entries are stale.
    pub fn is_stale(&self, entry: Option<&CacheEntry>) -> bool {
        self.is_stale_at(entry, Utc::now())
    }

    /// [`is_stale`](Self::is_stale) as of `now`.
    pub fn is_stale_at(&self, entry: Option<&CacheEntry>, now: DateTime<Utc>) -> bool {
        match entry {
            Some(entry) => entry.age_at(now) >= self.timeout_secs(),
            None => true,
        }
    }

    /// Store the outcome of a mirroring pass, stamped with the current time.
    pub async fn put(
        &self,
        video_id: &str,
        files: MirroredFiles,
        download_infos: Vec<RenditionDescriptor>,
    ) -> VimirrorResult<()> {
        self.put_at(video_id, files, download_infos, Utc::now()).await
    }

    /// [`put`](Self::put) stamped with `now`.
    #[tracing::instrument(skip(self, files, download_infos, now), fields(files = files.len()))]
    pub async fn put_at(
        &self,
        video_id: &str,
        files: MirroredFiles,
        download_infos: Vec<RenditionDescriptor>,
        now: DateTime<Utc>,
    ) -> VimirrorResult<()> {
        let _guard = self.lock.lock().await;
        let mut entries = Self::load(&self.path).await?;

        entries.insert(
            video_id.to_string(),
            CacheEntry::new(files, download_infos, now),
        );
        self.persist(&entries).await?;

        tracing::debug!(entries = entries.len(), "Stored cache entry");
        Ok(())
    }

    /// Delete every entry older than the maximum age, returning how many went.
    pub async fn evict_expired(&self) -> VimirrorResult<usize> {
        self.evict_expired_at(Utc::now()).await
    }

    /// [`evict_expired`](Self::evict_expired) as of `now`.
    #[tracing::instrument(skip(self, now))]
    pub async fn evict_expired_at(&self, now: DateTime<Utc>) -> VimirrorResult<usize> {
        let _guard = self.lock.lock().await;
        let mut entries = Self::load(&self.path).await?;

        let removed = self.evict_from(&mut entries, now);
        if removed > 0 {
            self.persist(&entries).await?;
        }
        Ok(removed)
    }

    /// Number of entries currently stored.
    pub async fn len(&self) -> VimirrorResult<usize> {
        let _guard = self.lock.lock().await;
        Ok(Self::load(&self.path).await?.len())
    }

    /// Whether the cache holds no entries.
    pub async fn is_empty(&self) -> VimirrorResult<bool> {
        Ok(self.len().await? == 0)
    }

    fn timeout_secs(&self) -> i64 {
        i64::try_from(*self.config.cache_timeout()).unwrap_or(i64::MAX)
    }

    fn max_age_secs(&self) -> i64 {
        i64::try_from(*self.config.max_age()).unwrap_or(i64::MAX)
    }

    fn evict_from(&self, entries: &mut Document, now: DateTime<Utc>) -> usize {
        let max_age = self.max_age_secs();
        let before = entries.len();
        entries.retain(|video_id, entry| {
            let keep = entry.age_at(now) < max_age;
            if !keep {
                tracing::debug!(video_id = %video_id, age = entry.age_at(now), "Evicting expired entry");
            }
            keep
        });

        let removed = before - entries.len();
        if removed > 0 {
            tracing::info!(removed, remaining = entries.len(), "Evicted expired cache entries");
        }
        removed
    }

    async fn load(path: &Path) -> VimirrorResult<Document> {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Document::new()),
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
                .into());
            }
        };

        if contents.trim().is_empty() {
            return Ok(Document::new());
        }

        match serde_json::from_str(&contents) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Cache document is corrupt, starting empty"
                );
                Ok(Document::new())
            }
        }
    }

    async fn persist(&self, entries: &Document) -> VimirrorResult<()> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| JsonError::new(format!("Failed to serialize cache: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        // Write to temp file first, then rename for atomicity
        let mut temp_name = self.path.as_os_str().to_owned();
        temp_name.push(format!(".{}.tmp", Uuid::new_v4()));
        let temp_path = PathBuf::from(temp_name);

        tokio::fs::write(&temp_path, json).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        if let Err(e) = tokio::fs::rename(&temp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            )))
            .into());
        }

        Ok(())
    }
}
