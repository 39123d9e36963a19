//! Local cache for remote assets (slide images).
//!
//! An asset is fetched at most once: if its file already exists in the cache
//! directory the existing copy is used as-is, with no network access.

use crate::container::write_atomic;
use crate::error::{Error, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default timeout for a single asset download.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent sent with every download.
pub const DEFAULT_USER_AGENT: &str = concat!("vetdeck/", env!("CARGO_PKG_VERSION"));

/// A remote resource and the local file name it is cached under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    /// Stable key slides use to reference the asset
    pub key: String,
    /// Remote location
    pub url: String,
    /// File name inside the cache directory
    pub file_name: String,
}

impl AssetRef {
    pub fn new(key: impl Into<String>, url: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            url: url.into(),
            file_name: file_name.into(),
        }
    }
}

/// Source of remote bytes.
pub trait Fetch {
    /// Download the full body at `url`.
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        (**self).fetch(url)
    }
}

/// Blocking HTTP fetcher with a bounded per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a fetcher whose requests give up after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Self::build(timeout, DEFAULT_USER_AGENT)
    }

    /// Create a fetcher with an explicit timeout and user agent.
    pub fn build(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::Fetch {
                url: String::new(),
                message: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let fetch_error = |e: reqwest::Error| Error::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self.client.get(url).send().map_err(fetch_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().map_err(fetch_error)?;
        Ok(body.to_vec())
    }
}

/// Check that a cache file name cannot escape the cache directory.
fn validate_file_name(file_name: &str) -> Result<()> {
    let bad = file_name.is_empty()
        || file_name == "."
        || file_name == ".."
        || file_name.contains(['/', '\\'])
        || file_name.contains('\0');
    if bad {
        return Err(Error::InvalidData(format!(
            "asset file name must be a plain file name: {:?}",
            file_name
        )));
    }
    Ok(())
}

/// Directory-backed asset cache keyed by file name.
#[derive(Debug)]
pub struct AssetCache<F: Fetch> {
    dir: PathBuf,
    fetcher: F,
}

impl<F: Fetch> AssetCache<F> {
    /// Create a cache rooted at `dir` (created on first download).
    pub fn new(dir: impl Into<PathBuf>, fetcher: F) -> Self {
        Self {
            dir: dir.into(),
            fetcher,
        }
    }

    /// Cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The fetcher used for cache misses.
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Ensure `file_name` exists in the cache, downloading `url` if it does not.
    ///
    /// Returns the local path. An existing file is never re-downloaded or
    /// validated. On a miss the response body is written verbatim through a
    /// temporary file, so an interrupted download never leaves a file under
    /// `file_name`.
    pub fn ensure_local(&self, url: &str, file_name: &str) -> Result<PathBuf> {
        validate_file_name(file_name)?;
        let path = self.dir.join(file_name);

        if path.is_file() {
            debug!("asset cache hit: {}", path.display());
            return Ok(path);
        }

        info!("downloading {} -> {}", url, path.display());
        let body = self.fetcher.fetch(url)?;

        if !self.dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.dir)?;
        }
        write_atomic(&path, &body)?;
        debug!("cached {} bytes at {}", body.len(), path.display());

        Ok(path)
    }

    /// Ensure a single asset is cached.
    pub fn ensure(&self, asset: &AssetRef) -> Result<PathBuf> {
        self.ensure_local(&asset.url, &asset.file_name)
    }

    /// Resolve every asset in order; the first failure aborts.
    pub fn resolve_all(&self, assets: &[AssetRef]) -> Result<ResolvedAssets> {
        let mut resolved = ResolvedAssets::default();
        for asset in assets {
            let path = self.ensure(asset)?;
            resolved.insert(asset.key.clone(), path);
        }
        Ok(resolved)
    }
}

/// Asset keys mapped to local files, produced before any slide is built.
#[derive(Debug, Clone, Default)]
pub struct ResolvedAssets {
    paths: HashMap<String, PathBuf>,
}

impl ResolvedAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a local file for a key.
    pub fn insert(&mut self, key: impl Into<String>, path: impl Into<PathBuf>) {
        self.paths.insert(key.into(), path.into());
    }

    /// Local path for `key`.
    pub fn path(&self, key: &str) -> Result<&Path> {
        self.paths
            .get(key)
            .map(PathBuf::as_path)
            .ok_or_else(|| Error::UnknownAsset(key.to_string()))
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
