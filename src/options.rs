//! Build configuration.

use crate::asset::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use crate::content::OUTPUT_FILE;
use std::path::PathBuf;
use std::time::Duration;

/// Options for building a deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Where the presentation is written
    pub output: PathBuf,

    /// Directory holding cached assets (created on first download)
    pub cache_dir: PathBuf,

    /// Per-request download timeout
    pub timeout: Duration,

    /// User agent for asset downloads
    pub user_agent: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from(OUTPUT_FILE),
            cache_dir: PathBuf::from("."),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl BuildOptions {
    /// Create new build options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output file.
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = path.into();
        self
    }

    /// Set the asset cache directory.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Set the download timeout. Zero is raised to one second.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout.max(Duration::from_secs(1));
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
