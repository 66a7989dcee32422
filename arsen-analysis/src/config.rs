use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{AnalysisError, Result};

/// Tunables for the analysis engine and its caches.
///
/// Deserialized from a JSON file when one is supplied, otherwise the
/// defaults below apply.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of threads in the analysis worker pool.
    pub worker_threads: usize,
    /// Traversal cap per function during detection.
    pub max_function_instructions: usize,
    /// Minimum run of printable bytes to report as a string.
    pub min_string_length: usize,
    pub instruction_cache_capacity: usize,
    pub artifact_cache_capacity: usize,
    /// Cache entries expire this many seconds after their last access.
    pub cache_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            worker_threads: 4,
            max_function_instructions: 10_000,
            min_string_length: 4,
            instruction_cache_capacity: 10_000,
            artifact_cache_capacity: 1_000,
            cache_ttl_secs: 30 * 60,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path)
            .map_err(|e| AnalysisError::Config(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| AnalysisError::Config(format!("{}: {e}", path.display())))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}
