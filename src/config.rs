//! Invocation configuration
//!
//! Replaces a process-wide upload folder with an explicit value that is passed
//! to the dataset loader and the scene filter for the lifetime of one run.

use std::path::{Path, PathBuf};

/// Default number of table rows loaded per invocation
pub const DEFAULT_ROW_LIMIT: usize = 10_000;

/// Separator placed between the pattern tokens and the source file name
pub const OUTPUT_NAME_SEPARATOR: &str = "_";

/// Configuration for one take-off run
///
/// # Example
///
/// ```
/// use qto::TakeoffConfig;
///
/// let config = TakeoffConfig::new()
///     .with_base_dir("/srv/qto/uploads")
///     .with_row_limit(500);
///
/// assert_eq!(config.row_limit(), 500);
/// assert_eq!(
///     config.resolve("house.csv"),
///     std::path::PathBuf::from("/srv/qto/uploads/house.csv")
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TakeoffConfig {
    /// Directory that relative dataset and scene paths are resolved against
    base_dir: PathBuf,
    /// Directory pruned scenes are written to; `None` writes next to the source
    output_dir: Option<PathBuf>,
    /// Maximum number of data rows read from the table
    row_limit: usize,
}

impl TakeoffConfig {
    /// Create a configuration rooted at the current directory
    pub fn new() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            output_dir: None,
            row_limit: DEFAULT_ROW_LIMIT,
        }
    }

    /// Load configuration from environment variables
    ///
    /// - `QTO_BASE_DIR`: base directory (default `.`)
    /// - `QTO_OUTPUT_DIR`: output directory (default: next to the source scene)
    /// - `QTO_ROW_LIMIT`: row cap (default 10000; unparseable values fall back)
    pub fn from_env() -> Self {
        Self {
            base_dir: std::env::var("QTO_BASE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            output_dir: std::env::var("QTO_OUTPUT_DIR").ok().map(PathBuf::from),
            row_limit: std::env::var("QTO_ROW_LIMIT")
                .unwrap_or_else(|_| DEFAULT_ROW_LIMIT.to_string())
                .parse()
                .unwrap_or(DEFAULT_ROW_LIMIT),
        }
    }

    /// Set the base directory
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = dir.into();
        self
    }

    /// Write pruned scenes into `dir` instead of next to the source scene
    ///
    /// Giving each session its own directory avoids two runs with the same
    /// pattern racing on the same output path.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Set the maximum number of rows read from the dataset
    pub fn with_row_limit(mut self, limit: usize) -> Self {
        self.row_limit = limit;
        self
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the configured output directory, if any
    pub fn output_dir(&self) -> Option<&Path> {
        self.output_dir.as_deref()
    }

    /// Get the row cap
    pub fn row_limit(&self) -> usize {
        self.row_limit
    }

    /// Resolve a dataset or scene path against the base directory
    ///
    /// Absolute paths are returned unchanged.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Directory a pruned copy of `source` is written to
    pub fn output_dir_for(&self, source: &Path) -> PathBuf {
        match &self.output_dir {
            Some(dir) => self.resolve(dir),
            None => source
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        }
    }
}

impl Default for TakeoffConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TakeoffConfig::new();
        assert_eq!(config.row_limit(), DEFAULT_ROW_LIMIT);
        assert_eq!(config.base_dir(), Path::new("."));
        assert!(config.output_dir().is_none());
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let config = TakeoffConfig::new().with_base_dir("/data/uploads");
        assert_eq!(
            config.resolve("a/house.dae"),
            PathBuf::from("/data/uploads/a/house.dae")
        );
        assert_eq!(config.resolve("/tmp/x.dae"), PathBuf::from("/tmp/x.dae"));
    }

    #[test]
    fn test_output_dir_defaults_to_source_parent() {
        let config = TakeoffConfig::new();
        assert_eq!(
            config.output_dir_for(Path::new("/data/house.dae")),
            PathBuf::from("/data")
        );
        assert_eq!(
            config.output_dir_for(Path::new("house.dae")),
            PathBuf::from(".")
        );
    }

    #[test]
    fn test_output_dir_override_is_resolved() {
        let config = TakeoffConfig::new()
            .with_base_dir("/data")
            .with_output_dir("session-1");
        assert_eq!(
            config.output_dir_for(Path::new("/elsewhere/house.dae")),
            PathBuf::from("/data/session-1")
        );
    }
}
