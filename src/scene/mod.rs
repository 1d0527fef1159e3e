//! COLLADA scene filtering
//!
//! A scene document is read fully into memory, pruned down to the geometry
//! of matched elements and written to a new file next to the source (or
//! into the configured output directory). The source file is never modified.
//!
//! ```no_run
//! use qto::scene::{SceneFilter, SceneOutcome};
//! use qto::{MatchedIds, TakeoffConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TakeoffConfig::new().with_base_dir("uploads");
//! let ids: MatchedIds = ["12", "15"].into_iter().collect();
//!
//! match SceneFilter::new(&config).filter_file("house.dae", "[Ww]all", &ids)? {
//!     SceneOutcome::Written(scene) => println!("wrote {}", scene.file_name),
//!     SceneOutcome::NoMatch => println!("no items found"),
//! }
//! # Ok(())
//! # }
//! ```

mod document;
mod filter;
mod naming;
mod parser;
mod writer;

use std::path::{Path, PathBuf};

use crate::config::TakeoffConfig;
use crate::error::{Error, Result};
use crate::identifiers::MatchedIds;

pub use document::{Element, ItemId, SceneDocument};
pub use filter::{PruneReport, prune_scene};
pub use naming::{output_file_name, pattern_tokens};
pub use parser::parse_scene;
pub use writer::{write_scene, write_scene_atomic, write_scene_string};

/// Namespace of COLLADA 1.4 documents
pub const COLLADA_NAMESPACE: &str = "http://www.collada.org/2005/11/COLLADASchema";

impl SceneDocument {
    /// Read and parse a scene file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let xml = std::fs::read_to_string(path)?;
        parser::parse_scene_with_file(&xml, Some(&path.display().to_string()))
    }
}

/// A pruned scene that was written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FilteredScene {
    /// Derived file name, for download links
    pub file_name: String,
    /// Full output path
    pub path: PathBuf,
    /// What pruning changed
    pub report: PruneReport,
}

/// Result of a filter call that did not fail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneOutcome {
    /// The id set was empty; nothing was read or written
    NoMatch,
    /// A pruned copy was written
    Written(FilteredScene),
}

/// Scene graph filter bound to one invocation's configuration
#[derive(Debug, Clone, Copy)]
pub struct SceneFilter<'a> {
    config: &'a TakeoffConfig,
}

impl<'a> SceneFilter<'a> {
    /// Create a filter using `config` for path resolution and output placement
    pub fn new(config: &'a TakeoffConfig) -> Self {
        Self { config }
    }

    /// Prune `source` down to the geometry of `ids` and write the result
    ///
    /// # Errors
    ///
    /// Fails if the source cannot be read or parsed, or if the output cannot
    /// be written. No output file exists after a failure.
    pub fn filter_file(
        &self,
        source: impl AsRef<Path>,
        pattern: &str,
        ids: &MatchedIds,
    ) -> Result<SceneOutcome> {
        if ids.is_empty() {
            tracing::debug!("No matched elements, scene filter skipped");
            return Ok(SceneOutcome::NoMatch);
        }

        let source = self.config.resolve(source);
        let file_name = output_file_name(pattern, &source).ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Scene path has no file name: {}", source.display()),
            ))
        })?;
        let path = self.config.output_dir_for(&source).join(&file_name);

        let mut document = SceneDocument::open(&source)?;
        let report = prune_scene(&mut document, ids)?;
        write_scene_atomic(&document, &path)?;

        tracing::info!(
            source = %source.display(),
            output = %path.display(),
            nodes_retained = report.nodes_retained,
            "Wrote filtered scene"
        );

        Ok(SceneOutcome::Written(FilteredScene {
            file_name,
            path,
            report,
        }))
    }
}
