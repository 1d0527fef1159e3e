//! One take-off invocation from table to pruned scene

use std::path::Path;

use crate::aggregate::{Aggregation, aggregate};
use crate::config::TakeoffConfig;
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::identifiers::MatchedIds;
use crate::matcher::PatternMatcher;
use crate::model::QuantityField;
use crate::scene::{FilteredScene, SceneFilter, SceneOutcome};

/// What to group, what to sum and which rows to select
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TakeoffRequest {
    /// Column whose matched values define the groups
    pub group_column: String,
    /// Quantity summed per group
    pub field: QuantityField,
    /// User pattern, see [`PatternMatcher`]
    pub pattern: String,
}

impl TakeoffRequest {
    /// Create a request
    pub fn new(
        group_column: impl Into<String>,
        field: QuantityField,
        pattern: impl Into<String>,
    ) -> Self {
        Self {
            group_column: group_column.into(),
            field,
            pattern: pattern.into(),
        }
    }
}

/// Table-side result of a take-off
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Groups, or no data
    pub aggregation: Aggregation,
    /// Element ids of matched rows
    pub matched: MatchedIds,
}

/// State of the geometry side of a take-off
#[derive(Debug)]
pub enum SceneStatus {
    /// No scene document was supplied
    NotRequested,
    /// Nothing matched, so no scene was written
    NoMatch,
    /// A pruned scene was written
    Written(FilteredScene),
    /// Reading, parsing or writing the scene failed
    Failed(Error),
}

impl SceneStatus {
    /// File name to offer for download, if a scene was written
    pub fn download_name(&self) -> Option<&str> {
        match self {
            SceneStatus::Written(scene) => Some(&scene.file_name),
            _ => None,
        }
    }
}

/// Combined result of [`Takeoff::run`]
#[derive(Debug)]
pub struct TakeoffReport {
    /// Groups, or no data
    pub aggregation: Aggregation,
    /// Element ids of matched rows
    pub matched: MatchedIds,
    /// Geometry side outcome
    pub scene: SceneStatus,
}

/// Runs take-offs with one configuration
#[derive(Debug, Clone, Default)]
pub struct Takeoff {
    config: TakeoffConfig,
}

impl Takeoff {
    /// Create a runner
    pub fn new(config: TakeoffConfig) -> Self {
        Self { config }
    }

    /// Configuration in use
    pub fn config(&self) -> &TakeoffConfig {
        &self.config
    }

    /// Load a dataset with the configured base directory and row cap
    pub fn load_dataset(&self, path: impl AsRef<Path>) -> Result<Dataset> {
        Dataset::open(path, &self.config)
    }

    /// Match, aggregate and collect ids
    ///
    /// # Errors
    ///
    /// Fails with [`Error::MissingColumn`] when either column is absent and
    /// with [`Error::InvalidPattern`] when the pattern does not compile.
    pub fn evaluate(&self, dataset: &Dataset, request: &TakeoffRequest) -> Result<Evaluation> {
        let keys = dataset.require_column(&request.group_column)?;
        dataset.require_column(request.field.column_name())?;

        let matcher = PatternMatcher::new(&request.pattern)?;
        let mask = matcher.mask(keys);
        let aggregation = aggregate(dataset, &mask, &request.group_column, request.field)?;
        let matched = MatchedIds::from_mask(dataset, &mask);

        Ok(Evaluation {
            aggregation,
            matched,
        })
    }

    /// Run the whole pipeline, optionally filtering `scene`
    ///
    /// Table-side errors are returned as `Err`. Scene failures do not discard
    /// the groups: they are reported through [`SceneStatus::Failed`].
    pub fn run(
        &self,
        dataset: &Dataset,
        request: &TakeoffRequest,
        scene: Option<&Path>,
    ) -> Result<TakeoffReport> {
        tracing::info!(
            rows = dataset.row_count(),
            group_column = %request.group_column,
            field = %request.field,
            pattern = %request.pattern,
            "Starting take-off"
        );

        let Evaluation {
            aggregation,
            matched,
        } = self.evaluate(dataset, request)?;

        let scene = match scene {
            None => SceneStatus::NotRequested,
            Some(_) if aggregation.is_no_data() => SceneStatus::NoMatch,
            Some(path) => {
                match SceneFilter::new(&self.config).filter_file(path, &request.pattern, &matched) {
                    Ok(SceneOutcome::Written(scene)) => SceneStatus::Written(scene),
                    Ok(SceneOutcome::NoMatch) => SceneStatus::NoMatch,
                    Err(e) => {
                        tracing::warn!(error = %e, kind = ?e.kind(), "Scene filtering failed");
                        SceneStatus::Failed(e)
                    }
                }
            }
        };

        tracing::info!(
            groups = aggregation.table().map_or(0, |t| t.len()),
            matched = matched.len(),
            scene = ?scene.download_name(),
            "Take-off complete"
        );

        Ok(TakeoffReport {
            aggregation,
            matched,
            scene,
        })
    }
}
