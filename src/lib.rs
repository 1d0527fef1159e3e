//! # qto
//!
//! Quantity take-offs for BIM model exports.
//!
//! Given a table of building elements (a CSV export of a BIM model) and a
//! user pattern, this library groups the elements whose chosen attribute
//! matches the pattern, sums a quantity (Area, Volume, Width or Length) per
//! group, and writes a copy of the model's COLLADA scene that keeps only the
//! geometry of the matched elements.
//!
//! ## Pipeline
//!
//! 1. [`normalize`]: quantity cells become a summable number plus raw text
//! 2. [`matcher`]: the pattern selects rows by their grouping value
//! 3. [`aggregate`]: matched rows are grouped and summed
//! 4. [`identifiers`]: element ids of matched rows
//! 5. [`scene`]: the scene is pruned to those ids and written
//!
//! ## Example
//!
//! ```no_run
//! use qto::{QuantityField, Takeoff, TakeoffConfig, TakeoffRequest};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let takeoff = Takeoff::new(TakeoffConfig::new().with_base_dir("uploads"));
//! let dataset = takeoff.load_dataset("house.csv")?;
//! let request = TakeoffRequest::new("Type", QuantityField::Area, "[Ww]all");
//!
//! let report = takeoff.run(&dataset, &request, Some(Path::new("house.dae")))?;
//! if let Some(table) = report.aggregation.table() {
//!     for group in table.groups() {
//!         println!("{}: {} elements, {}", group.key, group.element_count, group.quantity_sum);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod error;
pub mod identifiers;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod scene;
pub mod takeoff;

pub use aggregate::{Aggregation, Group, GroupTable};
pub use config::TakeoffConfig;
pub use dataset::{Column, Dataset};
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use identifiers::MatchedIds;
pub use matcher::{MatchMask, PatternMatcher};
pub use model::{Cell, ColumnKind, QuantityField};
pub use normalize::{NormalizeOutcome, Normalized};
pub use scene::{FilteredScene, SceneDocument, SceneFilter, SceneOutcome};
pub use takeoff::{Evaluation, SceneStatus, Takeoff, TakeoffReport, TakeoffRequest};
