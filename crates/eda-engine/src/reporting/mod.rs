//! Report assembly module.
//!
//! [`InsightAggregator`] merges the outputs of every analysis stage into one
//! immutable [`AnalysisResult`](crate::types::AnalysisResult), refusing
//! results whose flags or recommendations point at unknown columns.
//! [`render_summary`] turns a finished result into plain text for terminal
//! hosts.
//!
//! # Example
//!
//! ```rust,ignore
//! use eda_engine::reporting::{InsightAggregator, render_summary};
//!
//! let result = InsightAggregator::aggregate(
//!     stats.overview,
//!     stats.profiles,
//!     flags,
//!     stats.correlation,
//!     recommendations,
//! )?;
//! println!("{}", render_summary(&result));
//! ```

mod aggregator;
mod summary;

pub(crate) use aggregator::check_references;
pub use aggregator::InsightAggregator;
pub use summary::render_summary;
