//! Pipeline orchestration for thumbfill.
//!
//! Ties keyword extraction, image search, and download into the per-article
//! and batch workflows, and computes thumbnail coverage stats.

pub mod pipeline;
pub mod stats;

pub use pipeline::{
    BatchReport, Pipeline, ProgressReporter, SilentProgress, ThumbnailOutcome,
};
pub use stats::compute_image_stats;
