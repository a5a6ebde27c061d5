//! Core bootstrap-resampling engine for subclonal VAF clusters.
//!
//! Given an already-validated [`VariantTable`] (cluster labels + per-sample
//! VAF columns, optionally paired with depth columns), the engine estimates
//! per-cluster summary statistics and draws repeated bootstrap means under
//! one of six [`BootstrapModel`] strategies, producing one bootstrap-mean
//! matrix per sample column plus an optional "zero-VAF" background
//! distribution pooled from zero-median clusters.

pub mod table;
pub mod stats;
pub mod model;
pub mod engine;

pub use table::VariantTable;
pub use stats::ClusterStats;
pub use model::BootstrapModel;
pub use engine::{BootstrapConfig, BootstrapMatrix, ResamplingEngine, ResamplingResult, DEFAULT_NUM_BOOTS};
