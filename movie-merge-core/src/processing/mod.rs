//! Merge orchestration.
//!
//! This module drives the whole pipeline: it fans discovered events out over
//! a bounded worker pool and runs each event's stages strictly in order,
//! isolating per-event failures from the rest of the run.

/// Main merge orchestration logic
pub mod merge;

pub use merge::{merge_events, MergeConfig, DEFAULT_WORKERS};
