//! Core library for merging dated home-video event folders into single
//! per-event movie files using ffmpeg and ffprobe.
//!
//! This crate provides event folder discovery, clip inventory and ordering,
//! legacy-format normalization, and lossless concatenation, orchestrated
//! over a bounded worker pool.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use movie_merge_core::{discover, merge_events, MergeConfig};
//! use movie_merge_core::external::{CrateFfprobeExecutor, SidecarSpawner};
//! use std::collections::BTreeSet;
//! use std::path::PathBuf;
//!
//! let config = MergeConfig {
//!     input_root: PathBuf::from("/videos/raw"),
//!     output_root: PathBuf::from("/videos/merged"),
//!     years: BTreeSet::from([2018]),
//!     ..Default::default()
//! };
//!
//! let events: Vec<_> = discover(&config.input_root, &config.years)
//!     .unwrap()
//!     .collect();
//! let summary = merge_events(
//!     &SidecarSpawner,
//!     &CrateFfprobeExecutor::new(),
//!     &config,
//!     events,
//! )
//! .unwrap();
//! println!("{summary}");
//! ```

pub mod classify;
pub mod concat;
pub mod discovery;
pub mod error;
pub mod external;
pub mod inventory;
pub mod normalize;
pub mod processing;
pub mod report;
pub mod sidecar;
pub mod temp_files;
pub mod util;

// Re-exports for public API
pub use classify::{classify_entry, sanitize_title, FolderKind};
pub use concat::{concatenate, select_join_mode, JoinMode, OverwritePolicy};
pub use discovery::{discover, EventFolder, EventWalk};
pub use error::{CoreError, CoreResult};
pub use inventory::{list_clips, ClipDescriptor};
pub use normalize::{detect_family, needs_reencode, CodecFamily, NormalizedClip, Resolution};
pub use processing::{merge_events, MergeConfig, DEFAULT_WORKERS};
pub use report::{MergeOutcome, MergeReport, RunSummary, Stage};
pub use util::{format_bytes, format_duration};
