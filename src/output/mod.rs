//! Rendering and persisting simulation results
//!
//! - **ObservationTable**: per-minute table, tab-separated or JSON Lines
//! - **SampleWriter**: wait-sample CSV files and JSON summaries on disk

pub mod samples;
pub mod table;

pub use samples::*;
pub use table::*;
