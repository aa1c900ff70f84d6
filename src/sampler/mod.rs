//! Dual-snapshot sampling
//!
//! This module provides:
//! - INFO parsing into tagged values and point-in-time snapshots
//! - The two-snapshot sample of one node
//! - The per-node fan-out batch runner with a skip report

pub mod dual;
pub mod info;
pub mod runner;

pub use dual::{build_row, capture_snapshot, sample_node};
pub use info::{InfoSnapshot, InfoValue};
pub use runner::{run_collection, CollectionOutcome, SkippedTarget};
