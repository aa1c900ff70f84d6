//! Metric reduction and reporting
//!
//! This module provides:
//! - The fixed command-family taxonomy
//! - Per-node metric rows and per-database aggregates
//! - Delta computation with counter-reset detection
//! - CSV/JSON export and the console summary

pub mod families;
pub mod reducer;
pub mod reporter;
pub mod row;

pub use families::{family_index, CommandFamily, COMMAND_FAMILIES};
pub use reducer::{aggregate_rows, counter_delta, family_deltas};
pub use reporter::{
    print_skip_report, print_summary_table, write_aggregate_csv, write_json_file, write_raw_csv,
};
pub use row::{AggregateRow, MetricRow};
