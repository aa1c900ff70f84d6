//! Report rows
//!
//! `MetricRow` is one record per sampled node; rows sharing a database
//! name fold into one `AggregateRow`. Column order matches the sizing
//! report, with the delta-derived columns suffixed with the sampling
//! window.

use serde_json::json;

use crate::cluster::NodeRole;

use super::families::COMMAND_FAMILIES;

/// One output record per sampled node
#[derive(Debug, Clone)]
pub struct MetricRow {
    pub db_name: String,
    /// host:port of the sampled node
    pub node_address: String,
    pub role: NodeRole,
    pub curr_items: i64,
    pub bytes_used: i64,
    pub connections: i64,
    pub ha: bool,
    pub limited_ha: bool,
    pub cluster_api: bool,
    pub memory_limit_gb: f64,
    pub ops_per_sec: f64,
    /// Delta of total_commands_processed over the sampling window
    pub total_ops: i64,
    /// Per-family command counts, indexed by COMMAND_FAMILIES order
    pub family_counts: Vec<i64>,
    /// Set when a counter went backwards between the two snapshots
    pub counter_reset: bool,
}

/// Fold of all MetricRows sharing a database name
#[derive(Debug, Clone)]
pub struct AggregateRow {
    pub db_name: String,
    pub node_count: usize,
    pub curr_items: i64,
    pub bytes_used: i64,
    pub connections: i64,
    pub ha: bool,
    pub limited_ha: bool,
    pub cluster_api: bool,
    pub memory_limit_gb: f64,
    pub ops_per_sec: f64,
    pub total_ops: i64,
    pub family_counts: Vec<i64>,
    pub counter_reset: bool,
}

/// Shared metric column headers, before the family columns
const METRIC_COLUMNS: &str =
    "CurrItems,BytesUsedForCache,CurrConnections,HA?,Limited HA?,Cluster API?,Memory Limit (GB),Ops/Sec";

fn family_columns(duration_minutes: u32) -> String {
    let mut columns: Vec<String> = COMMAND_FAMILIES
        .iter()
        .map(|f| format!("{} (peak over {} minutes)", f.name, duration_minutes))
        .collect();
    columns.push(format!("TotalOps (peak over {} minutes)", duration_minutes));
    columns.join(",")
}

fn metric_cells(
    curr_items: i64,
    bytes_used: i64,
    connections: i64,
    ha: bool,
    limited_ha: bool,
    cluster_api: bool,
    memory_limit_gb: f64,
    ops_per_sec: f64,
) -> String {
    format!(
        "{},{},{},{},{},{},{:.6},{:.2}",
        curr_items, bytes_used, connections, ha, limited_ha, cluster_api, memory_limit_gb,
        ops_per_sec
    )
}

fn family_cells(family_counts: &[i64], total_ops: i64) -> String {
    let mut cells: Vec<String> = family_counts.iter().map(|c| c.to_string()).collect();
    cells.push(total_ops.to_string());
    cells.join(",")
}

impl MetricRow {
    /// CSV header for raw per-node rows
    pub fn csv_header(duration_minutes: u32) -> String {
        format!(
            "DB Name,Node,Node Type,{},{},Counter Reset?",
            METRIC_COLUMNS,
            family_columns(duration_minutes)
        )
    }

    /// Format as one CSV row
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.db_name,
            self.node_address,
            self.role.label(),
            metric_cells(
                self.curr_items,
                self.bytes_used,
                self.connections,
                self.ha,
                self.limited_ha,
                self.cluster_api,
                self.memory_limit_gb,
                self.ops_per_sec,
            ),
            family_cells(&self.family_counts, self.total_ops),
            self.counter_reset
        )
    }

    /// Convert to JSON object
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "db_name": self.db_name,
            "node": self.node_address,
            "node_type": self.role.label(),
            "curr_items": self.curr_items,
            "bytes_used_for_cache": self.bytes_used,
            "curr_connections": self.connections,
            "ha": self.ha,
            "limited_ha": self.limited_ha,
            "cluster_api": self.cluster_api,
            "memory_limit_gb": self.memory_limit_gb,
            "ops_per_sec": self.ops_per_sec,
            "total_ops": self.total_ops,
            "command_families": COMMAND_FAMILIES
                .iter()
                .zip(&self.family_counts)
                .map(|(f, c)| (f.name.to_string(), json!(c)))
                .collect::<serde_json::Map<_, _>>(),
            "counter_reset": self.counter_reset,
        })
    }
}

impl AggregateRow {
    /// CSV header for per-database aggregate rows
    pub fn csv_header(duration_minutes: u32) -> String {
        format!(
            "DB Name,Nodes,{},{},Counter Reset?",
            METRIC_COLUMNS,
            family_columns(duration_minutes)
        )
    }

    /// Format as one CSV row
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.db_name,
            self.node_count,
            metric_cells(
                self.curr_items,
                self.bytes_used,
                self.connections,
                self.ha,
                self.limited_ha,
                self.cluster_api,
                self.memory_limit_gb,
                self.ops_per_sec,
            ),
            family_cells(&self.family_counts, self.total_ops),
            self.counter_reset
        )
    }

    /// Convert to JSON object
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "db_name": self.db_name,
            "nodes": self.node_count,
            "curr_items": self.curr_items,
            "bytes_used_for_cache": self.bytes_used,
            "curr_connections": self.connections,
            "ha": self.ha,
            "limited_ha": self.limited_ha,
            "cluster_api": self.cluster_api,
            "memory_limit_gb": self.memory_limit_gb,
            "ops_per_sec": self.ops_per_sec,
            "total_ops": self.total_ops,
            "command_families": COMMAND_FAMILIES
                .iter()
                .zip(&self.family_counts)
                .map(|(f, c)| (f.name.to_string(), json!(c)))
                .collect::<serde_json::Map<_, _>>(),
            "counter_reset": self.counter_reset,
        })
    }
}
