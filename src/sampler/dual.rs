//! Dual-snapshot sampling of one node
//!
//! Each node is sampled twice, a fixed interval apart, on a connection
//! owned by the sampling task. Rates and command-family counts are
//! derived from the two snapshots; instantaneous values come from the
//! second.

use std::io;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::client::{ConnectionFactory, ControlPlane, ControlPlaneExt};
use crate::cluster::ClusterNode;
use crate::metrics::reducer::{counter_delta, family_deltas};
use crate::metrics::row::MetricRow;
use crate::utils::Result;

use super::info::InfoSnapshot;

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Capture one combined snapshot (INFO COMMANDSTATS + INFO)
pub fn capture_snapshot(conn: &mut impl ControlPlane) -> io::Result<InfoSnapshot> {
    let mut snapshot = InfoSnapshot::parse(&conn.info("commandstats")?);
    snapshot.extend(&conn.info("")?);
    Ok(snapshot)
}

/// Sample one node over the given interval and build its metric row
///
/// The connection targets the node's own host:port; cluster members may
/// differ from the entry endpoint. The sleep between snapshots blocks
/// only the calling task.
pub fn sample_node(
    node: &ClusterNode,
    db_name: &str,
    factory: &ConnectionFactory,
    interval: Duration,
) -> Result<MetricRow> {
    let mut conn = factory.create(&node.host, node.port)?;

    debug!(node = %node.address(), "capturing first snapshot");
    let first = capture_snapshot(&mut conn)?;

    thread::sleep(interval);

    debug!(node = %node.address(), "capturing second snapshot");
    let second = capture_snapshot(&mut conn)?;

    Ok(build_row(db_name, node, &first, &second, interval))
}

/// Build the metric row for one node from its two snapshots
///
/// Pure with respect to the snapshot contents; both snapshots must come
/// from the same node, second captured after first.
pub fn build_row(
    db_name: &str,
    node: &ClusterNode,
    first: &InfoSnapshot,
    second: &InfoSnapshot,
    interval: Duration,
) -> MetricRow {
    debug_assert!(second.captured_at() >= first.captured_at());

    let (family_counts, family_reset) = family_deltas(first, second);
    let (total_ops, ops_reset) = counter_delta(
        first.int("total_commands_processed"),
        second.int("total_commands_processed"),
    );
    let counter_reset = family_reset || ops_reset;
    if counter_reset {
        warn!(
            node = %node.address(),
            "counter reset detected between snapshots, deltas clamped to zero"
        );
    }

    let interval_secs = interval.as_secs_f64();
    let ops_per_sec = if interval_secs > 0.0 {
        total_ops as f64 / interval_secs
    } else {
        0.0
    };

    let bytes_used = second.int("used_memory_peak").unwrap_or(0);
    let connected_slaves = second.int("connected_slaves").unwrap_or(0);

    MetricRow {
        db_name: db_name.to_string(),
        node_address: node.address(),
        role: node.role,
        curr_items: second.keyspace_items(),
        bytes_used,
        connections: second.int("connected_clients").unwrap_or(0),
        ha: connected_slaves > 0,
        limited_ha: connected_slaves < 2,
        cluster_api: second.int("cluster_enabled") == Some(1),
        memory_limit_gb: bytes_used as f64 / BYTES_PER_GB,
        ops_per_sec,
        total_ops,
        family_counts,
        counter_reset,
    }
}
