//! Delta computation and per-database aggregation
//!
//! Everything here is a pure function of its inputs: the same snapshot
//! pair or row set always reduces to the same output.

use crate::cluster::NodeRole;
use crate::sampler::info::InfoSnapshot;

use super::families::COMMAND_FAMILIES;
use super::row::{AggregateRow, MetricRow};

/// Delta between two counter readings
///
/// A counter absent from either reading contributes zero. A counter that
/// went backwards indicates a server-side reset; the delta clamps to zero
/// and the reset flag is returned instead of a negative value.
pub fn counter_delta(first: Option<i64>, second: Option<i64>) -> (i64, bool) {
    match (first, second) {
        (Some(a), Some(b)) if b < a => (0, true),
        (Some(a), Some(b)) => (b - a, false),
        _ => (0, false),
    }
}

/// Per-family command count deltas between two snapshots of one node
///
/// Returns counts in COMMAND_FAMILIES order plus a flag set when any
/// per-command counter went backwards.
pub fn family_deltas(first: &InfoSnapshot, second: &InfoSnapshot) -> (Vec<i64>, bool) {
    let mut reset = false;
    let counts = COMMAND_FAMILIES
        .iter()
        .map(|family| {
            family
                .commands
                .iter()
                .map(|cmd| {
                    let (delta, cmd_reset) =
                        counter_delta(first.command_calls(cmd), second.command_calls(cmd));
                    reset |= cmd_reset;
                    delta
                })
                .sum()
        })
        .collect();
    (counts, reset)
}

/// Fold per-node rows into one aggregate row per database name
///
/// Counters sum, so the fold is commutative over node order. Categorical
/// fields (HA?, Limited HA?, Cluster API?, Memory Limit) take a primary
/// node's value when one contributed; with no primary, the last-seen
/// node's value is used.
pub fn aggregate_rows(rows: &[MetricRow]) -> Vec<AggregateRow> {
    let mut aggregates: Vec<AggregateRow> = Vec::new();
    let mut has_primary: Vec<bool> = Vec::new();

    for row in rows {
        let idx = match aggregates.iter().position(|a| a.db_name == row.db_name) {
            Some(idx) => idx,
            None => {
                aggregates.push(AggregateRow {
                    db_name: row.db_name.clone(),
                    node_count: 0,
                    curr_items: 0,
                    bytes_used: 0,
                    connections: 0,
                    ha: row.ha,
                    limited_ha: row.limited_ha,
                    cluster_api: row.cluster_api,
                    memory_limit_gb: row.memory_limit_gb,
                    ops_per_sec: 0.0,
                    total_ops: 0,
                    family_counts: vec![0; COMMAND_FAMILIES.len()],
                    counter_reset: false,
                });
                has_primary.push(false);
                aggregates.len() - 1
            }
        };

        let agg = &mut aggregates[idx];
        agg.node_count += 1;
        agg.curr_items += row.curr_items;
        agg.bytes_used += row.bytes_used;
        agg.connections += row.connections;
        agg.ops_per_sec += row.ops_per_sec;
        agg.total_ops += row.total_ops;
        for (total, count) in agg.family_counts.iter_mut().zip(&row.family_counts) {
            *total += count;
        }
        agg.counter_reset |= row.counter_reset;

        if row.role == NodeRole::Primary || !has_primary[idx] {
            agg.ha = row.ha;
            agg.limited_ha = row.limited_ha;
            agg.cluster_api = row.cluster_api;
            agg.memory_limit_gb = row.memory_limit_gb;
        }
        if row.role == NodeRole::Primary {
            has_primary[idx] = true;
        }
    }

    aggregates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::families::family_index;

    fn snapshot(text: &str) -> InfoSnapshot {
        InfoSnapshot::parse(text)
    }

    fn row(db_name: &str, role: NodeRole, total_ops: i64, string_cmds: i64) -> MetricRow {
        let mut family_counts = vec![0; COMMAND_FAMILIES.len()];
        family_counts[family_index("StringBasedCmds").unwrap()] = string_cmds;
        MetricRow {
            db_name: db_name.to_string(),
            node_address: "10.0.0.1:6379".to_string(),
            role,
            curr_items: 100,
            bytes_used: 1024,
            connections: 2,
            ha: role == NodeRole::Primary,
            limited_ha: false,
            cluster_api: false,
            memory_limit_gb: 1.0,
            ops_per_sec: total_ops as f64 / 60.0,
            total_ops,
            family_counts,
            counter_reset: false,
        }
    }

    #[test]
    fn test_identical_snapshots_have_zero_deltas() {
        let text = "cmdstat_get:calls=100,usec=500,usec_per_call=5.00\r\n\
                    cmdstat_lpush:calls=40,usec=100,usec_per_call=2.50\r\n";
        let (counts, reset) = family_deltas(&snapshot(text), &snapshot(text));
        assert!(counts.iter().all(|&c| c == 0));
        assert!(!reset);
    }

    #[test]
    fn test_family_delta_counts_exact_matching_commands() {
        // 50 gets, 10 sets, plus unrelated traffic that must not leak in
        let first = snapshot(
            "cmdstat_get:calls=100,usec=500,usec_per_call=5.00\r\n\
             cmdstat_set:calls=10,usec=50,usec_per_call=5.00\r\n\
             cmdstat_info:calls=7,usec=70,usec_per_call=10.00\r\n",
        );
        let second = snapshot(
            "cmdstat_get:calls=150,usec=750,usec_per_call=5.00\r\n\
             cmdstat_set:calls=20,usec=100,usec_per_call=5.00\r\n\
             cmdstat_info:calls=9,usec=90,usec_per_call=10.00\r\n",
        );

        let (counts, reset) = family_deltas(&first, &second);
        assert_eq!(counts[family_index("StringBasedCmds").unwrap()], 60);
        assert!(counts
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != family_index("StringBasedCmds").unwrap())
            .all(|(_, &c)| c == 0));
        assert!(!reset);
    }

    #[test]
    fn test_command_absent_from_one_snapshot_contributes_zero() {
        let first = snapshot("cmdstat_get:calls=100,usec=500,usec_per_call=5.00\r\n");
        let second = snapshot(
            "cmdstat_get:calls=100,usec=500,usec_per_call=5.00\r\n\
             cmdstat_sadd:calls=500,usec=900,usec_per_call=1.80\r\n",
        );
        let (counts, _) = family_deltas(&first, &second);
        assert_eq!(counts[family_index("SetBasedCmds").unwrap()], 0);
    }

    #[test]
    fn test_reducer_is_pure() {
        let first = snapshot("cmdstat_get:calls=1,usec=5,usec_per_call=5.00\r\n");
        let second = snapshot("cmdstat_get:calls=9,usec=45,usec_per_call=5.00\r\n");
        assert_eq!(
            family_deltas(&first, &second),
            family_deltas(&first, &second)
        );
    }

    #[test]
    fn test_counter_reset_clamps_to_zero() {
        let first = snapshot("cmdstat_get:calls=500,usec=900,usec_per_call=1.80\r\n");
        let second = snapshot("cmdstat_get:calls=20,usec=40,usec_per_call=2.00\r\n");
        let (counts, reset) = family_deltas(&first, &second);
        assert!(counts.iter().all(|&c| c >= 0));
        assert_eq!(counts[family_index("StringBasedCmds").unwrap()], 0);
        assert!(reset);
    }

    #[test]
    fn test_counter_delta_missing_counters() {
        assert_eq!(counter_delta(None, Some(10)), (0, false));
        assert_eq!(counter_delta(Some(10), None), (0, false));
        assert_eq!(counter_delta(Some(10), Some(25)), (15, false));
        assert_eq!(counter_delta(Some(25), Some(10)), (0, true));
    }

    #[test]
    fn test_aggregation_sums_nodes_sharing_db_name() {
        let rows = vec![
            row("db-a", NodeRole::Primary, 600, 60),
            row("db-a", NodeRole::Replica, 300, 30),
            row("db-b", NodeRole::Primary, 100, 10),
        ];
        let aggs = aggregate_rows(&rows);
        assert_eq!(aggs.len(), 2);

        let a = &aggs[0];
        assert_eq!(a.db_name, "db-a");
        assert_eq!(a.node_count, 2);
        assert_eq!(a.total_ops, 900);
        assert_eq!(a.curr_items, 200);
        assert_eq!(a.family_counts[family_index("StringBasedCmds").unwrap()], 90);
    }

    #[test]
    fn test_aggregation_commutative_over_node_order() {
        let mut rows = vec![
            row("db-a", NodeRole::Primary, 600, 60),
            row("db-a", NodeRole::Replica, 300, 30),
            row("db-a", NodeRole::Replica, 50, 5),
        ];
        let forward = aggregate_rows(&rows);
        rows.reverse();
        let reversed = aggregate_rows(&rows);

        assert_eq!(forward[0].total_ops, reversed[0].total_ops);
        assert_eq!(forward[0].curr_items, reversed[0].curr_items);
        assert_eq!(forward[0].connections, reversed[0].connections);
        assert_eq!(forward[0].family_counts, reversed[0].family_counts);
    }

    #[test]
    fn test_categoricals_take_primary_value() {
        // Replica first: its categoricals hold only until a primary shows up
        let mut replica = row("db-a", NodeRole::Replica, 0, 0);
        replica.ha = false;
        replica.limited_ha = true;
        let mut primary = row("db-a", NodeRole::Primary, 0, 0);
        primary.ha = true;
        primary.limited_ha = false;

        let aggs = aggregate_rows(&[replica.clone(), primary.clone()]);
        assert!(aggs[0].ha);
        assert!(!aggs[0].limited_ha);

        // Same outcome with the primary first
        let aggs = aggregate_rows(&[primary, replica]);
        assert!(aggs[0].ha);
        assert!(!aggs[0].limited_ha);
    }

    #[test]
    fn test_reset_flag_propagates_to_aggregate() {
        let mut flagged = row("db-a", NodeRole::Primary, 0, 0);
        flagged.counter_reset = true;
        let clean = row("db-a", NodeRole::Replica, 10, 1);
        let aggs = aggregate_rows(&[clean, flagged]);
        assert!(aggs[0].counter_reset);
    }
}
