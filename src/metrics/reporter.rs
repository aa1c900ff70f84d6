//! Report output: CSV files, optional JSON, console summary
//!
//! The raw file carries one row per sampled node; the aggregate file
//! carries one row per database name. Column order matches the sizing
//! review sheet.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Modify, Style},
};

use crate::sampler::runner::SkippedTarget;

use super::row::{AggregateRow, MetricRow};

/// Write raw per-node rows to a CSV file
pub fn write_raw_csv(path: &Path, rows: &[MetricRow], duration_minutes: u32) -> io::Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "{}", MetricRow::csv_header(duration_minutes))?;
    for row in rows {
        writeln!(file, "{}", row.to_csv_row())?;
    }
    Ok(())
}

/// Write per-database aggregate rows to a CSV file
pub fn write_aggregate_csv(
    path: &Path,
    aggregates: &[AggregateRow],
    duration_minutes: u32,
) -> io::Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, "{}", AggregateRow::csv_header(duration_minutes))?;
    for agg in aggregates {
        writeln!(file, "{}", agg.to_csv_row())?;
    }
    Ok(())
}

/// Write the full report (raw rows, aggregates, skips) as JSON
pub fn write_json_file(
    path: &Path,
    rows: &[MetricRow],
    aggregates: &[AggregateRow],
    skipped: &[SkippedTarget],
    duration_minutes: u32,
) -> io::Result<()> {
    let json = serde_json::json!({
        "duration_minutes": duration_minutes,
        "nodes": rows.iter().map(|r| r.to_json()).collect::<Vec<_>>(),
        "databases": aggregates.iter().map(|a| a.to_json()).collect::<Vec<_>>(),
        "skipped": skipped.iter().map(|s| {
            serde_json::json!({"target": s.target, "reason": s.reason})
        }).collect::<Vec<_>>(),
    });

    let mut file = File::create(path)?;
    writeln!(file, "{}", serde_json::to_string_pretty(&json).unwrap())?;
    Ok(())
}

/// Print the aggregate rows as a console table
pub fn print_summary_table(aggregates: &[AggregateRow]) {
    if aggregates.is_empty() {
        println!("\nNo databases sampled.");
        return;
    }

    let mut builder = Builder::default();
    builder.push_record([
        "DB Name", "Nodes", "CurrItems", "Ops/Sec", "TotalOps", "HA?", "Cluster?", "Mem (GB)",
    ]);

    for agg in aggregates {
        builder.push_record([
            agg.db_name.clone(),
            agg.node_count.to_string(),
            agg.curr_items.to_string(),
            format!("{:.2}", agg.ops_per_sec),
            agg.total_ops.to_string(),
            agg.ha.to_string(),
            agg.cluster_api.to_string(),
            format!("{:.3}", agg.memory_limit_gb),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::sharp())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()));

    println!("\n{}", table);
}

/// Print the endpoints and nodes left out of the report, with reasons
pub fn print_skip_report(skipped: &[SkippedTarget]) {
    if skipped.is_empty() {
        return;
    }

    println!("\nSkipped targets:");
    for skip in skipped {
        println!("  {:30} {}", skip.target, skip.reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::NodeRole;
    use crate::metrics::families::COMMAND_FAMILIES;

    fn row() -> MetricRow {
        MetricRow {
            db_name: "cache-example-com".to_string(),
            node_address: "10.0.0.1:6379".to_string(),
            role: NodeRole::Primary,
            curr_items: 1000,
            bytes_used: 1024,
            connections: 3,
            ha: false,
            limited_ha: true,
            cluster_api: false,
            memory_limit_gb: 0.000001,
            ops_per_sec: 1.5,
            total_ops: 90,
            family_counts: vec![0; COMMAND_FAMILIES.len()],
            counter_reset: false,
        }
    }

    #[test]
    fn test_write_raw_csv_roundtrip() {
        let dir = std::env::temp_dir();
        let path = dir.join("sizing-collector-test-raw.csv");
        write_raw_csv(&path, &[row()], 1).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next().unwrap(), MetricRow::csv_header(1));
        let data = lines.next().unwrap();
        assert!(data.starts_with("cache-example-com,10.0.0.1:6379,Master,1000,"));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_write_json_file_shape() {
        let dir = std::env::temp_dir();
        let path = dir.join("sizing-collector-test.json");
        let skips = vec![SkippedTarget {
            target: "10.0.0.9:6379".to_string(),
            reason: "connection refused".to_string(),
        }];
        write_json_file(&path, &[row()], &[], &skips, 5).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["duration_minutes"], 5);
        assert_eq!(value["nodes"].as_array().unwrap().len(), 1);
        assert_eq!(value["skipped"][0]["target"], "10.0.0.9:6379");
        std::fs::remove_file(&path).ok();
    }
}
