//! redis-sizing-collector - capacity-planning metrics for Redis/Valkey
//!
//! Reads a table of endpoints, samples every reachable node twice over a
//! fixed interval, and writes per-node and per-database CSV reports.

// Modules are shared with the library target; not every helper is
// reachable from the binary entry point.
#![allow(dead_code)]

use anyhow::Result;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

mod client;
mod cluster;
mod config;
mod input;
mod metrics;
mod sampler;
mod utils;

use config::{CliArgs, CollectorConfig};
use input::read_endpoint_table;
use metrics::{aggregate_rows, print_skip_report, print_summary_table};
use sampler::run_collection;

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn print_banner(config: &CollectorConfig, endpoint_count: usize) {
    if config.quiet {
        return;
    }

    println!("redis-sizing-collector v{}", env!("CARGO_PKG_VERSION"));
    println!("====================================");
    println!("Endpoints: {}", endpoint_count);
    println!("Sampling interval: {} minute(s)", config.duration_minutes);
    println!("Output: {:?}", config.output_file);
    println!("====================================\n");
}

fn run() -> Result<()> {
    // Parse CLI arguments
    let args = CliArgs::parse_args();

    // Setup logging
    setup_logging(args.verbose, args.quiet);

    // Build configuration
    let config = CollectorConfig::from_cli(&args)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    // Load the endpoint table
    let endpoints = read_endpoint_table(&config.input_file)?;
    if endpoints.is_empty() {
        anyhow::bail!("No endpoints found in {:?}", config.input_file);
    }

    print_banner(&config, endpoints.len());

    // Sample every reachable node, waits overlapping
    let outcome = run_collection(&endpoints, &config);

    // Fold per-node rows into per-database aggregates
    let aggregates = aggregate_rows(&outcome.rows);

    // Write reports
    info!("Writing raw rows to: {:?}", config.raw_output_file);
    metrics::write_raw_csv(&config.raw_output_file, &outcome.rows, config.duration_minutes)?;

    info!("Writing aggregate report to: {:?}", config.output_file);
    metrics::write_aggregate_csv(&config.output_file, &aggregates, config.duration_minutes)?;

    if let Some(ref json_path) = config.json_output {
        info!("Writing JSON report to: {:?}", json_path);
        metrics::write_json_file(
            json_path,
            &outcome.rows,
            &aggregates,
            &outcome.skipped,
            config.duration_minutes,
        )?;
    }

    // Print summary
    if !config.quiet {
        print_summary_table(&aggregates);
        print_skip_report(&outcome.skipped);

        println!("\n====================================");
        println!("COLLECTION COMPLETE");
        println!("====================================");
        println!("Nodes sampled: {}", outcome.rows.len());
        println!("Databases: {}", aggregates.len());
        println!("Skipped: {}", outcome.skipped.len());
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }
}
