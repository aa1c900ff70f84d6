//! Batch runner: fan-out over nodes, fan-in of rows and skips
//!
//! The sampling interval dominates the run time, so every node is sampled
//! on its own thread and the wait periods overlap. Each task owns its
//! connection parameters; results and failures flow back through the join
//! handles, with no shared mutable state between tasks.

use std::thread;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::client::ConnectionFactory;
use crate::cluster::resolve_endpoint;
use crate::config::CollectorConfig;
use crate::input::Endpoint;
use crate::metrics::row::MetricRow;

use super::dual::sample_node;

/// One endpoint or node left out of the report, with the reason
#[derive(Debug, Clone)]
pub struct SkippedTarget {
    pub target: String,
    pub reason: String,
}

/// Result of one collection pass
#[derive(Debug)]
pub struct CollectionOutcome {
    pub rows: Vec<MetricRow>,
    pub skipped: Vec<SkippedTarget>,
}

/// Build the connection factory for one endpoint
pub fn factory_for(endpoint: &Endpoint, config: &CollectorConfig) -> ConnectionFactory {
    ConnectionFactory {
        connect_timeout: Duration::from_millis(config.connect_timeout_ms),
        read_timeout: Duration::from_millis(config.request_timeout_ms),
        write_timeout: Duration::from_millis(config.request_timeout_ms),
        tls_config: endpoint.tls.then(|| config.tls.clone()),
        auth_password: endpoint.password.clone(),
        auth_username: endpoint.username.clone(),
    }
}

/// Resolve every endpoint and sample all reachable nodes in parallel
pub fn run_collection(endpoints: &[Endpoint], config: &CollectorConfig) -> CollectionOutcome {
    let interval = Duration::from_secs(config.interval_secs());

    let mut handles: Vec<thread::JoinHandle<Result<MetricRow, SkippedTarget>>> = Vec::new();
    let mut skipped: Vec<SkippedTarget> = Vec::new();

    for endpoint in endpoints {
        info!("Processing {}", endpoint.host);
        let factory = factory_for(endpoint, config);

        let nodes = match resolve_endpoint(endpoint, &factory) {
            Ok(nodes) => nodes,
            Err(e) => {
                warn!("Skipping endpoint {}: {}", endpoint.address(), e);
                skipped.push(SkippedTarget {
                    target: endpoint.address(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if nodes.is_empty() {
            info!("Endpoint {} has no connected nodes", endpoint.address());
            continue;
        }

        for node in nodes {
            let db_name = endpoint.db_name();
            let factory = factory.clone();
            let handle = thread::Builder::new()
                .name(format!("sampler-{}", node.address()))
                .spawn(move || {
                    sample_node(&node, &db_name, &factory, interval).map_err(|e| {
                        SkippedTarget {
                            target: node.address(),
                            reason: e.to_string(),
                        }
                    })
                })
                .expect("Failed to spawn sampler thread");
            handles.push(handle);
        }
    }

    if !config.quiet && !handles.is_empty() {
        show_interval_progress(interval, handles.len());
    }

    let mut rows = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.join() {
            Ok(Ok(row)) => rows.push(row),
            Ok(Err(skip)) => {
                warn!("Skipping node {}: {}", skip.target, skip.reason);
                skipped.push(skip);
            }
            Err(_) => skipped.push(SkippedTarget {
                target: "unknown".to_string(),
                reason: "sampler thread panicked".to_string(),
            }),
        }
    }

    CollectionOutcome { rows, skipped }
}

/// Show a wall-clock progress bar while the sampler threads wait out the
/// interval
fn show_interval_progress(interval: Duration, node_count: usize) {
    let secs = interval.as_secs();
    let pb = ProgressBar::new(secs);
    pb.set_style(
        ProgressStyle::with_template("Sampling {msg} [{bar:40}] {pos}/{len}s")
            .expect("Invalid progress template")
            .progress_chars("=> "),
    );
    pb.set_message(format!("{} nodes", node_count));

    for _ in 0..secs {
        thread::sleep(Duration::from_secs(1));
        pb.inc(1);
    }
    pb.finish_and_clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CliArgs;
    use clap::Parser;

    fn config() -> CollectorConfig {
        let args = CliArgs::parse_from([
            "redis-sizing-collector",
            "endpoints.csv",
            "--connect-timeout",
            "200",
            "--timeout",
            "200",
            "-q",
        ]);
        CollectorConfig::from_cli(&args).unwrap()
    }

    fn endpoint(tls: bool) -> Endpoint {
        Endpoint {
            host: "127.0.0.1".to_string(),
            port: 1,
            password: Some("secret".to_string()),
            username: None,
            tls,
        }
    }

    #[test]
    fn test_factory_carries_endpoint_credentials() {
        let factory = factory_for(&endpoint(false), &config());
        assert_eq!(factory.auth_password.as_deref(), Some("secret"));
        assert!(factory.tls_config.is_none());
        assert_eq!(factory.connect_timeout, Duration::from_millis(200));
    }

    #[test]
    fn test_factory_enables_tls_per_endpoint() {
        let factory = factory_for(&endpoint(true), &config());
        assert!(factory.tls_config.is_some());
    }

    #[test]
    fn test_unreachable_endpoint_lands_in_skip_report() {
        // Port 1 on loopback refuses connections
        let outcome = run_collection(&[endpoint(false)], &config());
        assert!(outcome.rows.is_empty());
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].target, "127.0.0.1:1");
    }
}
