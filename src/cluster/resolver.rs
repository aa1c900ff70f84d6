//! Topology resolution for one endpoint
//!
//! Probes the endpoint, determines whether it fronts a cluster, and
//! produces the set of connected nodes to sample. A probe failure skips
//! the endpoint; a cluster with zero connected nodes resolves to an empty
//! set, which is not an error.

use std::io;

use tracing::debug;

use crate::client::{ConnectionFactory, ControlPlane, ControlPlaneExt};
use crate::input::Endpoint;
use crate::sampler::info::InfoSnapshot;
use crate::utils::{CollectorError, ConnectionError, Result, TopologyError};

use super::node::{parse_cluster_node_line, ClusterNode, NodeRole};

/// Resolve the set of connected nodes behind one endpoint
pub fn resolve_endpoint(
    endpoint: &Endpoint,
    factory: &ConnectionFactory,
) -> Result<Vec<ClusterNode>> {
    let mut conn = factory.create(&endpoint.host, endpoint.port)?;

    let alive = conn
        .ping()
        .map_err(|e| ConnectionError::ProbeFailed {
            host: endpoint.host.clone(),
            port: endpoint.port,
            reason: e.to_string(),
        })?;
    if !alive {
        return Err(CollectorError::Connection(ConnectionError::ProbeFailed {
            host: endpoint.host.clone(),
            port: endpoint.port,
            reason: "unexpected PING reply".to_string(),
        }));
    }

    let nodes = detect_topology(&mut conn, endpoint).map_err(|e| TopologyError::InfoFailed {
        addr: endpoint.address(),
        source: e,
    })?;

    debug!(
        endpoint = %endpoint.address(),
        nodes = nodes.len(),
        "resolved topology"
    );

    Ok(nodes)
}

/// Determine the node set from a live connection
///
/// Clustered endpoints are enumerated via CLUSTER NODES; standalone
/// endpoints synthesize a single connected primary at the endpoint's own
/// address.
pub fn detect_topology(
    conn: &mut impl ControlPlane,
    endpoint: &Endpoint,
) -> io::Result<Vec<ClusterNode>> {
    let info_text = conn.info("")?;
    let info = InfoSnapshot::parse(&info_text);
    let clustered = info.int("cluster_enabled") == Some(1);

    if clustered {
        let nodes_text = conn.cluster_nodes()?;
        let mut nodes: Vec<ClusterNode> = nodes_text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .filter_map(parse_cluster_node_line)
            .collect();
        nodes.retain(|n| n.connected);
        Ok(nodes)
    } else {
        Ok(vec![ClusterNode {
            host: endpoint.host.clone(),
            port: endpoint.port,
            role: NodeRole::Primary,
            flags: vec!["master".to_string()],
            connected: true,
        }])
    }
}
