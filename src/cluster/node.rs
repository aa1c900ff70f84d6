//! Cluster node representation

/// Role of a node within its deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Primary,
    Replica,
}

impl NodeRole {
    /// Report label for this role
    pub fn label(&self) -> &'static str {
        match self {
            NodeRole::Primary => "Master",
            NodeRole::Replica => "Replica",
        }
    }
}

/// One server process backing an endpoint
#[derive(Debug, Clone)]
pub struct ClusterNode {
    /// Hostname or IP
    pub host: String,
    /// Port
    pub port: u16,
    /// Primary or replica, from the node's flags
    pub role: NodeRole,
    /// Node flags (master, slave, fail, handshake, ...)
    pub flags: Vec<String>,
    /// Is the cluster link to this node established?
    pub connected: bool,
}

impl ClusterNode {
    /// Get node address as string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parse a line from CLUSTER NODES response
///
/// Format: `<id> <ip:port@cport> <flags> <master> <ping-sent> <pong-recv> <config-epoch> <link-state> <slot> ...`
///
/// Example:
/// ```text
/// 07c37dfeb235213a872192d90877d0cd55635b91 127.0.0.1:30004@31004 slave e7d1eecce10fd6bb5eb35b9f99a514335d9ba9ca 0 1426238317239 4 connected
/// ```
pub fn parse_cluster_node_line(line: &str) -> Option<ClusterNode> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 8 {
        return None;
    }

    let (host, port) = parse_node_address(parts[1])?;

    let flags: Vec<String> = parts[2].split(',').map(String::from).collect();
    let role = if flags.iter().any(|f| f == "master") {
        NodeRole::Primary
    } else {
        NodeRole::Replica
    };

    let connected = parts[7] == "connected";

    Some(ClusterNode {
        host,
        port,
        role,
        flags,
        connected,
    })
}

/// Parse node address from CLUSTER NODES
/// Formats: "host:port@cport", "host:port", "host:port@cport,hostname"
fn parse_node_address(addr: &str) -> Option<(String, u16)> {
    // Some managed services append ",hostname" to the address field
    let addr = addr.split(',').next().unwrap_or(addr);

    // Drop the cluster bus port
    let host_port = addr.split('@').next().unwrap_or(addr);

    let hp: Vec<&str> = host_port.rsplitn(2, ':').collect();
    if hp.len() != 2 {
        return None;
    }

    let port: u16 = hp[0].parse().ok()?;
    Some((hp[1].to_string(), port))
}
