//! Control plane trait for server communication
//!
//! Abstracts the handful of introspection commands the collector issues so
//! that the topology resolver and sampler can be tested against mock
//! servers.

use crate::utils::RespValue;
use std::io;

/// Control plane operations trait
///
/// Implementations handle the underlying protocol and connection
/// management. Higher-level operations (INFO parsing, topology
/// resolution) are built on top.
pub trait ControlPlane {
    /// Execute a command with string arguments
    ///
    /// # Example
    /// ```ignore
    /// let response = conn.execute(&["PING"])?;
    /// let response = conn.execute(&["INFO", "commandstats"])?;
    /// ```
    fn execute(&mut self, args: &[&str]) -> io::Result<RespValue>;
}

/// Extension trait with the introspection commands the collector uses
pub trait ControlPlaneExt: ControlPlane {
    /// Send PING and verify PONG response
    fn ping(&mut self) -> io::Result<bool> {
        match self.execute(&["PING"])? {
            RespValue::SimpleString(s) => Ok(s == "PONG"),
            _ => Ok(false),
        }
    }

    /// Get INFO for a section (empty string returns all sections)
    fn info(&mut self, section: &str) -> io::Result<String> {
        let response = if section.is_empty() {
            self.execute(&["INFO"])?
        } else {
            self.execute(&["INFO", section])?
        };
        response.into_text()
    }

    /// Get CLUSTER NODES response as string
    fn cluster_nodes(&mut self) -> io::Result<String> {
        self.execute(&["CLUSTER", "NODES"])?.into_text()
    }

    /// Send AUTH command
    fn authenticate(&mut self, password: &str, username: Option<&str>) -> io::Result<()> {
        let response = match username {
            Some(user) => self.execute(&["AUTH", user, password])?,
            None => self.execute(&["AUTH", password])?,
        };

        match response {
            RespValue::SimpleString(s) if s == "OK" => Ok(()),
            RespValue::Error(e) => Err(io::Error::new(io::ErrorKind::PermissionDenied, e)),
            other => Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Unexpected AUTH response: {:?}", other),
            )),
        }
    }
}

// Blanket implementation: any ControlPlane automatically gets ControlPlaneExt
impl<T: ControlPlane> ControlPlaneExt for T {}
