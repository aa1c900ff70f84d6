//! Error types for redis-sizing-collector

use std::io;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Connection-related errors
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Failed to connect to {host}:{port}: {source}")]
    ConnectFailed {
        host: String,
        port: u16,
        source: io::Error,
    },

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("TLS handshake failed: {0}")]
    TlsFailed(String),

    #[error("Liveness probe failed for {host}:{port}: {reason}")]
    ProbeFailed {
        host: String,
        port: u16,
        reason: String,
    },
}

/// Topology resolution errors
#[derive(Error, Debug)]
pub enum TopologyError {
    #[error("Failed to fetch topology from {addr}: {source}")]
    InfoFailed { addr: String, source: io::Error },
}

/// Endpoint table errors
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to read endpoint table {path}: {source}")]
    ReadFailed { path: String, source: io::Error },

    #[error("Endpoint table has no header row")]
    MissingHeader,

    #[error("Endpoint table is missing the '{0}' column")]
    MissingColumn(&'static str),

    #[error("Invalid port '{value}' on line {line}")]
    InvalidPort { value: String, line: usize },
}

pub type Result<T> = std::result::Result<T, CollectorError>;
