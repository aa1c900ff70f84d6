//! Command-line argument parsing
//!
//! Arguments are grouped by category for clarity.

use clap::Parser;
use std::path::PathBuf;

/// Capacity-planning metrics collector for self-hosted Redis/Valkey deployments
#[derive(Parser, Debug, Clone)]
#[command(name = "redis-sizing-collector")]
#[command(version, about, long_about = None)]
pub struct CliArgs {
    // ===== Input / Output =====
    /// CSV file listing the Redis endpoints to pull stats from
    /// (columns: Redis Host, Port, Password, User (ACL), TLS)
    pub input_file: PathBuf,

    /// Number of minutes between the two samples taken from each node
    #[arg(short = 'd', long = "duration", default_value_t = 1)]
    pub duration: u32,

    /// File the aggregated report is written to. Defaults to the input
    /// file name with '-out' appended to the stem
    #[arg(short = 'o', long = "output-file")]
    pub output_file: Option<PathBuf>,

    /// Also write the full report (raw per-node rows and aggregates) as JSON
    #[arg(long = "json")]
    pub json_output: Option<PathBuf>,

    // ===== TLS Options =====
    // Applied to endpoints whose TLS column is set in the input table.
    /// Skip TLS certificate verification (insecure)
    #[arg(long = "tls-skip-verify")]
    pub tls_skip_verify: bool,

    /// CA certificate file for TLS
    #[arg(long = "tls-ca-cert")]
    pub tls_ca_cert: Option<PathBuf>,

    /// Client certificate file for TLS
    #[arg(long = "tls-cert")]
    pub tls_cert: Option<PathBuf>,

    /// Client private key file for TLS
    #[arg(long = "tls-key")]
    pub tls_key: Option<PathBuf>,

    /// Server Name Indication for TLS
    #[arg(long = "tls-sni")]
    pub tls_sni: Option<String>,

    // ===== Timeouts =====
    /// Connection timeout in milliseconds
    #[arg(long = "connect-timeout", default_value_t = 10_000)]
    pub connect_timeout_ms: u64,

    /// Read/write timeout in milliseconds
    #[arg(long = "timeout", default_value_t = 30_000)]
    pub request_timeout_ms: u64,

    // ===== Verbosity =====
    /// Enable debug logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Only log errors, suppress banner and progress output
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl CliArgs {
    /// Parse arguments from the process command line
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate argument combinations
    pub fn validate(&self) -> Result<(), String> {
        if self.duration == 0 {
            return Err("--duration must be at least 1 minute".to_string());
        }
        if self.connect_timeout_ms == 0 || self.request_timeout_ms == 0 {
            return Err("timeouts must be non-zero".to_string());
        }
        Ok(())
    }
}
