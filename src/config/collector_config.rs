//! Resolved collector configuration

use std::path::PathBuf;

use super::cli::CliArgs;
use super::tls_config::TlsConfig;

/// Collector configuration built from CLI arguments
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Endpoint table path
    pub input_file: PathBuf,
    /// Minutes between the two samples of each node
    pub duration_minutes: u32,
    /// Aggregated report destination
    pub output_file: PathBuf,
    /// Raw per-node rows destination
    pub raw_output_file: PathBuf,
    /// Optional JSON report destination
    pub json_output: Option<PathBuf>,
    /// TLS settings for endpoints flagged TLS in the input table
    pub tls: TlsConfig,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub quiet: bool,
}

impl CollectorConfig {
    /// Build configuration from parsed CLI arguments
    pub fn from_cli(args: &CliArgs) -> Result<Self, String> {
        args.validate()?;

        let output_file = match &args.output_file {
            Some(path) => path.clone(),
            None => derive_output_path(&args.input_file, "-out"),
        };
        let raw_output_file = derive_output_path(&output_file, "-raw");

        Ok(Self {
            input_file: args.input_file.clone(),
            duration_minutes: args.duration,
            output_file,
            raw_output_file,
            json_output: args.json_output.clone(),
            tls: TlsConfig::from_cli(args),
            connect_timeout_ms: args.connect_timeout_ms,
            request_timeout_ms: args.request_timeout_ms,
            quiet: args.quiet,
        })
    }

    /// Sampling interval in seconds
    pub fn interval_secs(&self) -> u64 {
        u64::from(self.duration_minutes) * 60
    }
}

/// Append a suffix to a path's stem, forcing a .csv extension
fn derive_output_path(input: &std::path::Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("report");
    let file_name = format!("{}{}.csv", stem, suffix);
    match input.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(file_name),
        _ => PathBuf::from(file_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_default_output_paths() {
        let args = CliArgs::parse_from(["redis-sizing-collector", "sizing/endpoints.csv"]);
        let config = CollectorConfig::from_cli(&args).unwrap();
        assert_eq!(config.output_file, PathBuf::from("sizing/endpoints-out.csv"));
        assert_eq!(
            config.raw_output_file,
            PathBuf::from("sizing/endpoints-out-raw.csv")
        );
    }

    #[test]
    fn test_explicit_output_path() {
        let args = CliArgs::parse_from([
            "redis-sizing-collector",
            "endpoints.csv",
            "-o",
            "report.csv",
        ]);
        let config = CollectorConfig::from_cli(&args).unwrap();
        assert_eq!(config.output_file, PathBuf::from("report.csv"));
        assert_eq!(config.raw_output_file, PathBuf::from("report-raw.csv"));
    }

    #[test]
    fn test_interval_secs() {
        let args =
            CliArgs::parse_from(["redis-sizing-collector", "endpoints.csv", "-d", "5"]);
        let config = CollectorConfig::from_cli(&args).unwrap();
        assert_eq!(config.interval_secs(), 300);
    }
}
