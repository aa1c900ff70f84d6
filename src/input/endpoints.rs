//! Endpoint table: one configured database entry per row
//!
//! The input is a CSV table with a header row and the columns
//! `Redis Host`, `Port`, `Password`, `User (ACL)`, `TLS`. Password, user
//! and TLS are optional; empty cells are treated as absent.

use std::fs;
use std::path::Path;

use crate::utils::InputError;

/// One configured database entry to sample
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub username: Option<String>,
    pub tls: bool,
}

impl Endpoint {
    /// Database name used for grouping in the report
    pub fn db_name(&self) -> String {
        self.host.replace('.', "-")
    }

    /// Endpoint address as host:port
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

const HOST_COLUMN: &str = "Redis Host";
const PORT_COLUMN: &str = "Port";
const PASSWORD_COLUMN: &str = "Password";
const USER_COLUMN: &str = "User (ACL)";
const TLS_COLUMN: &str = "TLS";

/// Read the endpoint table from a CSV file
pub fn read_endpoint_table(path: &Path) -> Result<Vec<Endpoint>, InputError> {
    let text = fs::read_to_string(path).map_err(|e| InputError::ReadFailed {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_endpoint_table(&text)
}

/// Parse the endpoint table from CSV text
pub fn parse_endpoint_table(text: &str) -> Result<Vec<Endpoint>, InputError> {
    let mut lines = text.lines().enumerate();

    let header = loop {
        match lines.next() {
            Some((_, line)) if line.trim().is_empty() => continue,
            Some((_, line)) => break line,
            None => return Err(InputError::MissingHeader),
        }
    };

    let columns = split_csv_line(header);
    let host_idx = find_column(&columns, HOST_COLUMN)?;
    let port_idx = find_column(&columns, PORT_COLUMN)?;
    let password_idx = find_optional_column(&columns, PASSWORD_COLUMN);
    let user_idx = find_optional_column(&columns, USER_COLUMN);
    let tls_idx = find_optional_column(&columns, TLS_COLUMN);

    let mut endpoints = Vec::new();

    for (line_no, line) in lines {
        if line.trim().is_empty() {
            continue;
        }

        let cells = split_csv_line(line);
        let host = match cells.get(host_idx).map(|s| s.trim()) {
            Some(h) if !h.is_empty() => h.to_string(),
            _ => continue,
        };

        let port_cell = cells.get(port_idx).map(|s| s.trim()).unwrap_or("");
        let port: u16 = port_cell.parse().map_err(|_| InputError::InvalidPort {
            value: port_cell.to_string(),
            line: line_no + 1,
        })?;

        endpoints.push(Endpoint {
            host,
            port,
            password: optional_cell(&cells, password_idx),
            username: optional_cell(&cells, user_idx),
            tls: tls_idx
                .and_then(|idx| cells.get(idx))
                .map(|v| is_truthy(v.trim()))
                .unwrap_or(false),
        });
    }

    Ok(endpoints)
}

/// Split one CSV line, honoring double-quoted cells
fn split_csv_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                // Escaped quote inside a quoted cell
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                cells.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    cells.push(current);
    cells
}

fn find_column(columns: &[String], name: &'static str) -> Result<usize, InputError> {
    find_optional_column(columns, name).ok_or(InputError::MissingColumn(name))
}

fn find_optional_column(columns: &[String], name: &str) -> Option<usize> {
    columns
        .iter()
        .position(|c| c.trim().eq_ignore_ascii_case(name))
}

fn optional_cell(cells: &[String], idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| cells.get(i))
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_table() {
        let text = "Redis Host,Port,Password,User (ACL),TLS\n\
                    cache.example.com,6379,,,\n";
        let endpoints = parse_endpoint_table(text).unwrap();
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].host, "cache.example.com");
        assert_eq!(endpoints[0].port, 6379);
        assert!(endpoints[0].password.is_none());
        assert!(endpoints[0].username.is_none());
        assert!(!endpoints[0].tls);
    }

    #[test]
    fn test_parse_credentials_and_tls() {
        let text = "Redis Host,Port,Password,User (ACL),TLS\n\
                    10.0.0.5,6380,s3cret,app-user,yes\n";
        let endpoints = parse_endpoint_table(text).unwrap();
        assert_eq!(endpoints[0].password.as_deref(), Some("s3cret"));
        assert_eq!(endpoints[0].username.as_deref(), Some("app-user"));
        assert!(endpoints[0].tls);
    }

    #[test]
    fn test_quoted_password_with_comma() {
        let text = "Redis Host,Port,Password,User (ACL),TLS\n\
                    10.0.0.5,6379,\"pa,ss\",,\n";
        let endpoints = parse_endpoint_table(text).unwrap();
        assert_eq!(endpoints[0].password.as_deref(), Some("pa,ss"));
    }

    #[test]
    fn test_blank_rows_skipped() {
        let text = "Redis Host,Port,Password,User (ACL),TLS\n\
                    \n\
                    10.0.0.5,6379,,,\n\
                    ,,,,\n";
        let endpoints = parse_endpoint_table(text).unwrap();
        assert_eq!(endpoints.len(), 1);
    }

    #[test]
    fn test_missing_host_column() {
        let text = "Host,Port\n10.0.0.5,6379\n";
        assert!(matches!(
            parse_endpoint_table(text),
            Err(InputError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_invalid_port() {
        let text = "Redis Host,Port\n10.0.0.5,not-a-port\n";
        assert!(matches!(
            parse_endpoint_table(text),
            Err(InputError::InvalidPort { .. })
        ));
    }

    #[test]
    fn test_db_name_replaces_dots() {
        let endpoint = Endpoint {
            host: "cache.prod.example.com".to_string(),
            port: 6379,
            password: None,
            username: None,
            tls: false,
        };
        assert_eq!(endpoint.db_name(), "cache-prod-example-com");
    }
}
