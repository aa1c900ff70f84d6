//! INFO response parsing and point-in-time snapshots
//!
//! INFO and INFO COMMANDSTATS return flat `key:value` text. Values are
//! coerced into a tagged variant: float if the text has a decimal point,
//! else integer if numeric, else a sub-mapping if it holds comma-separated
//! `k=v` pairs (keyspace and commandstats sections), else plain string.

use std::collections::HashMap;
use std::time::Instant;

/// Parsed INFO field value
#[derive(Debug, Clone, PartialEq)]
pub enum InfoValue {
    Int(i64),
    Float(f64),
    Str(String),
    Map(HashMap<String, InfoValue>),
}

impl InfoValue {
    /// Get as integer
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            InfoValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as float (integers widen)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            InfoValue::Int(v) => Some(*v as f64),
            InfoValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as sub-mapping
    pub fn as_map(&self) -> Option<&HashMap<String, InfoValue>> {
        match self {
            InfoValue::Map(m) => Some(m),
            _ => None,
        }
    }
}

/// Coerce one raw INFO value
fn coerce_value(raw: &str) -> InfoValue {
    if raw.contains(',') && raw.contains('=') {
        let mut map = HashMap::new();
        for item in raw.split(',') {
            if let Some((k, v)) = item.rsplit_once('=') {
                map.insert(k.to_string(), coerce_value(v));
            }
        }
        return InfoValue::Map(map);
    }

    if raw.contains('.') {
        if let Ok(f) = raw.parse::<f64>() {
            return InfoValue::Float(f);
        }
    } else if let Ok(i) = raw.parse::<i64>() {
        return InfoValue::Int(i);
    }

    InfoValue::Str(raw.to_string())
}

/// One point-in-time capture of server status and command counters
///
/// Never mutated after capture; deltas are computed between two snapshots
/// of the same node.
#[derive(Debug, Clone)]
pub struct InfoSnapshot {
    fields: HashMap<String, InfoValue>,
    captured_at: Instant,
}

impl InfoSnapshot {
    /// Parse an INFO response into a snapshot
    pub fn parse(text: &str) -> Self {
        let mut snapshot = Self {
            fields: HashMap::new(),
            captured_at: Instant::now(),
        };
        snapshot.extend(text);
        snapshot
    }

    /// Parse additional INFO text into this snapshot
    ///
    /// Used to fold INFO and INFO COMMANDSTATS, captured back to back,
    /// into one logical snapshot. Key spaces do not overlap.
    pub fn extend(&mut self, text: &str) {
        for line in text.lines() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };

            // The 'host:' pseudo-command is the one key that itself
            // contains a colon, so its line splits on the last colon.
            let (key, value) = if key == "cmdstat_host" {
                line.rsplit_once(':').unwrap_or((key, value))
            } else {
                (key, value)
            };

            self.fields.insert(key.to_string(), coerce_value(value));
        }
    }

    /// Instant at which this snapshot was captured
    pub fn captured_at(&self) -> Instant {
        self.captured_at
    }

    /// Get a field value
    pub fn get(&self, key: &str) -> Option<&InfoValue> {
        self.fields.get(key)
    }

    /// Get an integer field
    pub fn int(&self, key: &str) -> Option<i64> {
        self.fields.get(key).and_then(InfoValue::as_i64)
    }

    /// Get the call counter for one command from the commandstats section
    pub fn command_calls(&self, command: &str) -> Option<i64> {
        self.fields
            .get(&format!("cmdstat_{}", command))
            .and_then(InfoValue::as_map)
            .and_then(|m| m.get("calls"))
            .and_then(InfoValue::as_i64)
    }

    /// Total keys across the logical databases db0..db9
    ///
    /// Missing databases contribute zero.
    pub fn keyspace_items(&self) -> i64 {
        (0..10)
            .filter_map(|idx| {
                self.fields
                    .get(&format!("db{}", idx))
                    .and_then(InfoValue::as_map)
                    .and_then(|m| m.get("keys"))
                    .and_then(InfoValue::as_i64)
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_and_float_coercion() {
        let snap = InfoSnapshot::parse(
            "connected_clients:42\r\nmem_fragmentation_ratio:1.23\r\n",
        );
        assert_eq!(snap.int("connected_clients"), Some(42));
        assert_eq!(
            snap.get("mem_fragmentation_ratio"),
            Some(&InfoValue::Float(1.23))
        );
        assert_eq!(snap.get("connected_clients").unwrap().as_f64(), Some(42.0));
    }

    #[test]
    fn test_version_string_stays_string() {
        // Contains dots but is not a number
        let snap = InfoSnapshot::parse("redis_version:7.0.5\r\n");
        assert_eq!(
            snap.get("redis_version"),
            Some(&InfoValue::Str("7.0.5".to_string()))
        );
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let snap = InfoSnapshot::parse("# Server\r\n\r\nuptime_in_seconds:100\r\n");
        assert_eq!(snap.int("uptime_in_seconds"), Some(100));
        assert!(snap.get("# Server").is_none());
    }

    #[test]
    fn test_commandstats_sub_mapping() {
        let snap =
            InfoSnapshot::parse("cmdstat_get:calls=100,usec=500,usec_per_call=5.00\r\n");
        assert_eq!(snap.command_calls("get"), Some(100));
        let map = snap.get("cmdstat_get").unwrap().as_map().unwrap();
        assert_eq!(map.get("usec_per_call"), Some(&InfoValue::Float(5.0)));
    }

    #[test]
    fn test_cmdstat_host_splits_on_last_colon() {
        let snap = InfoSnapshot::parse("cmdstat_host::calls=2,usec=50,usec_per_call=25.00\r\n");
        let map = snap.get("cmdstat_host:").unwrap().as_map().unwrap();
        assert_eq!(map.get("calls"), Some(&InfoValue::Int(2)));
    }

    #[test]
    fn test_single_pair_without_comma_stays_string() {
        let snap = InfoSnapshot::parse("maxmemory_policy:allkeys=lru\r\n");
        assert_eq!(
            snap.get("maxmemory_policy"),
            Some(&InfoValue::Str("allkeys=lru".to_string()))
        );
    }

    #[test]
    fn test_keyspace_items_sums_databases() {
        let snap = InfoSnapshot::parse(
            "db0:keys=871,expires=0,avg_ttl=0\r\ndb3:keys=129,expires=10,avg_ttl=0\r\n",
        );
        assert_eq!(snap.keyspace_items(), 1000);
    }

    #[test]
    fn test_keyspace_missing_is_zero() {
        let snap = InfoSnapshot::parse("connected_clients:1\r\n");
        assert_eq!(snap.keyspace_items(), 0);
    }

    #[test]
    fn test_extend_merges_sections() {
        let mut snap = InfoSnapshot::parse("total_commands_processed:500\r\n");
        snap.extend("cmdstat_set:calls=10,usec=100,usec_per_call=10.00\r\n");
        assert_eq!(snap.int("total_commands_processed"), Some(500));
        assert_eq!(snap.command_calls("set"), Some(10));
    }

    #[test]
    fn test_missing_command_is_none() {
        let snap = InfoSnapshot::parse("cmdstat_get:calls=1,usec=5,usec_per_call=5.00\r\n");
        assert_eq!(snap.command_calls("xadd"), None);
    }
}
