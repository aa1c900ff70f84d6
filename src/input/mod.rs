//! Endpoint input table

pub mod endpoints;

pub use endpoints::{parse_endpoint_table, read_endpoint_table, Endpoint};
