//! Utility modules

pub mod error;
pub mod resp;

pub use error::{CollectorError, ConnectionError, InputError, Result, TopologyError};
pub use resp::{RespDecoder, RespEncoder, RespValue};
