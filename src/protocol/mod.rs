//! Judge protocol handling.
//!
//! Line parsing for everything the judge sends and serialization of our
//! move orders.

pub mod orders;
pub mod parser;

pub use orders::{format_order, write_go, write_orders};
pub use parser::{parse_line, Command, ProtocolError};
