//! Port traits the refresh pipeline depends on.

pub mod config_port;
pub mod fetch_port;
pub mod store_port;
