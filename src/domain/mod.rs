//! Core domain types and logic.

pub mod config;
pub mod dedup;
pub mod error;
pub mod holiday;
pub mod refresh;
