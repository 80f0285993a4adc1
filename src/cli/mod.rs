//! CLI command handlers

pub mod commands;

pub use commands::{catalog, inspect, locate, write};
