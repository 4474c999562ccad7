//! CLI command implementations.

pub mod bbox;
pub mod common;
pub mod config;
pub mod decode;
pub mod fetch;
pub mod import;
