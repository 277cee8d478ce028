//! CLI command implementations.

pub mod aggregate;
pub mod generate;
pub mod init_config;
