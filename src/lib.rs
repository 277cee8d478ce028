//! # cidrcap - bounded CIDR cover generation
//!
//! Security groups and similar policies accept a fixed number of rules.
//! cidrcap reduces an arbitrary list of IPv4 CIDR blocks to at most N blocks
//! whose union still contains every input address, so the result can be used
//! as a conservative allowlist.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────┐   ┌─────────┐   ┌──────────┐   ┌──────────┐   ┌────────┐
//! │  Filter  │──▶│  Parse  │──▶│  Build   │──▶│  Reduce  │──▶│  Emit  │
//! │ (regex)  │   │ Prefix  │   │  trie    │   │ to <= N  │   │ a.b.c.d│
//! └──────────┘   └─────────┘   └──────────┘   └──────────┘   └────────┘
//! ```
//!
//! Reduction repeatedly folds the longest leaf (ties: largest value) into its
//! parent. Folding never removes addresses, so the output always covers the
//! input, and nothing is merged while the leaf count is already within N.
//!
//! ## Example Usage
//!
//! ```
//! use cidrcap::aggregator::aggregate;
//!
//! let blocks = aggregate(&["10.0.0.0/24", "10.0.1.0/24", "192.168.0.0/24"], 2).unwrap();
//! // 192.168.0.0/24 is folded first: same length, larger value.
//! assert_eq!(blocks, vec!["10.0.0.0/23", "192.168.0.0/23"]);
//! ```
//!
//! ## Modules
//!
//! - [`aggregator`] - Trie reduction and coverage statistics
//! - [`cli`] - Command-line interface definitions
//! - [`commands`] - CLI command implementations
//! - [`config`] - Configuration parsing and validation
//! - [`error`] - Library error type
//! - [`prefix`] - IPv4 prefixes as bit strings
//! - [`registry`] - Ordered leaf registry
//! - [`render`] - Generated Terraform artifact
//! - [`trie`] - Arena-backed binary trie
//! - [`utils`] - Formatting helpers
//! - [`validation`] - Input filtering and value checks

pub mod aggregator;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod prefix;
pub mod registry;
pub mod render;
pub mod trie;
pub mod utils;
pub mod validation;

pub use aggregator::{aggregate, aggregate_prefixes, Aggregation, AggregationStats};
pub use config::Config;
pub use error::CidrcapError;
pub use prefix::Prefix;
