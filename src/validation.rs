//! Input filtering and configuration checks.
//!
//! This module provides:
//! - the CIDR shape filter applied before parsing
//! - target block count validation
//! - Terraform identifier validation for the generated artifact

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::error::{CidrcapError, Result};

lazy_static! {
    static ref IPV4_CIDR_SHAPE: Regex =
        Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+\.[0-9]+/[0-9]+$").unwrap();
    static ref TERRAFORM_IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*$").unwrap();
}

/// True if `s` looks like `d.d.d.d/d`.
///
/// Only the shape is checked; ranges are left to the parser.
///
/// # Examples
/// ```
/// use cidrcap::validation::is_ipv4_cidr_shape;
/// assert!(is_ipv4_cidr_shape("10.0.0.0/8"));
/// assert!(is_ipv4_cidr_shape("999.0.0.0/8"));
/// assert!(!is_ipv4_cidr_shape("2001:db8::/32"));
/// assert!(!is_ipv4_cidr_shape("10.0.0.1"));
/// ```
pub fn is_ipv4_cidr_shape(s: &str) -> bool {
    IPV4_CIDR_SHAPE.is_match(s.trim())
}

/// Entries kept and dropped by [`filter_ipv4_cidrs`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOutcome {
    pub accepted: Vec<String>,
    pub rejected: Vec<String>,
}

/// Keep IPv4 CIDR-shaped entries, trimmed, in input order.
pub fn filter_ipv4_cidrs<I, S>(entries: I) -> FilterOutcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut outcome = FilterOutcome::default();
    for entry in entries {
        let entry = entry.as_ref().trim();
        if is_ipv4_cidr_shape(entry) {
            outcome.accepted.push(entry.to_string());
        } else {
            debug!("Skipping non-IPv4 CIDR entry: {}", entry);
            outcome.rejected.push(entry.to_string());
        }
    }
    outcome
}

/// Reject a target block count below 1.
pub fn validate_max_blocks(max_blocks: usize) -> Result<()> {
    if max_blocks < 1 {
        return Err(CidrcapError::InvalidTarget(max_blocks));
    }
    Ok(())
}

/// Validate a Terraform local value name.
///
/// # Examples
/// ```
/// use cidrcap::validation::validate_variable_name;
/// assert!(validate_variable_name("external_k8s_cidr_ipv4").is_ok());
/// assert!(validate_variable_name("1bad").is_err());
/// ```
pub fn validate_variable_name(name: &str) -> Result<()> {
    if !TERRAFORM_IDENTIFIER.is_match(name) {
        return Err(CidrcapError::Config(format!(
            "Invalid variable name '{}'. Use letters, digits, '_' or '-', not starting with a digit",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_accepts_cidrs() {
        assert!(is_ipv4_cidr_shape("10.0.0.0/8"));
        assert!(is_ipv4_cidr_shape("0.0.0.0/0"));
        assert!(is_ipv4_cidr_shape(" 18.190.96.139/32 "));
    }

    #[test]
    fn test_shape_leaves_ranges_to_parser() {
        assert!(is_ipv4_cidr_shape("300.0.0.0/8"));
        assert!(is_ipv4_cidr_shape("10.0.0.0/64"));
    }

    #[test]
    fn test_shape_rejects_other_forms() {
        assert!(!is_ipv4_cidr_shape(""));
        assert!(!is_ipv4_cidr_shape("10.0.0.1"));
        assert!(!is_ipv4_cidr_shape("2a03:2880::/29"));
        assert!(!is_ipv4_cidr_shape("10.0.0/8"));
        assert!(!is_ipv4_cidr_shape("10.0.0.0/"));
        assert!(!is_ipv4_cidr_shape("example.com/24"));
        assert!(!is_ipv4_cidr_shape("10.0.0.0/8; rm -rf /"));
    }

    #[test]
    fn test_shape_rejects_non_ascii_digits() {
        assert!(!is_ipv4_cidr_shape("１0.0.0.0/8"));
    }

    #[test]
    fn test_filter_splits_entries() {
        let outcome = filter_ipv4_cidrs(["10.0.0.0/8", "2a03:2880::/29", " 192.168.0.0/16"]);
        assert_eq!(outcome.accepted, vec!["10.0.0.0/8", "192.168.0.0/16"]);
        assert_eq!(outcome.rejected, vec!["2a03:2880::/29"]);
    }

    #[test]
    fn test_validate_max_blocks() {
        assert!(validate_max_blocks(1).is_ok());
        assert!(validate_max_blocks(60).is_ok());
        assert_eq!(validate_max_blocks(0), Err(CidrcapError::InvalidTarget(0)));
    }

    #[test]
    fn test_validate_variable_name() {
        assert!(validate_variable_name("cidrs").is_ok());
        assert!(validate_variable_name("_private-list").is_ok());
        assert!(validate_variable_name("").is_err());
        assert!(validate_variable_name("9lives").is_err());
        assert!(validate_variable_name("a b").is_err());
        assert!(validate_variable_name("x = 1\n").is_err());
    }
}
