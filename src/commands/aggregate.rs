//! Aggregate command implementation.

use anyhow::{Context, Result};
use std::io::BufRead;
use tracing::info;

use crate::aggregator::{aggregate_prefixes, parse_all};
use crate::cli::OutputFormat;
use crate::prefix::Prefix;
use crate::utils::format_with_separator;

/// Read CIDRs one per line, skipping blanks and `#` comments.
pub fn read_cidrs<R: BufRead>(reader: R) -> Result<Vec<String>> {
    let mut cidrs = Vec::new();
    for line in reader.lines() {
        let line = line.context("Failed to read input")?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        cidrs.push(trimmed.to_string());
    }
    Ok(cidrs)
}

/// Render the aggregated blocks.
pub fn format_output(blocks: &[Prefix], format: OutputFormat) -> Result<String> {
    let strings: Vec<String> = blocks.iter().map(Prefix::to_string).collect();
    match format {
        OutputFormat::Text => Ok(strings
            .iter()
            .map(|s| format!("{}\n", s))
            .collect::<String>()),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&strings)
                .context("Failed to serialize output")?;
            Ok(format!("{}\n", json))
        }
    }
}

/// Run the aggregate command
pub fn run(cidrs: Vec<String>, max_blocks: usize, format: OutputFormat) -> Result<()> {
    let cidrs = if cidrs.is_empty() {
        read_cidrs(std::io::stdin().lock())?
    } else {
        cidrs
    };

    let prefixes = parse_all(&cidrs)?;
    let result = aggregate_prefixes(&prefixes, max_blocks)?;
    info!(
        "{} -> {} blocks, {} extra addresses",
        result.stats.input_count,
        result.stats.output_count,
        format_with_separator(result.stats.overreach())
    );

    print!("{}", format_output(&result.blocks, format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_cidrs_skips_comments() {
        let input = "# Meta\n129.134.0.0/19\n\n  31.13.96.0/19  \n# end\n";
        let cidrs = read_cidrs(input.as_bytes()).unwrap();
        assert_eq!(cidrs, vec!["129.134.0.0/19", "31.13.96.0/19"]);
    }

    #[test]
    fn test_format_text() {
        let blocks = parse_all(&["10.0.0.0/23", "192.168.0.0/24"]).unwrap();
        let out = format_output(&blocks, OutputFormat::Text).unwrap();
        assert_eq!(out, "10.0.0.0/23\n192.168.0.0/24\n");
    }

    #[test]
    fn test_format_json() {
        let blocks = parse_all(&["10.0.0.0/23"]).unwrap();
        let out = format_output(&blocks, OutputFormat::Json).unwrap();
        let parsed: Vec<String> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, vec!["10.0.0.0/23"]);
    }

    #[test]
    fn test_run_rejects_malformed() {
        let result = run(vec!["10.0.0.0/8".into(), "nope".into()], 2, OutputFormat::Text);
        assert!(result.is_err());
    }
}
