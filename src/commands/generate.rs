//! Generate command implementation.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::aggregator::{aggregate_prefixes, is_cover, parse_all, Aggregation};
use crate::config::Config;
use crate::render::{render_locals, write_atomic, GENERATOR};
use crate::utils::{format_with_separator, overreach_percent};
use crate::validation::filter_ipv4_cidrs;

/// Aggregate the enabled sources of `config` and render the Terraform file.
pub fn build(config: &Config, max_blocks: usize) -> Result<(Aggregation, String)> {
    let filtered = filter_ipv4_cidrs(config.enabled_cidrs());
    if !filtered.rejected.is_empty() {
        info!(
            "Skipped {} entries that are not IPv4 CIDRs",
            filtered.rejected.len()
        );
    }

    let prefixes = parse_all(&filtered.accepted)?;
    let result = aggregate_prefixes(&prefixes, max_blocks)?;

    // A list that does not cover its input must never reach the policy.
    if !is_cover(&result.blocks, &prefixes) {
        anyhow::bail!("Aggregated blocks do not cover the input ranges");
    }

    let content = render_locals(&result.to_strings(), &config.variable, GENERATOR)?;
    Ok((result, content))
}

/// Run the generate command
pub fn run(
    config_path: &Path,
    max_blocks: Option<usize>,
    output_file: Option<PathBuf>,
    dry_run: bool,
) -> Result<()> {
    let config = Config::load_or_default(config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;
    let max_blocks = max_blocks.unwrap_or(config.max_blocks);
    let output_file = output_file.unwrap_or_else(|| config.output_file.clone());

    info!(
        "Aggregating sources [{}] into at most {} blocks...",
        config.enabled_sources().join(", "),
        max_blocks
    );

    let (result, content) = build(&config, max_blocks)?;
    let stats = result.stats;

    if stats.output_count == 0 {
        warn!("No IPv4 ranges configured, generated list is empty");
    }
    info!(
        "{} ranges -> {} blocks ({} collapses)",
        stats.input_count, stats.output_count, stats.collapses
    );
    info!(
        "Covered addresses: {} -> {} (+{:.2}%)",
        format_with_separator(stats.input_addresses),
        format_with_separator(stats.output_addresses),
        overreach_percent(stats.input_addresses, stats.output_addresses)
    );

    if dry_run {
        print!("{}", content);
        return Ok(());
    }

    write_atomic(&output_file, &content)?;
    info!("Wrote {:?}", output_file);

    Ok(())
}
