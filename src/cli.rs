//! CLI argument parsing with clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cidrcap")]
#[command(
    author,
    version,
    about = "Reduce IPv4 CIDR lists to a bounded number of covering blocks"
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "cidrcap.yaml", global = true)]
    pub config: PathBuf,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Aggregate the configured sources and write the Terraform file
    Generate {
        /// Override the configured block budget
        #[arg(long, alias = "rules-per-sg")]
        max_blocks: Option<usize>,

        /// Override the configured output file
        #[arg(long)]
        output_file: Option<PathBuf>,

        /// Print the generated file instead of writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Aggregate CIDRs given as arguments (or one per line on stdin)
    Aggregate {
        /// CIDR blocks (a.b.c.d/n)
        cidrs: Vec<String>,

        /// Maximum number of blocks to emit
        #[arg(long, short = 'n', default_value = "60")]
        max_blocks: usize,

        /// Output format
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Write a default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show version
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One CIDR per line
    Text,
    /// JSON array
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses_help() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_version_command() {
        let cli = Cli::try_parse_from(["cidrcap", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_cli_generate_defaults() {
        let cli = Cli::try_parse_from(["cidrcap", "generate"]).unwrap();
        match cli.command {
            Commands::Generate {
                max_blocks,
                output_file,
                dry_run,
            } => {
                assert!(max_blocks.is_none());
                assert!(output_file.is_none());
                assert!(!dry_run);
            }
            _ => panic!("Expected Generate command"),
        }
        assert_eq!(cli.config, PathBuf::from("cidrcap.yaml"));
    }

    #[test]
    fn test_cli_generate_rules_per_sg_alias() {
        let cli = Cli::try_parse_from(["cidrcap", "generate", "--rules-per-sg", "40"]).unwrap();
        match cli.command {
            Commands::Generate { max_blocks, .. } => assert_eq!(max_blocks, Some(40)),
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_cli_aggregate_command() {
        let cli = Cli::try_parse_from([
            "cidrcap",
            "aggregate",
            "10.0.0.0/24",
            "10.0.1.0/24",
            "-n",
            "1",
            "--format",
            "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Aggregate {
                cidrs,
                max_blocks,
                format,
            } => {
                assert_eq!(cidrs, vec!["10.0.0.0/24", "10.0.1.0/24"]);
                assert_eq!(max_blocks, 1);
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("Expected Aggregate command"),
        }
    }

    #[test]
    fn test_cli_global_flags() {
        let cli =
            Cli::try_parse_from(["cidrcap", "init-config", "--force", "-v", "-c", "/tmp/x.yaml"])
                .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("/tmp/x.yaml"));
        assert!(matches!(cli.command, Commands::InitConfig { force: true }));
    }

    #[test]
    fn test_cli_rejects_negative_budget() {
        assert!(Cli::try_parse_from(["cidrcap", "aggregate", "-n", "-1"]).is_err());
    }
}
