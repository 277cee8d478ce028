//! cidrcap - bounded CIDR cover generation for rule-limited security policies.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cidrcap::cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    // Logs go to stderr so stdout stays machine-readable.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Generate {
            max_blocks,
            output_file,
            dry_run,
        } => cidrcap::commands::generate::run(&cli.config, max_blocks, output_file, dry_run),
        Commands::Aggregate {
            cidrs,
            max_blocks,
            format,
        } => cidrcap::commands::aggregate::run(cidrs, max_blocks, format),
        Commands::InitConfig { force } => cidrcap::commands::init_config::run(&cli.config, force),
        Commands::Version => {
            println!("cidrcap {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
