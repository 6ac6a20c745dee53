//! slabkit CLI
//!
//! Command-line driver for the slabkit record store.
//!
//! # Commands
//!
//! - `run` - Append, sort and merge random records across producer threads
//! - `plan` - Show the segments a store would allocate for a record count
//! - `version` - Show version information

mod commands;
mod error;

use clap::{Parser, Subcommand};
use commands::{Format, SlabArgs};
use tracing_subscriber::EnvFilter;

/// slabkit command-line tools.
#[derive(Parser)]
#[command(name = "slabkit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Append, sort and merge random records, then verify the output
    Run {
        /// Total records across all producers
        #[arg(short, long, default_value = "10000")]
        records: usize,

        /// Producer threads, each filling its own store
        #[arg(short, long, default_value = "3")]
        producers: usize,

        /// Seed for the record generator
        #[arg(long, default_value = "24301")]
        seed: u64,

        /// Byte budget shared by every store
        #[arg(short, long)]
        memory_limit: Option<usize>,

        #[command(flatten)]
        slab: SlabArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Show the segments a store would allocate
    Plan {
        /// Record size in bytes
        #[arg(short, long)]
        item_size: usize,

        /// Records to hold
        #[arg(short, long)]
        records: u64,

        #[command(flatten)]
        slab: SlabArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: Format,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Run {
            records,
            producers,
            seed,
            memory_limit,
            slab,
            format,
        } => {
            let options = commands::run::RunOptions {
                records,
                producers,
                seed,
                memory_limit,
                config: slab.to_config(),
            };
            commands::run::run(&options, format)?;
        }
        Commands::Plan {
            item_size,
            records,
            slab,
            format,
        } => {
            commands::plan::run(&slab.to_config(), item_size, records, format)?;
        }
        Commands::Version => {
            println!("slabkit CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("slabkit core v{}", slabkit_core::VERSION);
        }
    }

    Ok(())
}
