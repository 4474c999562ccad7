//! CellGuard CLI - Command-line interface
//!
//! This binary wires console and Linux implementations of the platform
//! collaborators to the CellGuard library.

mod commands;
mod console;
mod error;
mod runner;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use commands::common::{CellArgs, PositionArgs};
use commands::config::ConfigCommands;
use error::CliError;

#[derive(Debug, Parser)]
#[command(
    name = "cellguard",
    version,
    about = "Cell tower reference data for IMSI-catcher detection"
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the bounding box around a position
    Bbox {
        #[command(flatten)]
        position: PositionArgs,
    },

    /// Decode a raw radio response dump into text lines
    Decode {
        /// File with the raw bytes (or hex text with --hex)
        file: PathBuf,

        /// Input is hex text instead of binary
        #[arg(long)]
        hex: bool,

        /// Slot width in bytes
        #[arg(long, default_value_t = cellguard::radio::SLOT_WIDTH)]
        slot_width: usize,

        /// Header bytes at the start of each slot
        #[arg(long, default_value_t = cellguard::radio::SLOT_HEADER_LEN)]
        header_len: usize,
    },

    /// Download OpenCellID data around a position
    Fetch {
        #[command(flatten)]
        position: PositionArgs,

        #[command(flatten)]
        cell: CellArgs,

        /// OpenCellID API key (overrides config)
        #[arg(long)]
        api_key: Option<String>,

        /// Write the downloaded towers to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import towers from an OpenCellID CSV export (plain or .gz)
    Import {
        /// Export file
        file: PathBuf,

        #[command(flatten)]
        position: PositionArgs,

        #[command(flatten)]
        cell: CellArgs,

        /// Write the imported towers to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// View or change configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Bbox { position } => commands::bbox::run(position),
        Commands::Decode {
            file,
            hex,
            slot_width,
            header_len,
        } => commands::decode::run(commands::decode::DecodeArgs {
            file,
            hex,
            slot_width,
            header_len,
        }),
        Commands::Fetch {
            position,
            cell,
            api_key,
            output,
        } => commands::fetch::run(
            commands::fetch::FetchArgs {
                position,
                cell,
                api_key,
                output,
            },
            cli.verbose,
        ),
        Commands::Import {
            file,
            position,
            cell,
            output,
        } => commands::import::run(
            commands::import::ImportArgs {
                file,
                position,
                cell,
                output,
            },
            cli.verbose,
        ),
        Commands::Config(command) => commands::config::run(command),
    }
}
