//! JacketCreator CLI - command-line interface
//!
//! Builds Android and iOS jacket bundles from one cover image.

mod commands;
mod error;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};

use commands::build::BuildArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "jacketcreator", version = jacketcreator::VERSION)]
#[command(about = "Build song jacket asset bundles for Android and iOS")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build both platform bundles from a cover image
    Build {
        /// Source image (PNG, JPEG, BMP, ...)
        #[arg(short, long)]
        image: PathBuf,

        /// Output directory, created if missing
        #[arg(short, long)]
        output: PathBuf,

        /// Song identifier; reduced to abs(id) mod 10000
        #[arg(short, long, allow_hyphen_values = true)]
        song_id: i64,

        /// Path ID of the small PVR texture
        #[arg(long, allow_hyphen_values = true)]
        pvr_path_id: i64,

        /// Path ID of the medium DDS texture
        #[arg(long, allow_hyphen_values = true)]
        dds_path_id: i64,

        /// Configuration file (defaults to the per-user config.ini)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Side length of the small variant
        #[arg(long)]
        small_size: Option<u32>,

        /// Side length of the medium variant
        #[arg(long)]
        medium_size: Option<u32>,

        /// Encode the two variants concurrently
        #[arg(long)]
        parallel: bool,
    },

    /// Write a default configuration file
    Init {
        /// Where to write it (defaults to the per-user config.ini)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    jacketcreator::logging::init_logging(cli.verbose);

    if let Err(err) = run(cli.command) {
        eprintln!("ERROR: {}", err);
        process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Build {
            image,
            output,
            song_id,
            pvr_path_id,
            dds_path_id,
            config,
            small_size,
            medium_size,
            parallel,
        } => commands::build::run(BuildArgs {
            image,
            output,
            song_id,
            pvr_path_id,
            dds_path_id,
            config,
            small_size,
            medium_size,
            parallel,
        }),
        Commands::Init { path, force } => commands::init::run(path, force),
    }
}
