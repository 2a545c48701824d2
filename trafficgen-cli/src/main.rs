//! Trafficgen CLI - Command-line interface
//!
//! Runs the route and traffic tile jobs once per invocation, so scheduling is
//! left to cron or a container orchestrator. Job settings come from the
//! environment; flags override them.

mod commands;
mod error;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use commands::grid::GridArgs;
use commands::routes::RoutesArgs;
use commands::sample::SampleArgs;
use commands::tiles::TilesArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "trafficgen")]
#[command(about = "Archive synthetic route and traffic tile data for city polygons", long_about = None)]
#[command(version = trafficgen::VERSION)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query route directions between random points of every city and archive them
    Routes(RoutesArgs),
    /// Query traffic flow tiles covering every city and archive them
    Tiles(TilesArgs),
    /// Print the tile range covering a polygon's bounding box
    Grid(GridArgs),
    /// Print random points sampled inside a polygon
    Sample(SampleArgs),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let _logging = trafficgen::logging::init(cli.verbose, cli.log_file.as_deref())?;

    match cli.command {
        Commands::Routes(args) => commands::routes::run(args),
        Commands::Tiles(args) => commands::tiles::run(args),
        Commands::Grid(args) => commands::grid::run(args),
        Commands::Sample(args) => commands::sample::run(args),
    }
}
