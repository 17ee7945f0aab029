//! gmap-plotter CLI
//!
//! Usage:
//!   gmap-plotter [OPTIONS] [FILE]
//!
//! Options:
//!   -o, --output <FILE>  Write the map to a file instead of stdout
//!   --api-key <KEY>      Maps API key (overrides the document)
//!   --title <TITLE>      Page title (overrides the document)
//!   -v, --verbose        Log debug output to stderr
//!   -h, --help           Print help

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gmap_plotter::PlotDocument;

#[derive(Parser)]
#[command(name = "gmap-plotter")]
#[command(about = "Render a TOML plot document as an HTML map")]
struct Cli {
    /// Plot document (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Output HTML file (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maps API key
    #[arg(long)]
    api_key: Option<String>,

    /// Page title
    #[arg(long)]
    title: Option<String>,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "gmap_plotter=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Read input
    let source = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer,
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let mut document: PlotDocument = match source.parse() {
        Ok(document) => document,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(key) = cli.api_key {
        document.config.api_key = Some(key);
    }
    if let Some(title) = cli.title {
        document.config.title = title;
    }

    let plotter = match document.into_plotter() {
        Ok(plotter) => plotter,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match &cli.output {
        Some(path) => {
            if let Err(e) = plotter.draw(path) {
                eprintln!("Error writing '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        }
        None => print!("{}", plotter.get()),
    }
}
