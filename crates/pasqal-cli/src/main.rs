//! Pasqal Command-Line Interface
//!
//! Generate neutral-atom site layouts, inspect device files and check
//! operation lists against a device.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::common::{OutputFormat, Shape};
use commands::{describe, layout, validate};

/// Pasqal - neutral-atom device layouts and operation validation
#[derive(Parser)]
#[command(name = "pasqal")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a device file for a lattice shape
    Layout {
        /// Lattice shape
        #[arg(value_enum)]
        shape: Shape,

        /// Side length (cube, square) or lattice size (triangular)
        #[arg(short, long, default_value = "2")]
        size: u32,

        /// Extent along x (rect, parallelepiped); defaults to --size
        #[arg(long)]
        rows: Option<u32>,

        /// Extent along y (rect, parallelepiped); defaults to --size
        #[arg(long)]
        cols: Option<u32>,

        /// Extent along z (parallelepiped); defaults to --size
        #[arg(long)]
        lays: Option<u32>,

        /// Offset along x
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        top: i64,

        /// Offset along y
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        left: i64,

        /// Offset along z
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        upper: i64,

        /// Control radius written to the device file
        #[arg(short, long, default_value = "1.5")]
        radius: f64,

        /// List every site instead of the shape parameters
        #[arg(long)]
        expand: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "yaml")]
        format: OutputFormat,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Show a device's sites, radius and durations
    Describe {
        /// Device file (YAML or JSON)
        #[arg(short, long)]
        device: String,
    },

    /// Check a JSON list of operations against a device
    Validate {
        /// Device file (YAML or JSON)
        #[arg(short, long)]
        device: String,

        /// Operations file (JSON array)
        #[arg(long)]
        ops: String,

        /// Lower non-native gates before validating
        #[arg(long)]
        decompose: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Layout {
            shape,
            size,
            rows,
            cols,
            lays,
            top,
            left,
            upper,
            radius,
            expand,
            format,
            output,
        } => {
            let args = layout::LayoutArgs {
                shape,
                size,
                rows: rows.unwrap_or(size),
                cols: cols.unwrap_or(size),
                lays: lays.unwrap_or(size),
                top,
                left,
                upper,
            };
            layout::execute(&args, radius, expand, format, output.as_deref())
        }

        Commands::Describe { device } => describe::execute(&device),

        Commands::Validate {
            device,
            ops,
            decompose,
        } => validate::execute(&device, &ops, decompose),
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
