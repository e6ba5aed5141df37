//! Command‑line entry point for the `zrange` tool.
//!
//! Provides subcommands to convert between coordinates and Z-order addresses,
//! decompose rectangle queries into curve fragments, and count indexed points
//! inside a rectangle.

use std::{fmt::Display, io, path::PathBuf, process, str::FromStr};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use zrange::ZCurve;

/// CLI command implementations.
mod cmd;

/// A grid corner parsed from `X,Y`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Corner {
    /// Column.
    x: u64,
    /// Row.
    y: u64,
}

impl FromStr for Corner {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (x, y) = value
            .split_once(',')
            .ok_or_else(|| "corner must be in X,Y form".to_string())?;

        let parse_axis = |label: &str, axis: &str| -> Result<u64, String> {
            axis.trim().parse::<u64>().map_err(|_| {
                format!("invalid {label} coordinate '{axis}': expected a non-negative integer")
            })
        };

        Ok(Self {
            x: parse_axis("x", x)?,
            y: parse_axis("y", y)?,
        })
    }
}

#[derive(Parser)]
#[command(name = "zrange")]
#[command(version = env!("CARGO_PKG_VERSION"))]
/// Top‑level CLI options and subcommands.
struct Cli {
    /// Sets the level of verbosity (`-v`, `-vv`, ...).
    #[arg(
        short,
        global = true,
        action = clap::ArgAction::Count,
        help = "Sets the level of verbosity"
    )]
    v: u8,

    /// Bits per axis.
    #[arg(
        short = 'b',
        long = "bits",
        global = true,
        default_value_t = 8,
        help = "Bits per axis (1-32)"
    )]
    bits: u32,

    /// Command to execute.
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
/// Subcommands supported by the `zrange` tool.
enum Commands {
    #[command(about = "Print the curve address of a point")]
    /// Encode a coordinate pair.
    Encode {
        /// Column.
        x: u64,
        /// Row.
        y: u64,
    },

    #[command(about = "Print the point at a curve address")]
    /// Decode a curve address.
    Decode {
        /// Curve address.
        address: u64,
    },

    #[command(about = "List the curve fragments covering a rectangle")]
    /// Decompose a rectangle query.
    Cover {
        #[arg(help = "Lower corner as X,Y")]
        /// Lower corner.
        lower: Corner,

        #[arg(help = "Upper corner as X,Y")]
        /// Upper corner.
        upper: Corner,

        #[arg(long, help = "Only print the summary line")]
        /// Suppress the per-fragment lines.
        summary: bool,
    },

    #[command(about = "Count indexed points inside a rectangle")]
    /// Count points from a file inside a rectangle query.
    Count {
        #[arg(help = "Lower corner as X,Y")]
        /// Lower corner.
        lower: Corner,

        #[arg(help = "Upper corner as X,Y")]
        /// Upper corner.
        upper: Corner,

        #[arg(
            short = 'p',
            long = "points",
            help = "File of whitespace-separated X Y pairs"
        )]
        /// Input point file.
        points: PathBuf,

        #[arg(long, help = "Skip empty stretches of the key space while scanning")]
        /// Use jump decomposition.
        skip: bool,
    },
}

/// Install the log subscriber; `RUST_LOG` wins over `-v`.
fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Print an error and exit non-zero on failure.
fn report<E: Display>(result: Result<(), E>) {
    if let Err(e) = result {
        eprintln!("{e}");
        process::exit(1);
    }
}

/// Run the selected subcommand against stdout.
fn run(cli: Cli) -> Result<()> {
    let curve = ZCurve::<u64>::new(cli.bits).context("invalid --bits")?;
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Encode { x, y } => cmd::encode(&curve, x, y, &mut out),
        Commands::Decode { address } => cmd::decode(&curve, address, &mut out),
        Commands::Cover {
            lower,
            upper,
            summary,
        } => {
            let query = cmd::query(&curve, lower, upper)?;
            cmd::cover(&curve, &query, summary, &mut out)
        }
        Commands::Count {
            lower,
            upper,
            points,
            skip,
        } => {
            let query = cmd::query(&curve, lower, upper)?;
            let points = cmd::read_points(&points)?;
            cmd::count(curve, &query, points, skip, &mut out)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.v);
    report(run(cli).map_err(|e| format!("{e:#}")));
}
