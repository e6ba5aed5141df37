//! Project automation tasks for the zrange workspace.
//!
//! Run via `cargo xtask <command>`.

use std::{path::PathBuf, process};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use xshell::{Shell, cmd};

/// Command line interface for the `xtask` helper.
#[derive(Debug, Parser)]
#[command(name = "xtask")]
struct Cli {
    /// Task to run.
    #[command(subcommand)]
    command: Task,
}

/// Supported automation tasks.
#[derive(Debug, Subcommand)]
enum Task {
    /// Format the workspace and apply clippy fixes.
    Tidy,
    /// Run the test suite with nextest, then the doc tests.
    Test,
    /// Run the criterion benchmarks of the `zrange` crate.
    Bench {
        /// Only run benchmarks whose id contains this filter.
        filter: Option<String>,
    },
}

/// The workspace the tasks operate on.
#[derive(Debug, Clone)]
struct Workspace {
    /// Directory holding the root `Cargo.toml`.
    root: PathBuf,
}

impl Workspace {
    /// Locate the workspace as the parent of this crate's manifest directory.
    fn locate() -> Result<Self> {
        let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
        let root = manifest_dir
            .parent()
            .map(PathBuf::from)
            .context("xtask has no parent directory")?;
        Ok(Self { root })
    }

    /// A shell whose working directory is the workspace root.
    fn shell(&self) -> Result<Shell> {
        let sh = Shell::new()?;
        sh.change_dir(&self.root);
        Ok(sh)
    }

    /// Run the selected task.
    fn run(&self, task: Task) -> Result<()> {
        let sh = self.shell()?;
        match task {
            Task::Tidy => {
                cmd!(sh, "cargo +nightly fmt --all").run()?;
                cmd!(
                    sh,
                    "cargo clippy -q --fix --all --all-targets --all-features --allow-dirty --tests --benches"
                )
                .run()?;
                // clippy fixes can leave code unformatted
                cmd!(sh, "cargo +nightly fmt --all").run()?;
            }
            Task::Test => {
                cmd!(sh, "cargo nextest run --all").run()?;
                cmd!(sh, "cargo test --doc -p zrange").run()?;
            }
            Task::Bench { filter } => {
                let filter = filter.as_slice();
                cmd!(sh, "cargo bench -p zrange -- {filter...}").run()?;
            }
        }
        Ok(())
    }
}

fn main() {
    let cli = Cli::parse();
    let result = Workspace::locate().and_then(|ws| ws.run(cli.command));
    if let Err(err) = result {
        eprintln!("xtask: {err:#}");
        process::exit(1);
    }
}
