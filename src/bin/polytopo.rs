// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polytopo CLI: inspect and generate mesh files

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use polytopo::cli::{inspect_file, Reporter};
use polytopo::{io, CheckConfig, UvMesh};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "polytopo")]
#[command(about = "Polytopo - half-edge mesh topology tool", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to polytopo.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a mesh file, check it and print statistics
    Inspect {
        /// Input mesh file
        input: PathBuf,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Drop isolated vertices before checking
        #[arg(long)]
        strip_isolated: bool,

        /// Skip the invariant checker
        #[arg(long)]
        no_check: bool,
    },

    /// Build a flat quad grid and save it
    Grid {
        #[arg(long, default_value = "4")]
        rows: usize,

        #[arg(long, default_value = "4")]
        cols: usize,

        /// Output mesh file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => CheckConfig::from_file(path)?
            .with_env_overrides(|key| std::env::var(key).ok()),
        None => CheckConfig::load()?,
    };
    config.verbose |= cli.verbose;

    match cli.command {
        Commands::Inspect {
            input,
            json,
            strip_isolated,
            no_check,
        } => {
            config.strip_isolated |= strip_isolated;
            config.check_invariants &= !no_check;
            inspect_command(&input, json, &config)?;
        }
        Commands::Grid { rows, cols, output } => {
            grid_command(rows, cols, &output, config.verbose)?;
        }
        Commands::Version => {
            println!("Polytopo v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn inspect_command(input: &Path, json: bool, config: &CheckConfig) -> Result<()> {
    if !input.exists() {
        Reporter::report_error(&format!("Input file not found: {}", input.display()));
        std::process::exit(1);
    }

    let report = inspect_file(input, config)?;

    if json {
        let text = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{}", text);
    } else {
        Reporter::report_stats(&report.file, &report.stats, report.load_time);
        if report.stripped > 0 {
            Reporter::report_info(&format!("Stripped {} isolated vertices", report.stripped));
        }
        if report.checked {
            Reporter::report_violations(&report.violations);
        } else if config.verbose {
            Reporter::report_warning("Invariant check skipped");
        }
    }

    if !report.is_consistent() {
        std::process::exit(1);
    }
    Ok(())
}

fn grid_command(rows: usize, cols: usize, output: &Path, verbose: bool) -> Result<()> {
    if rows == 0 || cols == 0 {
        Reporter::report_error("Grid needs at least one row and one column");
        std::process::exit(1);
    }

    let mesh = UvMesh::grid(rows, cols).context("Failed to build grid")?;
    io::save(&mesh, output)?;

    if verbose {
        let stats = mesh.stats();
        Reporter::report_info(&format!(
            "{} vertices, {} edges, {} faces",
            stats.vertices, stats.edges, stats.faces
        ));
    }
    Reporter::success(&format!("Wrote {}x{} grid to {}", rows, cols, output.display()));
    Ok(())
}
