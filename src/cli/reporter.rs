// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::topology::MeshStats;
use colored::*;
use std::fmt;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Report mesh statistics for a loaded file
    pub fn report_stats(file: &str, stats: &MeshStats, load_time: Duration) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{} {}", "File:".bold(), file.cyan());
        println!("{}", "━".repeat(80).bright_black());

        println!("\n{}", "Entities:".bold());
        Self::print_count("Vertices", stats.vertices);
        Self::print_count("Half-edges", stats.half_edges);
        Self::print_count("Edges", stats.edges);
        Self::print_count("Faces", stats.faces);
        if stats.pending > 0 {
            Self::print_count("Pending", stats.pending);
        }

        println!("\n{}", "Shape:".bold());
        Self::print_count("Boundary edges", stats.boundary_edges);
        Self::print_count("Boundary loops", stats.boundary_loops);
        Self::print_count("Isolated vertices", stats.isolated_vertices);
        Self::print_count("Singular vertices", stats.singular_vertices);
        println!(
            "  {} {}",
            "Euler characteristic:".bright_black(),
            stats.euler_characteristic.to_string().cyan()
        );

        println!("\n{}", "Performance:".bold());
        println!(
            "  {} {}",
            "Load:".bright_black(),
            Self::format_duration(load_time).yellow()
        );
        println!("{}", "━".repeat(80).bright_black());
    }

    /// Report the outcome of an invariant check
    pub fn report_violations<T: fmt::Display>(violations: &[T]) {
        if violations.is_empty() {
            println!("{} {}", "✅".green(), "Topology is consistent".green().bold());
            return;
        }

        println!(
            "{} {}",
            "❌".red(),
            format!("{} invariant violation(s)", violations.len()).red().bold()
        );
        for violation in violations.iter().take(20) {
            println!("  {} {}", "•".red(), violation);
        }
        if violations.len() > 20 {
            println!(
                "  {}",
                format!("... and {} more", violations.len() - 20).bright_black()
            );
        }
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("\n{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Report info
    pub fn report_info(message: &str) {
        println!("{} {}", "ℹ️".bright_blue(), message);
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }

    fn print_count(name: &str, value: usize) {
        println!(
            "  {} {}",
            format!("{}:", name).bright_black(),
            value.to_string().cyan()
        );
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}
