// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Load a mesh file and check it according to a [`CheckConfig`]

use crate::config::CheckConfig;
use crate::io;
use crate::topology::{Mesh, MeshStats};
use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use std::time::{Duration, Instant};

/// Everything `polytopo inspect` learns about a file
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    pub file: String,
    pub stats: MeshStats,
    /// Isolated vertices dropped after loading
    pub stripped: usize,
    /// Rendered invariant violations; empty when the check was skipped or passed
    pub violations: Vec<String>,
    pub checked: bool,
    #[serde(skip)]
    pub load_time: Duration,
}

impl Inspection {
    pub fn is_consistent(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Load the connectivity stored in `path` and inspect it
pub fn inspect_file(path: impl AsRef<Path>, config: &CheckConfig) -> Result<Inspection> {
    let path = path.as_ref();
    let start = Instant::now();
    let mut mesh: Mesh = io::load_topology(path)?;
    let load_time = start.elapsed();

    let stripped = if config.strip_isolated {
        let count = mesh.delete_isolated_vertices();
        mesh.clear_invalid();
        count
    } else {
        0
    };

    let violations = if config.check_invariants {
        mesh.check_invariants_bounded(config.max_loop_len)
            .iter()
            .map(ToString::to_string)
            .collect()
    } else {
        Vec::new()
    };
    log::debug!(
        "inspected {:?}: {} violation(s), {} isolated vertices stripped",
        path,
        violations.len(),
        stripped
    );

    Ok(Inspection {
        file: path.display().to_string(),
        stats: mesh.stats(),
        stripped,
        violations,
        checked: config.check_invariants,
        load_time,
    })
}
