// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Saving and loading mesh files

use anyhow::Result;
use nalgebra::{Point2, Point3};
use polytopo::io::{self, EnvelopeError};
use polytopo::{Mesh, UvMesh};

#[test]
fn uv_mesh_survives_a_file_roundtrip() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("grid.ptop");

    let mesh = UvMesh::grid(3, 2)?;
    io::save(&mesh, &path)?;
    let back: UvMesh = io::load(&path)?;

    assert_eq!(back.stats(), mesh.stats());
    for (a, b) in mesh.vertex_keys().iter().zip(back.vertex_keys()) {
        assert_eq!(mesh.position(*a), back.position(*b));
    }
    for (a, b) in mesh.face_keys().iter().zip(back.face_keys()) {
        let corners_a: Vec<Point2<f64>> = mesh
            .face(*a)
            .unwrap()
            .half_edges()
            .map(|h| h.data().uv)
            .collect();
        let corners_b: Vec<Point2<f64>> = back
            .face(*b)
            .unwrap()
            .half_edges()
            .map(|h| h.data().uv)
            .collect();
        assert_eq!(corners_a, corners_b);
        assert_eq!(
            mesh.face(*a).unwrap().data().smoothing_groups,
            back.face(*b).unwrap().data().smoothing_groups
        );
    }
    Ok(())
}

#[test]
fn topology_only_load_ignores_payloads() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("grid.ptop");

    let mut mesh = UvMesh::grid(1, 1)?;
    mesh.add_point(Point3::new(5.0, 5.0, 5.0));
    io::save(&mesh, &path)?;

    let plain: Mesh = io::load_topology(&path)?;
    assert_eq!(plain.stats(), mesh.stats());
    assert_eq!(plain.stats().isolated_vertices, 1);
    Ok(())
}

#[test]
fn damaged_files_fail_with_context() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("damaged.ptop");

    let mesh = UvMesh::grid(2, 2)?;
    let mut bytes = io::encode(&mesh)?;
    let middle = bytes.len() / 2;
    bytes[middle] ^= 0x55;
    std::fs::write(&path, &bytes)?;

    let err = io::load::<polytopo::adapter::UvKinds>(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("damaged.ptop"));
    assert_eq!(
        err.root_cause().downcast_ref::<EnvelopeError>(),
        Some(&EnvelopeError::DigestMismatch)
    );

    let missing = io::load_topology::<polytopo::Plain>(dir.path().join("missing.ptop"));
    assert!(missing.is_err());
    Ok(())
}
