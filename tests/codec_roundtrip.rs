// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Blob round-trips preserve connectivity under renumbering

use polytopo::io::{deserialize, deserialize_into, serialize};
use polytopo::{Mesh, TopologyError, UvMesh};
use std::collections::HashMap;
use std::hash::Hash;

fn index_of<T: Copy + Eq + Hash>(keys: &[T]) -> HashMap<T, usize> {
    keys.iter().enumerate().map(|(i, &k)| (k, i)).collect()
}

/// Every link rewritten as a position in the live lists
fn connectivity(mesh: &Mesh) -> Vec<[i64; 6]> {
    let vertices = index_of(mesh.vertex_keys());
    let half_edges = index_of(mesh.half_edge_keys());
    let edges = index_of(mesh.edge_keys());
    let faces = index_of(mesh.face_keys());

    let mut rows: Vec<[i64; 6]> = mesh
        .half_edge_keys()
        .iter()
        .map(|&h| {
            let he = mesh.half_edge_entry(h).unwrap();
            [
                half_edges[&he.twin()] as i64,
                half_edges[&he.next()] as i64,
                half_edges[&he.prev()] as i64,
                vertices[&he.vert()] as i64,
                edges[&he.edge()] as i64,
                he.face().map_or(-1, |f| faces[&f] as i64),
            ]
        })
        .collect();

    for &v in mesh.vertex_keys() {
        let out = mesh.vertex_half_edge(v).map_or(-1, |h| half_edges[&h] as i64);
        rows.push([out, -2, -2, -2, -2, -2]);
    }
    for &f in mesh.face_keys() {
        let h = mesh.face_half_edge(f).unwrap();
        rows.push([half_edges[&h] as i64, -3, -3, -3, -3, -3]);
    }
    rows
}

fn annulus() -> Mesh {
    let mut mesh: Mesh = Mesh::new();
    let outer: Vec<_> = (0..4).map(|_| mesh.add_vertex()).collect();
    let inner: Vec<_> = (0..4).map(|_| mesh.add_vertex()).collect();
    for i in 0..4 {
        let j = (i + 1) % 4;
        mesh.add_face(&[outer[i], outer[j], inner[j], inner[i]]).unwrap();
    }
    mesh.add_vertex();
    mesh
}

#[test]
fn roundtrip_is_isomorphic() {
    let mesh = annulus();
    let back: Mesh = deserialize(&serialize(&mesh)).unwrap();

    assert_eq!(back.stats(), mesh.stats());
    assert_eq!(connectivity(&back), connectivity(&mesh));
    assert_eq!(back.stats().boundary_loops, 2);
    assert!(back.is_valid());
}

#[test]
fn roundtrip_after_edits_skips_pending_entities() {
    let mut mesh = annulus();
    let f = mesh.face_keys()[0];
    mesh.remove_face(f).unwrap();
    assert!(mesh.invalid_count() > 0);

    let back: Mesh = deserialize(&serialize(&mesh)).unwrap();
    assert_eq!(back.invalid_count(), 0);
    assert_eq!(back.face_count(), 3);
    assert_eq!(connectivity(&back), connectivity(&mesh));
}

#[test]
fn deserialize_appends_to_existing_mesh() {
    let source = annulus();
    let blob = serialize(&source);

    let mut target: Mesh = Mesh::new();
    let first = deserialize_into(&mut target, &blob).unwrap();
    let second = deserialize_into(&mut target, &blob).unwrap();

    assert_eq!(target.face_count(), 8);
    assert_eq!(target.vertex_count(), 18);
    assert_eq!(first.faces.len(), 4);
    assert!(first.vertices.iter().all(|v| !second.vertices.contains(v)));
    assert_eq!(target.stats().boundary_loops, 4);
    assert!(target.is_valid());
}

#[test]
fn payload_kinds_share_the_blob_format() {
    let grid = UvMesh::grid(2, 2).unwrap();
    let plain: Mesh = deserialize(&serialize(&grid)).unwrap();
    assert_eq!(plain.stats(), grid.stats());
}

#[test]
fn corrupted_blobs_are_rejected() {
    let blob = serialize(&annulus());
    let truncated: Result<Mesh, _> = deserialize(&blob[..blob.len() - 1]);
    assert!(matches!(truncated, Err(TopologyError::MalformedBlob(_))));

    let mut inflated = blob.clone();
    inflated[0] = 0xff;
    let result: Result<Mesh, _> = deserialize(&inflated);
    assert!(matches!(result, Err(TopologyError::MalformedBlob(_))));
}
