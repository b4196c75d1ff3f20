// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! End-to-end construction and editing scenarios

use polytopo::{Mesh, TopologyError, VertexKey};

fn fresh(mesh: &mut Mesh, n: usize) -> Vec<VertexKey> {
    (0..n).map(|_| mesh.add_vertex()).collect()
}

fn counts(mesh: &Mesh) -> (usize, usize, usize, usize) {
    (
        mesh.vertex_count(),
        mesh.edge_count(),
        mesh.half_edge_count(),
        mesh.face_count(),
    )
}

/// Two triangles a-b-c and c-b-d sharing the edge b-c
fn two_triangles() -> (Mesh, Vec<VertexKey>) {
    let mut mesh: Mesh = Mesh::new();
    let v = fresh(&mut mesh, 4);
    mesh.add_face(&[v[0], v[1], v[2]]).unwrap();
    mesh.add_face(&[v[2], v[1], v[3]]).unwrap();
    (mesh, v)
}

#[test]
fn single_quad() {
    let mut mesh: Mesh = Mesh::new();
    let v = fresh(&mut mesh, 4);
    let f = mesh.add_face(&v).unwrap();

    assert_eq!(counts(&mesh), (4, 4, 8, 1));
    let boundary = mesh.find_boundary().expect("open quad has a boundary");
    assert!(mesh.is_boundary_half_edge(boundary));
    assert_eq!(mesh.loop_half_edges(boundary).count(), 4);
    assert_eq!(mesh.face_vertices(f).collect::<Vec<_>>().len(), 4);
    assert!(mesh.is_valid());
}

#[test]
fn two_triangles_share_an_edge() {
    let (mesh, v) = two_triangles();

    assert_eq!(counts(&mesh), (4, 5, 10, 2));
    let shared = mesh.find_half_edge(v[1], v[2]).unwrap();
    let twin = mesh.twin(shared).unwrap();
    let (left, right) = (mesh.face_of(shared), mesh.face_of(twin));
    assert!(left.is_some() && right.is_some());
    assert_ne!(left, right);
    assert!(!mesh.is_boundary_edge(mesh.edge_of(shared).unwrap()));
    assert!(mesh.is_valid());
}

#[test]
fn remove_shared_edge_merges_into_quad() {
    let (mut mesh, v) = two_triangles();
    let shared = mesh.edge_between(v[1], v[2]).unwrap();

    let f = mesh.remove_edge(shared).unwrap();
    assert_eq!(counts(&mesh), (4, 4, 8, 1));
    assert_eq!(mesh.face_degree(f), 4);

    let loops = mesh.boundary_loops();
    assert_eq!(loops.len(), 1);
    assert_eq!(loops[0].len(), 4);
    assert!(mesh.is_valid());
}

#[test]
fn collapse_outer_edge_of_quad() {
    let (mut mesh, v) = two_triangles();
    let shared = mesh.edge_between(v[1], v[2]).unwrap();
    let f = mesh.remove_edge(shared).unwrap();

    let outer = mesh.edge_between(v[0], v[1]).unwrap();
    assert_eq!(mesh.valence(v[0]), 2);
    assert_eq!(mesh.valence(v[1]), 2);
    let boundary_before = mesh.stats().boundary_edges;

    mesh.collapse_edge(outer).unwrap();
    assert_eq!(mesh.vertex_count(), 3);
    assert_eq!(mesh.face_count(), 1);
    assert_eq!(mesh.face_degree(f), 3);
    assert_eq!(mesh.stats().boundary_edges, boundary_before - 1);
    assert!(mesh.is_valid());
}

#[test]
fn add_face_over_full_edge_is_rejected() {
    let (mut mesh, v) = two_triangles();
    let e = fresh(&mut mesh, 1)[0];
    let before = counts(&mesh);

    // b -> c already carries a face, c -> b too
    for corners in [[v[1], v[2], e], [v[2], v[1], e]] {
        assert_eq!(mesh.add_face(&corners), Err(TopologyError::ComplexEdge));
        assert_eq!(counts(&mesh), before);
    }
    assert_eq!(mesh.invalid_count(), 0);
    assert!(mesh.is_valid());
}

#[test]
fn find_boundary_none_iff_closed() {
    let mut mesh: Mesh = Mesh::new();
    let v = fresh(&mut mesh, 4);
    let faces = [
        [v[0], v[2], v[1]],
        [v[0], v[1], v[3]],
        [v[1], v[2], v[3]],
        [v[2], v[0], v[3]],
    ];
    for (i, face) in faces.iter().enumerate() {
        assert!(mesh.find_boundary().is_some() || i == 0);
        mesh.add_face(face).unwrap();
    }

    assert_eq!(mesh.find_boundary(), None);
    assert!(mesh.boundary_loops().is_empty());
    assert_eq!(mesh.stats().euler_characteristic, 2);
    assert!(mesh.is_valid());
}

#[test]
fn connect_then_collapse_counts() {
    let mut mesh: Mesh = Mesh::new();
    let v = fresh(&mut mesh, 6);
    let f = mesh.add_face(&v).unwrap();

    let diagonal = mesh.connect_vertices(v[0], v[3]).unwrap();
    assert_eq!(mesh.face_count(), 2);
    assert_eq!(mesh.face_degree(f), 4);

    // both ends sit on the rim, so the diagonal cannot go
    assert_eq!(mesh.collapse_edge(diagonal), Err(TopologyError::PinchedBoundary));

    let rim = mesh.edge_between(v[0], v[1]).unwrap();
    let (vertices, faces) = (mesh.vertex_count(), mesh.face_count());
    let kept = mesh.collapse_edge(rim).unwrap();
    assert_eq!(mesh.vertex_count(), vertices - 1);
    assert_eq!(mesh.face_count(), faces);
    assert!(mesh.is_valid_vertex(kept));
    assert!(mesh.is_valid());
}
