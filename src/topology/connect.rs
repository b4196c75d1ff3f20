// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Splitting a face with a new diagonal

use super::entity::{Face, Kinds};
use super::keys::{EdgeKey, FaceKey, HalfEdgeKey, VertexKey};
use super::registry::Mesh;
use crate::error::{TopologyError, TopologyResult};

impl<K: Kinds> Mesh<K> {
    /// Join two corners of a face with a new edge, splitting the face
    ///
    /// The vertices must share exactly one face and no edge. The arc
    /// `a -> b` stays with the original face; the new face, built by the
    /// factory, takes the other half. Returns the new edge.
    pub fn connect_vertices(&mut self, a: VertexKey, b: VertexKey) -> TopologyResult<EdgeKey> {
        self.require_vertex(a)?;
        self.require_vertex(b)?;
        if a == b {
            return Err(TopologyError::NotConnectable);
        }
        if self.find_half_edge(a, b).is_some() {
            return Err(TopologyError::AlreadyConnected);
        }

        let around_a = self.face_set(a);
        let shared: Vec<FaceKey> = self
            .face_set(b)
            .into_iter()
            .filter(|f| around_a.contains(f))
            .collect();
        let &[face] = shared.as_slice() else {
            return Err(TopologyError::NotConnectable);
        };

        let into_a = self.arc_into(face, a).ok_or(TopologyError::NotConnectable)?;
        let into_b = self.arc_into(face, b).ok_or(TopologyError::NotConnectable)?;
        let after_a = self.next_of(into_a);
        let after_b = self.next_of(into_b);

        let x = self.new_edge(a, b);
        let y = self.twin_of(x);
        self.set_next(into_a, x);
        self.set_next(x, after_b);
        self.set_next(into_b, y);
        self.set_next(y, after_a);

        self.set_face(x, Some(face));
        self.faces[face].half_edge = x;

        let split = self.faces.insert(Face::new((self.factory.face)()));
        self.faces[split].half_edge = y;
        self.assign_loop_face(y, Some(split));

        Ok(self.edge_at(x))
    }

    /// The arc of `f` that ends at `v`
    fn arc_into(&self, f: FaceKey, v: VertexKey) -> Option<HalfEdgeKey> {
        self.face_half_edges(f).find(|&h| self.dest_of(h) == v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Mesh;

    #[test]
    fn test_split_quad() {
        let mut mesh: Mesh = Mesh::new();
        let v: Vec<_> = (0..4).map(|_| mesh.add_vertex()).collect();
        let f = mesh.add_face(&v).unwrap();

        let e = mesh.connect_vertices(v[0], v[2]).unwrap();
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.edge_count(), 5);
        assert_eq!(mesh.face_degree(f), 3);
        assert_eq!(mesh.edge_vertices(e), Some((v[0], v[2])));
        assert!(!mesh.is_boundary_edge(e));

        let h = mesh.edge_half_edge(e).unwrap();
        assert_eq!(mesh.face_of(h), Some(f));
        let other = mesh.face_of(mesh.twin(h).unwrap()).unwrap();
        assert_ne!(other, f);
        assert_eq!(mesh.face_degree(other), 3);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_connect_then_remove_restores_face() {
        let mut mesh: Mesh = Mesh::new();
        let v: Vec<_> = (0..6).map(|_| mesh.add_vertex()).collect();
        let f = mesh.add_face(&v).unwrap();

        let e = mesh.connect_vertices(v[1], v[4]).unwrap();
        assert_eq!(mesh.face_degree(f), 4);
        let kept = mesh.remove_edge(e).unwrap();
        assert_eq!(kept, f);
        assert_eq!(mesh.face_degree(f), 6);
        assert_eq!(mesh.face_count(), 1);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_connect_rejections() {
        let mut mesh: Mesh = Mesh::new();
        let v: Vec<_> = (0..4).map(|_| mesh.add_vertex()).collect();
        mesh.add_face(&v).unwrap();
        let lone = mesh.add_vertex();

        assert_eq!(
            mesh.connect_vertices(v[0], v[1]),
            Err(TopologyError::AlreadyConnected)
        );
        assert_eq!(
            mesh.connect_vertices(v[0], lone),
            Err(TopologyError::NotConnectable)
        );
        assert_eq!(
            mesh.connect_vertices(v[0], v[0]),
            Err(TopologyError::NotConnectable)
        );
        assert_eq!(mesh.edge_count(), 4);
    }
}
