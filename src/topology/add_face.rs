// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Face insertion
//!
//! `add_face` checks every side before it allocates anything. Once the
//! checks pass, sides that already exist as boundary arcs are reused and the
//! rest get fresh edges. The face loop is linked first; each corner then
//! relinks its own boundary arcs and rebuilds its groups from the arcs it
//! had before plus the two new sides.

use super::entity::{Face, Kinds};
use super::keys::{FaceKey, HalfEdgeKey, VertexKey};
use super::registry::Mesh;
use crate::error::{TopologyError, TopologyResult};
use ahash::AHashSet;

impl<K: Kinds> Mesh<K> {
    /// Add a polygon through `corners` (in loop order) with a factory payload
    pub fn add_face(&mut self, corners: &[VertexKey]) -> TopologyResult<FaceKey> {
        let data = (self.factory.face)();
        self.add_face_with(corners, data)
    }

    /// Add a polygon through `corners` carrying `data`
    ///
    /// Fails without side effects when a corner has no free boundary run,
    /// when a side already borders a face, or when closing the polygon at a
    /// corner would swallow another manifold group.
    pub fn add_face_with(&mut self, corners: &[VertexKey], data: K::Face) -> TopologyResult<FaceKey> {
        let sides = self.check_new_face(corners)?;
        Ok(self.link_new_face(corners, &sides, data))
    }

    /// Returns, per side `i -> i+1`, the boundary arc to reuse if any
    fn check_new_face(&self, corners: &[VertexKey]) -> TopologyResult<Vec<Option<HalfEdgeKey>>> {
        let n = corners.len();
        if n < 3 {
            return Err(TopologyError::InvalidPolygon("fewer than three corners"));
        }
        for &v in corners {
            self.require_vertex(v)?;
        }
        let distinct: AHashSet<VertexKey> = corners.iter().copied().collect();
        if distinct.len() != n {
            return Err(TopologyError::InvalidPolygon("corner listed twice"));
        }

        let mut sides = Vec::with_capacity(n);
        for i in 0..n {
            let (from, to) = (corners[i], corners[(i + 1) % n]);
            if !self.has_free_run(from) {
                return Err(TopologyError::ComplexVertex);
            }
            let arc = self.find_half_edge(from, to);
            if let Some(h) = arc {
                if !self.is_free_arc(h) {
                    return Err(TopologyError::ComplexEdge);
                }
            }
            sides.push(arc);
        }

        // Two reused sides meeting at a corner close the gap after one group.
        // Groups are kept in cyclic order and the gap may only run from a
        // group into the one that follows it.
        for i in 0..n {
            if let (Some(inner_prev), Some(inner_next)) = (sides[i], sides[(i + 1) % n]) {
                if !self.gap_follows(corners[(i + 1) % n], inner_prev, inner_next) {
                    return Err(TopologyError::GroupBetween);
                }
            }
        }

        Ok(sides)
    }

    /// True if a face entering `v` through `into` and leaving through `out`
    /// closes one group, or joins a group to the next one in order
    fn gap_follows(&self, v: VertexKey, into: HalfEdgeKey, out: HalfEdgeKey) -> bool {
        let open: Vec<HalfEdgeKey> = self.vertices[v]
            .group_half_edges()
            .filter(|&h| self.is_free_arc(h))
            .collect();
        let after_into = self.next_of(into);
        if after_into == out {
            return true;
        }
        let p = open.iter().position(|&h| h == after_into);
        let q = open.iter().position(|&h| h == out);
        match (p, q) {
            (Some(p), Some(q)) => (p + 1) % open.len() == q,
            _ => false,
        }
    }

    fn link_new_face(
        &mut self,
        corners: &[VertexKey],
        sides: &[Option<HalfEdgeKey>],
        data: K::Face,
    ) -> FaceKey {
        let n = corners.len();
        let before: Vec<Vec<HalfEdgeKey>> = corners
            .iter()
            .map(|&v| self.outgoing_snapshot(v))
            .collect();
        let arcs: Vec<HalfEdgeKey> = (0..n)
            .map(|i| match sides[i] {
                Some(h) => h,
                None => self.new_edge(corners[i], corners[(i + 1) % n]),
            })
            .collect();

        let face = self.faces.insert(Face::new(data));
        self.faces[face].half_edge = arcs[n - 1];

        for i in 0..n {
            self.set_next(arcs[i], arcs[(i + 1) % n]);
            self.set_face(arcs[i], Some(face));
        }

        for (i, mut candidates) in before.into_iter().enumerate() {
            let arriving = arcs[(i + n - 1) % n];
            candidates.push(arcs[i]);
            candidates.push(self.twin_of(arriving));
            self.settle(corners[i], &candidates);
        }

        face
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Mesh;

    fn vertices(mesh: &mut Mesh, n: usize) -> Vec<VertexKey> {
        (0..n).map(|_| mesh.add_vertex()).collect()
    }

    #[test]
    fn test_single_quad() {
        let mut mesh: Mesh = Mesh::new();
        let v = vertices(&mut mesh, 4);
        let f = mesh.add_face(&v).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.edge_count(), 4);
        assert_eq!(mesh.half_edge_count(), 8);
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.face_degree(f), 4);
        assert_eq!(mesh.face_vertices(f).count(), 4);
        assert!(mesh.find_boundary().is_some());
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_corner_order_is_kept() {
        let mut mesh: Mesh = Mesh::new();
        let v = vertices(&mut mesh, 5);
        let f = mesh.add_face(&v).unwrap();

        let corners: Vec<_> = mesh.face_vertices(f).collect();
        let shift = corners.iter().position(|&c| c == v[0]).unwrap();
        let rotated: Vec<_> = (0..5).map(|i| corners[(shift + i) % 5]).collect();
        assert_eq!(rotated, v);
    }

    #[test]
    fn test_reuses_shared_edge() {
        let mut mesh: Mesh = Mesh::new();
        let v = vertices(&mut mesh, 4);
        let f0 = mesh.add_face(&[v[0], v[1], v[2]]).unwrap();
        let f1 = mesh.add_face(&[v[2], v[1], v[3]]).unwrap();

        assert_eq!(mesh.edge_count(), 5);
        assert_eq!(mesh.half_edge_count(), 10);
        let shared = mesh.find_half_edge(v[1], v[2]).unwrap();
        assert_eq!(mesh.face_of(shared), Some(f0));
        assert_eq!(mesh.face_of(mesh.twin(shared).unwrap()), Some(f1));
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_rejects_short_or_repeated() {
        let mut mesh: Mesh = Mesh::new();
        let v = vertices(&mut mesh, 3);
        assert!(matches!(
            mesh.add_face(&v[..2]),
            Err(TopologyError::InvalidPolygon(_))
        ));
        assert!(matches!(
            mesh.add_face(&[v[0], v[1], v[0]]),
            Err(TopologyError::InvalidPolygon(_))
        ));
        assert_eq!(mesh.edge_count(), 0);
    }

    #[test]
    fn test_rejects_third_face_on_edge() {
        let mut mesh: Mesh = Mesh::new();
        let v = vertices(&mut mesh, 5);
        mesh.add_face(&[v[0], v[1], v[2]]).unwrap();
        mesh.add_face(&[v[1], v[0], v[3]]).unwrap();

        let before = (mesh.vertex_count(), mesh.edge_count(), mesh.face_count());
        // both orientations of 0-1 are taken now
        assert_eq!(
            mesh.add_face(&[v[0], v[1], v[4]]),
            Err(TopologyError::ComplexEdge)
        );
        assert_eq!(
            mesh.add_face(&[v[1], v[0], v[4]]),
            Err(TopologyError::ComplexEdge)
        );
        assert_eq!(
            before,
            (mesh.vertex_count(), mesh.edge_count(), mesh.face_count())
        );
        assert_eq!(mesh.invalid_count(), 0);
    }

    #[test]
    fn test_rejects_closed_vertex() {
        let mut mesh: Mesh = Mesh::new();
        let v = vertices(&mut mesh, 6);
        for i in 1..=4 {
            let j = if i == 4 { 1 } else { i + 1 };
            mesh.add_face(&[v[0], v[i], v[j]]).unwrap();
        }
        assert_eq!(
            mesh.add_face(&[v[0], v[5], v[1]]),
            Err(TopologyError::ComplexVertex)
        );
    }

    #[test]
    fn test_bowtie_keeps_groups_apart() {
        let mut mesh: Mesh = Mesh::new();
        let v = vertices(&mut mesh, 5);
        let a = mesh.add_face(&[v[0], v[1], v[2]]).unwrap();
        let b = mesh.add_face(&[v[0], v[3], v[4]]).unwrap();

        assert!(mesh.is_singular_vertex(v[0]));
        assert_eq!(mesh.boundary_loops().len(), 2);
        let mut groups = mesh.manifold_groups(v[0]);
        groups.sort();
        let mut expected = vec![vec![a], vec![b]];
        expected.sort();
        assert_eq!(groups, expected);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_bridging_face_joins_bowtie() {
        let mut mesh: Mesh = Mesh::new();
        let v = vertices(&mut mesh, 5);
        mesh.add_face(&[v[0], v[1], v[2]]).unwrap();
        mesh.add_face(&[v[0], v[3], v[4]]).unwrap();
        // fill the wedge between the two triangles
        mesh.add_face(&[v[0], v[2], v[3]]).unwrap();

        assert!(!mesh.is_singular_vertex(v[0]));
        assert_eq!(mesh.boundary_loops().len(), 1);
        assert_eq!(mesh.manifold_groups(v[0]).len(), 1);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_rejects_group_between_reused_arcs() {
        // three fans meet at the centre in the order they were added; a face
        // may only close the gap from one fan into the next
        let mut mesh: Mesh = Mesh::new();
        let c = mesh.add_vertex();
        let r = vertices(&mut mesh, 6);
        mesh.add_face(&[c, r[0], r[1]]).unwrap();
        mesh.add_face(&[c, r[2], r[3]]).unwrap();
        mesh.add_face(&[c, r[4], r[5]]).unwrap();
        assert_eq!(mesh.group_count(c), 3);

        let counts = (mesh.edge_count(), mesh.face_count());
        for (a, b) in [(r[1], r[2]), (r[3], r[4]), (r[5], r[0])] {
            let mut trial = mesh.clone();
            assert_eq!(trial.add_face(&[c, a, b]), Err(TopologyError::GroupBetween));
            assert_eq!(trial.invalid_count(), 0);
        }
        for (a, b) in [(r[1], r[4]), (r[3], r[0]), (r[5], r[2])] {
            let mut trial = mesh.clone();
            trial.add_face(&[c, a, b]).unwrap();
            assert_eq!(trial.group_count(c), 2);
            assert_eq!(trial.boundary_loops().len(), 2);
            assert!(trial.is_valid());
        }
        assert_eq!(counts, (mesh.edge_count(), mesh.face_count()));
    }

    #[test]
    fn test_new_fan_at_boundary_vertex_is_own_group() {
        let mut mesh: Mesh = Mesh::new();
        let v = vertices(&mut mesh, 7);
        mesh.add_face(&[v[0], v[1], v[2]]).unwrap();
        mesh.add_face(&[v[0], v[3], v[4]]).unwrap();
        mesh.add_face(&[v[0], v[5], v[6]]).unwrap();

        assert_eq!(mesh.group_count(v[0]), 3);
        assert_eq!(mesh.boundary_gap_count(v[0]), 3);
        assert_eq!(mesh.boundary_loops().len(), 3);
        for cycle in mesh.boundary_loops() {
            assert_eq!(cycle.len(), 3);
        }
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_closing_a_pillow() {
        let mut mesh: Mesh = Mesh::new();
        let v = vertices(&mut mesh, 3);
        mesh.add_face(&[v[0], v[1], v[2]]).unwrap();
        mesh.add_face(&[v[0], v[2], v[1]]).unwrap();

        assert!(mesh.find_boundary().is_none());
        assert_eq!(mesh.edge_count(), 3);
        assert!(mesh.is_valid());
    }
}
