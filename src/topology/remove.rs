// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Face and edge removal

use super::entity::Kinds;
use super::keys::{EdgeKey, FaceKey, HalfEdgeKey, VertexKey};
use super::registry::Mesh;
use crate::error::{TopologyError, TopologyResult};
use serde::Serialize;

/// What `remove_face` took down with the face
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RemovedFace {
    /// Edges left without any face
    pub edges: usize,
    /// Vertices left without any edge
    pub vertices: usize,
}

impl<K: Kinds> Mesh<K> {
    /// Delete a face, along with edges and vertices it leaves dangling
    ///
    /// Arcs of the face become boundary. An edge whose other side was
    /// already boundary is removed. A vertex is removed only once no edge
    /// of any of its groups is left.
    pub fn remove_face(&mut self, f: FaceKey) -> TopologyResult<RemovedFace> {
        self.require_face(f)?;

        let arcs: Vec<HalfEdgeKey> = self.face_half_edges(f).collect();
        let corners: Vec<(VertexKey, Vec<HalfEdgeKey>)> = arcs
            .iter()
            .map(|&h| {
                let v = self.dest_of(h);
                (v, self.outgoing_snapshot(v))
            })
            .collect();

        for &h in &arcs {
            self.set_face(h, None);
        }

        let mut removed = RemovedFace::default();
        for &h in &arcs {
            if self.is_free_arc(self.twin_of(h)) && self.delete_edge_whole(self.edge_at(h)) {
                removed.edges += 1;
            }
        }

        for (v, candidates) in corners {
            if !self.settle(v, &candidates) && self.delete_vertex(v) {
                removed.vertices += 1;
            }
        }
        self.delete_face(f);

        Ok(removed)
    }

    /// Delete an interior edge and merge the two faces on either side
    ///
    /// The face on the stored half-edge's side survives and is returned.
    /// When the faces share a run of consecutive edges, the whole run goes
    /// and the vertices inside it with it.
    pub fn remove_edge(&mut self, e: EdgeKey) -> TopologyResult<FaceKey> {
        self.require_edge(e)?;

        let h = self.edges[e].half_edge;
        let t = self.twin_of(h);
        let (Some(keep), Some(gone)) = (self.face_at(h), self.face_at(t)) else {
            return Err(TopologyError::BoundaryEdge);
        };
        if keep == gone {
            return Err(TopologyError::SameFace);
        }

        let limit = self.face_degree(keep).min(self.face_degree(gone));
        let mut run = 1;
        let (mut first, mut last) = (h, h);
        // a run only passes through vertices of degree two with one group
        while run < limit {
            let p = self.prev_of(first);
            if self.next_of(self.twin_of(first)) != self.twin_of(p)
                || self.group_count(self.origin_of(first)) != 1
            {
                break;
            }
            first = p;
            run += 1;
        }
        while run < limit {
            let q = self.next_of(last);
            if self.prev_of(self.twin_of(last)) != self.twin_of(q)
                || self.group_count(self.dest_of(last)) != 1
            {
                break;
            }
            last = q;
            run += 1;
        }
        if run >= limit {
            return Err(TopologyError::WholeFace);
        }

        let chain: Vec<HalfEdgeKey> = std::iter::successors(Some(first), |&a| {
            (a != last).then(|| self.next_of(a))
        })
        .collect();

        let start = self.origin_of(first);
        let end = self.dest_of(last);
        let start_arcs = self.outgoing_snapshot(start);
        let end_arcs = self.outgoing_snapshot(end);
        let (twin_first, twin_last) = (self.twin_of(first), self.twin_of(last));
        let before_keep = self.prev_of(first);
        let after_keep = self.next_of(last);
        let before_gone = self.prev_of(twin_last);
        let after_gone = self.next_of(twin_first);

        let mut arc = after_gone;
        loop {
            self.set_face(arc, Some(keep));
            if arc == before_gone {
                break;
            }
            arc = self.next_of(arc);
        }

        self.set_next(before_keep, after_gone);
        self.set_next(before_gone, after_keep);
        self.faces[keep].half_edge = after_keep;

        for &a in &chain[..chain.len() - 1] {
            let inner = self.dest_of(a);
            self.set_vertex_half_edge(inner, None);
            self.delete_vertex(inner);
        }
        for &a in &chain {
            let edge = self.edge_at(a);
            self.delete_edge_whole(edge);
        }

        self.settle(start, &start_arcs);
        self.settle(end, &end_arcs);
        self.delete_face(gone);

        Ok(keep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::Mesh;

    fn two_triangles() -> (Mesh, Vec<VertexKey>) {
        let mut mesh: Mesh = Mesh::new();
        let v: Vec<_> = (0..4).map(|_| mesh.add_vertex()).collect();
        mesh.add_face(&[v[0], v[1], v[2]]).unwrap();
        mesh.add_face(&[v[0], v[2], v[3]]).unwrap();
        (mesh, v)
    }

    #[test]
    fn test_remove_only_face_clears_everything() {
        let mut mesh: Mesh = Mesh::new();
        let v: Vec<_> = (0..3).map(|_| mesh.add_vertex()).collect();
        let f = mesh.add_face(&v).unwrap();

        let removed = mesh.remove_face(f).unwrap();
        assert_eq!(removed, RemovedFace { edges: 3, vertices: 3 });
        assert!(mesh.is_empty());
        assert_eq!(mesh.invalid_count(), 3 + 6 + 3 + 1);
    }

    #[test]
    fn test_remove_face_keeps_shared_edge() {
        let (mut mesh, v) = two_triangles();
        let f = mesh.face_keys()[1];

        let removed = mesh.remove_face(f).unwrap();
        assert_eq!(removed, RemovedFace { edges: 2, vertices: 1 });
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.edge_count(), 3);
        assert!(!mesh.is_valid_vertex(v[3]));
        assert!(mesh.is_boundary_vertex(v[0]));
        assert!(mesh.is_boundary_vertex(v[2]));
        assert_eq!(mesh.boundary_loops().len(), 1);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_remove_face_opens_hole() {
        // fan around an interior vertex; removing one blade keeps every vertex
        let mut mesh: Mesh = Mesh::new();
        let v: Vec<_> = (0..5).map(|_| mesh.add_vertex()).collect();
        for i in 1..=4 {
            let j = if i == 4 { 1 } else { i + 1 };
            mesh.add_face(&[v[0], v[i], v[j]]).unwrap();
        }
        let f = mesh.face_keys()[0];

        let removed = mesh.remove_face(f).unwrap();
        assert_eq!(removed, RemovedFace { edges: 1, vertices: 0 });
        assert_eq!(mesh.vertex_count(), 5);
        assert!(mesh.is_boundary_vertex(v[0]));
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_remove_face_keeps_vertex_of_other_group() {
        // bowtie pinched at v0; dropping one blade leaves v0 with the other
        let mut mesh: Mesh = Mesh::new();
        let v: Vec<_> = (0..5).map(|_| mesh.add_vertex()).collect();
        let a = mesh.add_face(&[v[0], v[1], v[2]]).unwrap();
        mesh.add_face(&[v[0], v[3], v[4]]).unwrap();

        let removed = mesh.remove_face(a).unwrap();
        assert_eq!(removed, RemovedFace { edges: 3, vertices: 2 });
        assert!(mesh.is_valid_vertex(v[0]));
        assert_eq!(mesh.valence(v[0]), 2);
        assert!(!mesh.is_singular_vertex(v[0]));
        assert_eq!(mesh.boundary_loops().len(), 1);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_remove_face_splits_fan_into_groups() {
        // open fan of three blades around v0; taking the middle one pinches v0
        let mut mesh: Mesh = Mesh::new();
        let v: Vec<_> = (0..5).map(|_| mesh.add_vertex()).collect();
        mesh.add_face(&[v[0], v[1], v[2]]).unwrap();
        let middle = mesh.add_face(&[v[0], v[2], v[3]]).unwrap();
        mesh.add_face(&[v[0], v[3], v[4]]).unwrap();

        let removed = mesh.remove_face(middle).unwrap();
        assert_eq!(removed, RemovedFace { edges: 1, vertices: 0 });
        assert_eq!(mesh.group_count(v[0]), 2);
        assert_eq!(mesh.boundary_gap_count(v[0]), 2);
        assert_eq!(mesh.boundary_loops().len(), 2);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_remove_stale_face() {
        let (mut mesh, _) = two_triangles();
        let f = mesh.face_keys()[0];
        mesh.remove_face(f).unwrap();
        assert_eq!(mesh.remove_face(f), Err(TopologyError::stale("face")));
    }

    #[test]
    fn test_remove_edge_merges_triangles() {
        let (mut mesh, v) = two_triangles();
        let e = mesh.edge_between(v[0], v[2]).unwrap();

        let kept = mesh.remove_edge(e).unwrap();
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.edge_count(), 4);
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.face_degree(kept), 4);
        let loops = mesh.boundary_loops();
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].len(), 4);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_remove_edge_rejections() {
        let (mut mesh, v) = two_triangles();
        let rim = mesh.edge_between(v[0], v[1]).unwrap();
        assert_eq!(mesh.remove_edge(rim), Err(TopologyError::BoundaryEdge));

        let mut pillow: Mesh = Mesh::new();
        let p: Vec<_> = (0..3).map(|_| pillow.add_vertex()).collect();
        pillow.add_face(&[p[0], p[1], p[2]]).unwrap();
        pillow.add_face(&[p[0], p[2], p[1]]).unwrap();
        let e = pillow.edge_between(p[0], p[1]).unwrap();
        assert_eq!(pillow.remove_edge(e), Err(TopologyError::WholeFace));
        assert_eq!(pillow.face_count(), 2);
    }

    #[test]
    fn test_remove_edge_takes_shared_run() {
        // pentagon 0-1-4-2-3 and quad 1-5-2-4 share the path 1-4-2
        // through the degree-2 vertex 4
        let mut mesh: Mesh = Mesh::new();
        let v: Vec<_> = (0..6).map(|_| mesh.add_vertex()).collect();
        mesh.add_face(&[v[0], v[1], v[4], v[2], v[3]]).unwrap();
        mesh.add_face(&[v[1], v[5], v[2], v[4]]).unwrap();
        assert_eq!(mesh.valence(v[4]), 2);

        let e = mesh.edge_between(v[1], v[4]).unwrap();
        let kept = mesh.remove_edge(e).unwrap();

        assert_eq!(mesh.face_count(), 1);
        assert!(!mesh.is_valid_vertex(v[4]));
        assert_eq!(mesh.vertex_count(), 5);
        assert_eq!(mesh.edge_count(), 5);
        assert_eq!(mesh.face_degree(kept), 5);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_remove_edge_run_stops_at_pinched_vertex() {
        // v4 sits on the shared path but also carries a second blade
        let mut mesh: Mesh = Mesh::new();
        let v: Vec<_> = (0..8).map(|_| mesh.add_vertex()).collect();
        mesh.add_face(&[v[4], v[6], v[7]]).unwrap();
        mesh.add_face(&[v[0], v[1], v[4], v[2], v[3]]).unwrap();
        mesh.add_face(&[v[1], v[5], v[2], v[4]]).unwrap();
        assert_eq!(mesh.group_count(v[4]), 2);

        let e = mesh.edge_between(v[1], v[4]).unwrap();
        let kept = mesh.remove_edge(e).unwrap();

        // only 1-4 goes; 4-2 now has the merged face on both sides
        assert!(mesh.is_valid_vertex(v[4]));
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.edge_count(), 9);
        assert_eq!(mesh.face_degree(kept), 7);
        assert!(mesh.is_valid());
    }
}
