// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Adjacency iterators over the half-edge graph
//!
//! Every walk remembers where it started and stops when it comes back
//! there, or right away if there is nothing to start from. A walk over a
//! malformed cycle never ends; the caller owns well-formedness. Vertex
//! walks chain one rotation per manifold group.

use super::entity::Kinds;
use super::keys::{FaceKey, HalfEdgeKey, VertexKey};
use super::registry::Mesh;

/// How a walk moves from one half-edge to the next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// `next`: around a face or boundary loop
    Next,
    /// `next(twin(h))`: outgoing arcs around the origin vertex
    Outgoing,
    /// `prev(twin(h))`: incoming arcs around the destination vertex
    Incoming,
}

/// Restartable walk over half-edge keys
pub struct HalfEdgeWalk<'a, K: Kinds> {
    mesh: &'a Mesh<K>,
    step: Step,
    start: Option<HalfEdgeKey>,
    current: Option<HalfEdgeKey>,
}

impl<'a, K: Kinds> HalfEdgeWalk<'a, K> {
    pub fn new(mesh: &'a Mesh<K>, start: Option<HalfEdgeKey>, step: Step) -> Self {
        Self {
            mesh,
            step,
            start,
            current: start,
        }
    }

    pub fn start(&self) -> Option<HalfEdgeKey> {
        self.start
    }

    /// Rewind to the starting half-edge
    pub fn restart(&mut self) {
        self.current = self.start;
    }

    fn advance(&self, h: HalfEdgeKey) -> Option<HalfEdgeKey> {
        let arcs = &self.mesh.half_edges;
        let he = arcs.get(h)?;
        match self.step {
            Step::Next => Some(he.next),
            Step::Outgoing => arcs.get(he.twin).map(|t| t.next),
            Step::Incoming => arcs.get(he.twin).map(|t| t.prev),
        }
    }
}

impl<K: Kinds> Clone for HalfEdgeWalk<'_, K> {
    fn clone(&self) -> Self {
        Self {
            mesh: self.mesh,
            step: self.step,
            start: self.start,
            current: self.current,
        }
    }
}

impl<K: Kinds> Iterator for HalfEdgeWalk<'_, K> {
    type Item = HalfEdgeKey;

    fn next(&mut self) -> Option<HalfEdgeKey> {
        let current = self.current?;
        if self.mesh.half_edges.get(current).is_none() {
            self.current = None;
            return None;
        }
        self.current = self.advance(current).filter(|&h| Some(h) != self.start);
        Some(current)
    }
}

/// Walk around a vertex, one manifold group after the other
pub struct VertexWalk<'a, K: Kinds> {
    mesh: &'a Mesh<K>,
    vertex: VertexKey,
    step: Step,
    group: usize,
    walk: HalfEdgeWalk<'a, K>,
}

impl<'a, K: Kinds> VertexWalk<'a, K> {
    fn new(mesh: &'a Mesh<K>, vertex: VertexKey, step: Step) -> Self {
        Self {
            mesh,
            vertex,
            step,
            group: 0,
            walk: HalfEdgeWalk::new(mesh, Self::group_start(mesh, vertex, step, 0), step),
        }
    }

    fn group_start(mesh: &Mesh<K>, v: VertexKey, step: Step, group: usize) -> Option<HalfEdgeKey> {
        let anchor = mesh.vertices.get(v)?.group_half_edges().nth(group)?;
        match step {
            Step::Incoming => mesh.twin(anchor),
            _ => Some(anchor),
        }
    }

    /// Rewind to the first group
    pub fn restart(&mut self) {
        self.group = 0;
        let start = Self::group_start(self.mesh, self.vertex, self.step, 0);
        self.walk = HalfEdgeWalk::new(self.mesh, start, self.step);
    }
}

impl<K: Kinds> Clone for VertexWalk<'_, K> {
    fn clone(&self) -> Self {
        Self {
            mesh: self.mesh,
            vertex: self.vertex,
            step: self.step,
            group: self.group,
            walk: self.walk.clone(),
        }
    }
}

impl<K: Kinds> Iterator for VertexWalk<'_, K> {
    type Item = HalfEdgeKey;

    fn next(&mut self) -> Option<HalfEdgeKey> {
        loop {
            if let Some(h) = self.walk.next() {
                return Some(h);
            }
            self.group += 1;
            let start = Self::group_start(self.mesh, self.vertex, self.step, self.group)?;
            self.walk = HalfEdgeWalk::new(self.mesh, Some(start), self.step);
        }
    }
}

impl<K: Kinds> Mesh<K> {
    /// Outgoing half-edges of `v`, group by group in rotation order
    pub fn outgoing(&self, v: VertexKey) -> VertexWalk<'_, K> {
        VertexWalk::new(self, v, Step::Outgoing)
    }

    /// Incoming half-edges of `v`
    pub fn incoming(&self, v: VertexKey) -> VertexWalk<'_, K> {
        VertexWalk::new(self, v, Step::Incoming)
    }

    /// Outgoing half-edges in the manifold group of `h`, starting at `h`
    pub fn group_outgoing(&self, h: HalfEdgeKey) -> HalfEdgeWalk<'_, K> {
        let start = self.is_valid_half_edge(h).then_some(h);
        HalfEdgeWalk::new(self, start, Step::Outgoing)
    }

    /// Vertices joined to `v` by an edge
    pub fn vertex_vertices(&self, v: VertexKey) -> impl Iterator<Item = VertexKey> + '_ {
        self.outgoing(v).map(move |h| self.half_edges[h].vert)
    }

    /// Faces around `v`; boundary arcs are skipped
    pub fn vertex_faces(&self, v: VertexKey) -> impl Iterator<Item = FaceKey> + '_ {
        self.outgoing(v).filter_map(move |h| self.half_edges[h].face)
    }

    /// Half-edges of a face in loop order
    pub fn face_half_edges(&self, f: FaceKey) -> HalfEdgeWalk<'_, K> {
        HalfEdgeWalk::new(self, self.face_half_edge(f), Step::Next)
    }

    /// Corners of a face in loop order
    pub fn face_vertices(&self, f: FaceKey) -> impl Iterator<Item = VertexKey> + '_ {
        self.face_half_edges(f).map(move |h| self.half_edges[h].vert)
    }

    /// Any `next` cycle, e.g. a boundary loop from `find_boundary`
    pub fn loop_half_edges(&self, h: HalfEdgeKey) -> HalfEdgeWalk<'_, K> {
        let start = self.is_valid_half_edge(h).then_some(h);
        HalfEdgeWalk::new(self, start, Step::Next)
    }

    /// Number of edges at `v`
    pub fn valence(&self, v: VertexKey) -> usize {
        self.outgoing(v).count()
    }

    /// Number of sides of `f`
    pub fn face_degree(&self, f: FaceKey) -> usize {
        self.face_half_edges(f).count()
    }
}
