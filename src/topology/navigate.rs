// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Navigation and low-level linking shared by every operation

use super::entity::{Edge, HalfEdge, Kinds};
use super::keys::{EdgeKey, FaceKey, HalfEdgeKey, VertexKey};
use super::registry::Mesh;
use ahash::{AHashMap, AHashSet};

impl<K: Kinds> Mesh<K> {
    // ---------------------------------------------------------------------
    // Public navigation; stale keys resolve to `None`
    // ---------------------------------------------------------------------

    pub fn twin(&self, h: HalfEdgeKey) -> Option<HalfEdgeKey> {
        self.half_edges.get(h).map(|he| he.twin)
    }

    pub fn next(&self, h: HalfEdgeKey) -> Option<HalfEdgeKey> {
        self.half_edges.get(h).map(|he| he.next)
    }

    pub fn prev(&self, h: HalfEdgeKey) -> Option<HalfEdgeKey> {
        self.half_edges.get(h).map(|he| he.prev)
    }

    /// Vertex the half-edge points at
    pub fn dest(&self, h: HalfEdgeKey) -> Option<VertexKey> {
        self.half_edges.get(h).map(|he| he.vert)
    }

    /// Vertex the half-edge leaves from
    pub fn origin(&self, h: HalfEdgeKey) -> Option<VertexKey> {
        self.twin(h).and_then(|t| self.dest(t))
    }

    /// Owning face; `None` for boundary arcs and stale keys alike
    pub fn face_of(&self, h: HalfEdgeKey) -> Option<FaceKey> {
        self.half_edges.get(h).and_then(|he| he.face)
    }

    pub fn edge_of(&self, h: HalfEdgeKey) -> Option<EdgeKey> {
        self.half_edges.get(h).map(|he| he.edge)
    }

    pub fn vertex_half_edge(&self, v: VertexKey) -> Option<HalfEdgeKey> {
        self.vertices.get(v).and_then(|vertex| vertex.half_edge)
    }

    pub fn edge_half_edge(&self, e: EdgeKey) -> Option<HalfEdgeKey> {
        self.edges.get(e).map(|edge| edge.half_edge)
    }

    pub fn face_half_edge(&self, f: FaceKey) -> Option<HalfEdgeKey> {
        self.faces.get(f).map(|face| face.half_edge)
    }

    /// Both endpoints of an edge, origin of its stored half-edge first
    pub fn edge_vertices(&self, e: EdgeKey) -> Option<(VertexKey, VertexKey)> {
        let h = self.edge_half_edge(e)?;
        Some((self.origin(h)?, self.dest(h)?))
    }

    /// The directed arc `from -> to`, if one exists
    pub fn find_half_edge(&self, from: VertexKey, to: VertexKey) -> Option<HalfEdgeKey> {
        self.outgoing(from).find(|&h| self.half_edges[h].vert == to)
    }

    pub fn edge_between(&self, a: VertexKey, b: VertexKey) -> Option<EdgeKey> {
        self.find_half_edge(a, b).map(|h| self.half_edges[h].edge)
    }

    pub fn is_boundary_half_edge(&self, h: HalfEdgeKey) -> bool {
        self.half_edges.get(h).is_some_and(|he| he.face.is_none())
    }

    /// True if either side of the edge has no face
    pub fn is_boundary_edge(&self, e: EdgeKey) -> bool {
        let Some(h) = self.edge_half_edge(e) else {
            return false;
        };
        self.is_boundary_half_edge(h) || self.twin(h).is_some_and(|t| self.is_boundary_half_edge(t))
    }

    /// True if the vertex has at least one face-less outgoing arc
    pub fn is_boundary_vertex(&self, v: VertexKey) -> bool {
        self.vertex_half_edge(v)
            .is_some_and(|h| self.is_boundary_half_edge(h))
    }

    pub fn is_isolated_vertex(&self, v: VertexKey) -> bool {
        self.vertices.get(v).is_some_and(|vertex| vertex.half_edge.is_none())
    }

    /// True if two or more manifold groups meet at the vertex
    pub fn is_singular_vertex(&self, v: VertexKey) -> bool {
        self.group_count(v) > 1
    }

    /// Number of manifold groups around the vertex
    pub fn group_count(&self, v: VertexKey) -> usize {
        self.vertices.get(v).map_or(0, |vertex| vertex.group_count())
    }

    /// Number of face-less outgoing arcs, one per boundary run
    pub fn boundary_gap_count(&self, v: VertexKey) -> usize {
        self.outgoing(v)
            .filter(|&h| self.half_edges[h].face.is_none())
            .count()
    }

    /// First face-less half-edge in collection order
    pub fn find_boundary(&self) -> Option<HalfEdgeKey> {
        self.half_edge_keys()
            .iter()
            .copied()
            .find(|&h| self.half_edges[h].face.is_none())
    }

    /// Every boundary cycle, each reported once starting at its first arc
    ///
    /// A walk stops at the first repeated arc, so a broken `next` link
    /// yields a truncated loop instead of spinning.
    pub fn boundary_loops(&self) -> Vec<Vec<HalfEdgeKey>> {
        let mut seen: AHashSet<HalfEdgeKey> = AHashSet::new();
        let mut loops = Vec::new();

        for &h in self.half_edge_keys() {
            if self.half_edges[h].face.is_some() || seen.contains(&h) {
                continue;
            }
            let mut cycle = Vec::new();
            for arc in self.loop_half_edges(h) {
                if !seen.insert(arc) {
                    break;
                }
                cycle.push(arc);
            }
            loops.push(cycle);
        }

        loops
    }

    /// Faces around a vertex, one list per manifold group
    pub fn manifold_groups(&self, v: VertexKey) -> Vec<Vec<FaceKey>> {
        let Some(vertex) = self.vertices.get(v) else {
            return Vec::new();
        };
        vertex
            .group_half_edges()
            .map(|a| {
                self.group_outgoing(a)
                    .filter_map(|h| self.half_edges[h].face)
                    .collect::<Vec<_>>()
            })
            .filter(|faces| !faces.is_empty())
            .collect()
    }

    // ---------------------------------------------------------------------
    // Trusted navigation for algorithms; keys must be live
    // ---------------------------------------------------------------------

    #[inline]
    pub(crate) fn twin_of(&self, h: HalfEdgeKey) -> HalfEdgeKey {
        self.half_edges[h].twin
    }

    #[inline]
    pub(crate) fn next_of(&self, h: HalfEdgeKey) -> HalfEdgeKey {
        self.half_edges[h].next
    }

    #[inline]
    pub(crate) fn prev_of(&self, h: HalfEdgeKey) -> HalfEdgeKey {
        self.half_edges[h].prev
    }

    #[inline]
    pub(crate) fn dest_of(&self, h: HalfEdgeKey) -> VertexKey {
        self.half_edges[h].vert
    }

    #[inline]
    pub(crate) fn origin_of(&self, h: HalfEdgeKey) -> VertexKey {
        self.half_edges[self.half_edges[h].twin].vert
    }

    #[inline]
    pub(crate) fn face_at(&self, h: HalfEdgeKey) -> Option<FaceKey> {
        self.half_edges[h].face
    }

    #[inline]
    pub(crate) fn edge_at(&self, h: HalfEdgeKey) -> EdgeKey {
        self.half_edges[h].edge
    }

    #[inline]
    pub(crate) fn is_free_arc(&self, h: HalfEdgeKey) -> bool {
        self.half_edges[h].face.is_none()
    }

    /// Isolated, or still has a free boundary run
    pub(crate) fn has_free_run(&self, v: VertexKey) -> bool {
        match self.vertices[v].half_edge {
            None => true,
            Some(h) => self.is_free_arc(h),
        }
    }

    /// Link `h -> n` in both directions
    #[inline]
    pub(crate) fn set_next(&mut self, h: HalfEdgeKey, n: HalfEdgeKey) {
        self.half_edges[h].next = n;
        self.half_edges[n].prev = h;
    }

    pub(crate) fn set_face(&mut self, h: HalfEdgeKey, f: Option<FaceKey>) {
        self.half_edges[h].face = f;
    }

    pub(crate) fn set_vertex_half_edge(&mut self, v: VertexKey, h: Option<HalfEdgeKey>) {
        let vertex = &mut self.vertices[v];
        vertex.half_edge = h;
        vertex.extra_groups.clear();
    }

    /// Allocate an edge `from -> to` and return the arc pointing at `to`
    ///
    /// The two half-edges start as a closed two-cycle with no face; callers
    /// relink them into their loops.
    pub(crate) fn new_edge(&mut self, from: VertexKey, to: VertexKey) -> HalfEdgeKey {
        let edge = self.edges.insert(Edge::new((self.factory.edge)()));

        let mut forward = HalfEdge::new((self.factory.half_edge)());
        forward.vert = to;
        forward.edge = edge;
        let mut backward = HalfEdge::new((self.factory.half_edge)());
        backward.vert = from;
        backward.edge = edge;

        let a = self.half_edges.insert(forward);
        let b = self.half_edges.insert(backward);

        for (this, other) in [(a, b), (b, a)] {
            let he = &mut self.half_edges[this];
            he.twin = other;
            he.next = other;
            he.prev = other;
        }
        self.edges[edge].half_edge = a;
        a
    }

    /// Outgoing arcs of `v` over all groups, collected before a mutation
    pub(crate) fn outgoing_snapshot(&self, v: VertexKey) -> Vec<HalfEdgeKey> {
        self.outgoing(v).collect()
    }

    /// True if `h` is live and leaves `v`
    fn leaves(&self, h: HalfEdgeKey, v: VertexKey) -> bool {
        self.half_edges.is_live(h)
            && self
                .half_edges
                .get(self.half_edges[h].twin)
                .is_some_and(|t| t.vert == v)
    }

    /// Boundary arc closing the fan that opens with the boundary arc `b`
    ///
    /// Only face links are followed, so stale boundary links left by an
    /// edit in progress do not matter.
    fn fan_end(&self, b: HalfEdgeKey, limit: usize) -> HalfEdgeKey {
        let mut t = self.twin_of(b);
        for _ in 0..limit {
            if self.is_free_arc(t) {
                break;
            }
            t = self.twin_of(self.next_of(t));
        }
        t
    }

    /// Split the arcs leaving `v` into rotation cycles
    ///
    /// Returns one arc per cycle in discovery order, paired with whether the
    /// cycle is open. An open cycle is named by its boundary arc.
    pub(crate) fn trace_groups(
        &self,
        v: VertexKey,
        candidates: &[HalfEdgeKey],
    ) -> Vec<(HalfEdgeKey, bool)> {
        let mut seen = AHashSet::with_capacity(candidates.len());
        let mut groups = Vec::new();

        for &start in candidates {
            if seen.contains(&start) {
                continue;
            }
            let mut free = None;
            for h in self.group_outgoing(start) {
                if !seen.insert(h) || self.origin(h) != Some(v) {
                    break;
                }
                if free.is_none() && self.is_free_arc(h) {
                    free = Some(h);
                }
            }
            groups.push((free.unwrap_or(start), free.is_some()));
        }
        groups
    }

    /// Relink the boundary around `v` and rebuild its groups
    ///
    /// `candidates` holds every arc that may leave `v` after the edit; dead
    /// and foreign ones are skipped. Each boundary arc leaving `v` is made
    /// to follow the boundary arc that closes its own fan, so a boundary
    /// never steps from one group into another. Returns false when no arc
    /// is left.
    pub(crate) fn settle(&mut self, v: VertexKey, candidates: &[HalfEdgeKey]) -> bool {
        if !self.vertices.is_live(v) {
            return false;
        }
        let mut unique = AHashSet::with_capacity(candidates.len());
        let arcs: Vec<HalfEdgeKey> = candidates
            .iter()
            .copied()
            .filter(|&h| self.leaves(h, v) && unique.insert(h))
            .collect();

        for &b in &arcs {
            if self.is_free_arc(b) {
                let end = self.fan_end(b, arcs.len());
                self.set_next(end, b);
            }
        }

        let mut groups = self.trace_groups(v, &arcs);
        if let Some(first_open) = groups.iter().position(|&(_, open)| open) {
            groups.rotate_left(first_open);
        }
        let mut anchors = groups.into_iter().map(|(h, _)| h);
        let vertex = &mut self.vertices[v];
        vertex.half_edge = anchors.next();
        vertex.extra_groups = anchors.collect();
        vertex.half_edge.is_some()
    }

    /// Recover the groups of freshly decoded vertices from their arcs
    ///
    /// The stored half-edge of each vertex is kept as it is; every other
    /// rotation cycle leaving the vertex becomes a further group.
    pub(crate) fn restore_groups(&mut self, vertices: &[VertexKey], half_edges: &[HalfEdgeKey]) {
        let mut leaving: AHashMap<VertexKey, Vec<HalfEdgeKey>> = AHashMap::new();
        for &h in half_edges {
            if let Some(v) = self.origin(h) {
                leaving.entry(v).or_default().push(h);
            }
        }

        for &v in vertices {
            let (Some(primary), Some(arcs)) = (self.vertices[v].half_edge, leaving.get(&v)) else {
                continue;
            };
            let mut candidates = Vec::with_capacity(arcs.len() + 1);
            candidates.push(primary);
            candidates.extend_from_slice(arcs);
            let extra = self
                .trace_groups(v, &candidates)
                .into_iter()
                .skip(1)
                .map(|(h, _)| h)
                .collect();
            self.vertices[v].extra_groups = extra;
        }
    }

    /// Walk the loop through `h` and stamp every arc with `f`
    pub(crate) fn assign_loop_face(&mut self, h: HalfEdgeKey, f: Option<FaceKey>) {
        let arcs: Vec<HalfEdgeKey> = self.loop_half_edges(h).collect();
        for arc in arcs {
            self.half_edges[arc].face = f;
        }
    }

    /// Vertices adjacent to `v`, deduplicated
    pub(crate) fn neighbour_set(&self, v: VertexKey) -> AHashSet<VertexKey> {
        self.vertex_vertices(v).collect()
    }

    /// Faces around `v`, deduplicated
    pub(crate) fn face_set(&self, v: VertexKey) -> AHashSet<FaceKey> {
        self.vertex_faces(v).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::topology::Mesh;

    #[test]
    fn test_new_edge_is_two_cycle() {
        let mut mesh: Mesh = Mesh::new();
        let a = mesh.add_vertex();
        let b = mesh.add_vertex();
        let h = mesh.new_edge(a, b);
        let t = mesh.twin_of(h);

        assert_eq!(mesh.dest_of(h), b);
        assert_eq!(mesh.dest_of(t), a);
        assert_eq!(mesh.next_of(h), t);
        assert_eq!(mesh.prev_of(h), t);
        assert_eq!(mesh.edge_at(h), mesh.edge_at(t));
        assert_eq!(mesh.edge_count(), 1);
        assert_eq!(mesh.half_edge_count(), 2);
    }

    #[test]
    fn test_find_boundary_on_empty_mesh() {
        let mesh: Mesh = Mesh::new();
        assert!(mesh.find_boundary().is_none());
        assert!(mesh.boundary_loops().is_empty());
    }

    #[test]
    fn test_single_face_navigation() {
        let mut mesh: Mesh = Mesh::new();
        let v: Vec<_> = (0..3).map(|_| mesh.add_vertex()).collect();
        let f = mesh.add_face(&v).unwrap();

        let h = mesh.find_half_edge(v[0], v[1]).unwrap();
        assert_eq!(mesh.face_of(h), Some(f));
        assert_eq!(mesh.origin(h), Some(v[0]));
        assert_eq!(mesh.dest(h), Some(v[1]));
        assert!(mesh.is_boundary_half_edge(mesh.twin(h).unwrap()));
        assert!(mesh.is_boundary_vertex(v[0]));
        assert!(!mesh.is_singular_vertex(v[0]));
        assert_eq!(mesh.manifold_groups(v[0]), vec![vec![f]]);
    }
}
