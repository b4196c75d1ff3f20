// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Edge collapse and vertex welding
//!
//! Both operations merge one vertex into another. They share the same
//! read-only check pass: which triangles degenerate, whether the merge
//! would duplicate an edge, and whether anything would be left dangling.
//! Only once every check passes does the mesh change.

use super::entity::Kinds;
use super::keys::{EdgeKey, FaceKey, HalfEdgeKey, VertexKey};
use super::registry::Mesh;
use crate::error::{TopologyError, TopologyResult};

/// Apexes of the triangles a merge flattens away, one per side
#[derive(Debug, Clone, Copy, Default)]
struct Apexes {
    left: Option<VertexKey>,
    right: Option<VertexKey>,
}

impl Apexes {
    fn contains(&self, v: VertexKey) -> bool {
        self.left == Some(v) || self.right == Some(v)
    }

    fn iter(&self) -> impl Iterator<Item = VertexKey> {
        self.left.into_iter().chain(self.right)
    }
}

impl<K: Kinds> Mesh<K> {
    /// Collapse an edge along its stored half-edge; returns the survivor
    pub fn collapse_edge(&mut self, e: EdgeKey) -> TopologyResult<VertexKey> {
        self.require_edge(e)?;
        let h = self.edges[e].half_edge;
        self.collapse_half_edge(h)
    }

    /// Merge the origin of `h` into its destination
    ///
    /// Triangles on either side of `h` lose their third side and are
    /// removed, their two remaining edges fused into one. The destination
    /// survives and is returned.
    pub fn collapse_half_edge(&mut self, h: HalfEdgeKey) -> TopologyResult<VertexKey> {
        self.require_half_edge(h)?;
        let apexes = self.check_collapse(h)?;
        Ok(self.commit_collapse(h, apexes))
    }

    /// Merge `gone` into `keep`
    ///
    /// Joined vertices are collapsed along their edge. Otherwise each must
    /// have exactly one boundary run. Where a boundary triangle closes up,
    /// its two free sides are zipped and the groups join; without one, the
    /// fan of `gone` becomes a separate group of `keep`.
    pub fn weld_vertices(&mut self, gone: VertexKey, keep: VertexKey) -> TopologyResult<VertexKey> {
        self.require_vertex(gone)?;
        self.require_vertex(keep)?;
        if gone == keep {
            return Err(TopologyError::NotWeldable("same vertex"));
        }
        if let Some(h) = self.find_half_edge(gone, keep) {
            return self.collapse_half_edge(h);
        }

        let (in_gone, out_gone) = self.single_gap(gone)?;
        let (in_keep, out_keep) = self.single_gap(keep)?;

        // a boundary path gone -> apex -> keep closes into a triangle
        let apex_of = |out: HalfEdgeKey, into: HalfEdgeKey| {
            let apex = self.dest_of(out);
            (apex == self.origin_of(into)).then_some(apex)
        };
        let apexes = Apexes {
            left: apex_of(out_gone, in_keep),
            right: apex_of(out_keep, in_gone),
        };
        if apexes.left.is_some() && apexes.left == apexes.right {
            return Err(TopologyError::DegenerateCollapse("both triangles share their apex"));
        }
        self.check_common_neighbours(gone, keep, &apexes)?;
        let gone_faces = self.face_set(gone);
        if self.vertex_faces(keep).any(|f| gone_faces.contains(&f)) {
            return Err(TopologyError::NotWeldable("vertices share a face"));
        }

        let mut keep_arcs = self.outgoing_snapshot(keep);
        keep_arcs.extend(self.outgoing_snapshot(gone));
        let apex_arcs = self.apex_snapshots(&apexes);

        self.transfer_incoming(gone, keep);
        self.set_vertex_half_edge(gone, None);
        self.delete_vertex(gone);

        if apexes.left.is_some() {
            self.merge_edges(out_gone, in_keep);
        }
        if apexes.right.is_some() {
            self.merge_edges(out_keep, in_gone);
        }

        self.settle(keep, &keep_arcs);
        for (apex, arcs) in apex_arcs {
            self.settle(apex, &arcs);
        }
        Ok(keep)
    }

    fn triangle_apex(&self, h: HalfEdgeKey) -> Option<VertexKey> {
        self.face_at(h)?;
        let n = self.next_of(h);
        (self.next_of(self.next_of(n)) == h).then(|| self.dest_of(n))
    }

    fn check_collapse(&self, h: HalfEdgeKey) -> TopologyResult<Apexes> {
        let o = self.twin_of(h);
        let from = self.dest_of(o);
        let to = self.dest_of(h);
        if from == to {
            return Err(TopologyError::DegenerateCollapse("edge is a loop"));
        }
        if self.next_of(h) == o || self.next_of(o) == h {
            return Err(TopologyError::DegenerateCollapse("edge dangles from a vertex"));
        }
        if self.face_at(h).is_some() && self.face_at(h) == self.face_at(o) {
            return Err(TopologyError::DegenerateCollapse("edge has one face on both sides"));
        }

        let apexes = Apexes {
            left: self.triangle_apex(h),
            right: self.triangle_apex(o),
        };
        if apexes.left.is_some() && apexes.left == apexes.right {
            return Err(TopologyError::DegenerateCollapse("both triangles share their apex"));
        }

        for (arc, apex) in [(h, apexes.left), (o, apexes.right)] {
            let Some(apex) = apex else { continue };
            let (n, p) = (self.next_of(arc), self.prev_of(arc));
            if apex == from || apex == to {
                return Err(TopologyError::DegenerateCollapse("triangle repeats a corner"));
            }
            if self.is_free_arc(self.twin_of(n)) && self.is_free_arc(self.twin_of(p)) {
                return Err(TopologyError::DegenerateCollapse("triangle would leave a dangling edge"));
            }
        }

        if !self.is_free_arc(h)
            && !self.is_free_arc(o)
            && self.is_boundary_vertex(from)
            && self.is_boundary_vertex(to)
        {
            return Err(TopologyError::PinchedBoundary);
        }

        self.check_common_neighbours(from, to, &apexes)?;

        let sides = [self.face_at(h), self.face_at(o)];
        let from_faces = self.face_set(from);
        if self
            .vertex_faces(to)
            .any(|f| from_faces.contains(&f) && !sides.contains(&Some(f)))
        {
            return Err(TopologyError::DegenerateCollapse("vertices share another face"));
        }

        Ok(apexes)
    }

    /// Any vertex next to both `a` and `b` must be one of the apexes
    fn check_common_neighbours(&self, a: VertexKey, b: VertexKey, apexes: &Apexes) -> TopologyResult<()> {
        let around_a = self.neighbour_set(a);
        let clash = self
            .vertex_vertices(b)
            .any(|w| w != a && around_a.contains(&w) && !apexes.contains(w));
        if clash {
            return Err(TopologyError::DuplicateEdge);
        }
        Ok(())
    }

    /// The boundary pair `(incoming, outgoing)` of a vertex with one boundary run
    fn single_gap(&self, v: VertexKey) -> TopologyResult<(HalfEdgeKey, HalfEdgeKey)> {
        if self.boundary_gap_count(v) != 1 {
            return Err(TopologyError::NotWeldable("vertex needs exactly one boundary run"));
        }
        let out = self
            .outgoing(v)
            .find(|&h| self.is_free_arc(h))
            .ok_or(TopologyError::NotWeldable("vertex needs exactly one boundary run"))?;
        Ok((self.prev_of(out), out))
    }

    /// Point every arc arriving at `from` at `to` instead
    fn transfer_incoming(&mut self, from: VertexKey, to: VertexKey) {
        let incoming: Vec<HalfEdgeKey> = self
            .outgoing_snapshot(from)
            .into_iter()
            .map(|g| self.twin_of(g))
            .collect();
        for arc in incoming {
            self.half_edges[arc].vert = to;
        }
    }

    /// Outgoing arcs of each apex before a merge touches them
    fn apex_snapshots(&self, apexes: &Apexes) -> Vec<(VertexKey, Vec<HalfEdgeKey>)> {
        apexes
            .iter()
            .map(|apex| (apex, self.outgoing_snapshot(apex)))
            .collect()
    }

    fn commit_collapse(&mut self, h: HalfEdgeKey, apexes: Apexes) -> VertexKey {
        let o = self.twin_of(h);
        let from = self.dest_of(o);
        let to = self.dest_of(h);
        let (hn, hp) = (self.next_of(h), self.prev_of(h));
        let (on, op) = (self.next_of(o), self.prev_of(o));
        let (fh, fo) = (self.face_at(h), self.face_at(o));

        let mut to_arcs = self.outgoing_snapshot(to);
        to_arcs.extend(self.outgoing_snapshot(from));
        let apex_arcs = self.apex_snapshots(&apexes);

        self.transfer_incoming(from, to);
        self.set_next(hp, hn);
        self.set_next(op, on);
        self.repoint_face(fh, h, hn);
        self.repoint_face(fo, o, on);

        self.set_vertex_half_edge(from, None);
        self.delete_vertex(from);
        let e = self.edge_at(h);
        self.delete_edge_whole(e);

        if let (Some(_), Some(f)) = (apexes.left, fh) {
            self.merge_edges(hn, hp);
            self.delete_face(f);
        }
        if let (Some(_), Some(f)) = (apexes.right, fo) {
            self.merge_edges(on, op);
            self.delete_face(f);
        }

        self.settle(to, &to_arcs);
        for (apex, arcs) in apex_arcs {
            self.settle(apex, &arcs);
        }
        to
    }

    fn repoint_face(&mut self, f: Option<FaceKey>, old: HalfEdgeKey, new: HalfEdgeKey) {
        if let Some(f) = f {
            if self.faces[f].half_edge == old {
                self.faces[f].half_edge = new;
            }
        }
    }

    /// Fuse `p: x -> y` and `q: y -> x` into a single edge
    ///
    /// The outer twins of `p` and `q` become each other's twins and keep
    /// the edge of `p`; `p`, `q` and the edge of `q` are deleted. Loops
    /// through `p` and `q` are spliced past them. Faces owning `p` or `q`
    /// are the caller's to delete, and so is settling both endpoints.
    pub(crate) fn merge_edges(&mut self, p: HalfEdgeKey, q: HalfEdgeKey) {
        let (pp, pn) = (self.prev_of(p), self.next_of(p));
        let (qp, qn) = (self.prev_of(q), self.next_of(q));
        if pn == q && qn == p {
            // closed two-cycle, nothing to splice
        } else if pn == q {
            self.set_next(pp, qn);
        } else if qn == p {
            self.set_next(qp, pn);
        } else {
            self.set_next(pp, qn);
            self.set_next(qp, pn);
        }

        let (tp, tq) = (self.twin_of(p), self.twin_of(q));
        let kept = self.edge_at(p);
        let dropped = self.edge_at(q);

        self.half_edges[tp].twin = tq;
        self.half_edges[tq].twin = tp;
        self.half_edges[tq].edge = kept;
        self.edges[kept].half_edge = tp;

        self.delete_half_edge(p);
        self.delete_half_edge(q);
        self.delete_edge(dropped);
    }
}
