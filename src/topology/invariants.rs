// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Whole-mesh structural checks and summary statistics

use super::entity::Kinds;
use super::keys::HalfEdgeKey;
use super::registry::Mesh;
use ahash::AHashSet;
use serde::Serialize;
use thiserror::Error;

/// One broken connectivity rule, keyed by the entity that breaks it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("{entity} refers to a dead {target}")]
    DeadReference { entity: String, target: &'static str },

    #[error("{0} is not the twin of its twin")]
    TwinMismatch(String),

    #[error("{0}: next and prev links disagree")]
    LinkMismatch(String),

    #[error("{0} does not start where its predecessor ends")]
    BrokenChain(String),

    #[error("{0} and its successor belong to different faces")]
    FaceMismatch(String),

    #[error("{0} and its twin belong to different edges")]
    EdgeMismatch(String),

    #[error("{0}: stored half-edge does not leave the vertex")]
    ForeignOutgoing(String),

    #[error("{0}: boundary vertex stores an interior half-edge")]
    InteriorOutgoing(String),

    #[error("{0}: two stored half-edges lie in one group")]
    SharedGroup(String),

    #[error("{0}: one group holds more than one boundary run")]
    MergedRuns(String),

    #[error("{0} cannot be reached from the half-edges stored at its origin")]
    UnreachableArc(String),

    #[error("{0} has fewer than three sides")]
    DegenerateFace(String),

    #[error("loop through {0} does not close within {1} steps")]
    OpenLoop(String, usize),
}

/// Entity counts and boundary summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MeshStats {
    pub vertices: usize,
    pub half_edges: usize,
    pub edges: usize,
    pub faces: usize,
    pub boundary_edges: usize,
    pub boundary_loops: usize,
    pub isolated_vertices: usize,
    pub singular_vertices: usize,
    /// Invalidated entities not yet reclaimed
    pub pending: usize,
    /// V - E + F
    pub euler_characteristic: i64,
}

impl<K: Kinds> Mesh<K> {
    /// Check every connectivity rule, with loops capped at the half-edge count
    pub fn check_invariants(&self) -> Vec<InvariantViolation> {
        self.check_invariants_bounded(self.half_edge_count().max(1))
    }

    /// Check every connectivity rule; any loop longer than `max_loop` is reported open
    pub fn check_invariants_bounded(&self, max_loop: usize) -> Vec<InvariantViolation> {
        let mut found = Vec::new();
        self.check_half_edges(&mut found);
        self.check_edges(&mut found);
        self.check_vertices(max_loop, &mut found);
        self.check_faces(max_loop, &mut found);
        self.check_boundary_loops(max_loop, &mut found);

        if !found.is_empty() {
            log::warn!("mesh breaks {} connectivity rule(s)", found.len());
        }
        found
    }

    pub fn is_valid(&self) -> bool {
        self.check_invariants().is_empty()
    }

    pub fn stats(&self) -> MeshStats {
        let (v, e, f) = (self.vertex_count(), self.edge_count(), self.face_count());
        MeshStats {
            vertices: v,
            half_edges: self.half_edge_count(),
            edges: e,
            faces: f,
            boundary_edges: self
                .edge_keys()
                .iter()
                .filter(|&&e| self.is_boundary_edge(e))
                .count(),
            boundary_loops: self.boundary_loops().len(),
            isolated_vertices: self
                .vertex_keys()
                .iter()
                .filter(|&&v| self.is_isolated_vertex(v))
                .count(),
            singular_vertices: self
                .vertex_keys()
                .iter()
                .filter(|&&v| self.is_singular_vertex(v))
                .count(),
            pending: self.invalid_count(),
            euler_characteristic: v as i64 - e as i64 + f as i64,
        }
    }

    fn check_half_edges(&self, found: &mut Vec<InvariantViolation>) {
        for &h in self.half_edge_keys() {
            let he = &self.half_edges[h];
            let name = format!("{:?}", h);

            let dead = [
                (!self.half_edges.is_live(he.twin), "twin"),
                (!self.half_edges.is_live(he.next), "next"),
                (!self.half_edges.is_live(he.prev), "prev"),
                (!self.vertices.is_live(he.vert), "vertex"),
                (!self.edges.is_live(he.edge), "edge"),
                (he.face.is_some_and(|f| !self.faces.is_live(f)), "face"),
            ];
            let mut broken = false;
            for (is_dead, target) in dead {
                if is_dead {
                    found.push(InvariantViolation::DeadReference {
                        entity: name.clone(),
                        target,
                    });
                    broken = true;
                }
            }
            if broken {
                continue;
            }

            let twin = &self.half_edges[he.twin];
            if twin.twin != h || he.twin == h {
                found.push(InvariantViolation::TwinMismatch(name.clone()));
            }
            if twin.edge != he.edge {
                found.push(InvariantViolation::EdgeMismatch(name.clone()));
            }
            if self.half_edges[he.next].prev != h || self.half_edges[he.prev].next != h {
                found.push(InvariantViolation::LinkMismatch(name.clone()));
            }
            if self.half_edges[he.prev].vert != twin.vert {
                found.push(InvariantViolation::BrokenChain(name.clone()));
            }
            if self.half_edges[he.next].face != he.face {
                found.push(InvariantViolation::FaceMismatch(name));
            }
        }
    }

    fn check_edges(&self, found: &mut Vec<InvariantViolation>) {
        for &e in self.edge_keys() {
            let h = self.edges[e].half_edge;
            if !self.half_edges.is_live(h) {
                found.push(InvariantViolation::DeadReference {
                    entity: format!("{:?}", e),
                    target: "half-edge",
                });
            } else if self.half_edges[h].edge != e {
                found.push(InvariantViolation::EdgeMismatch(format!("{:?}", h)));
            }
        }
    }

    /// Every group of every vertex is one rotation with at most one
    /// boundary run, named by its boundary arc when it has one, and
    /// together the groups reach every arc leaving the vertex
    fn check_vertices(&self, max_loop: usize, found: &mut Vec<InvariantViolation>) {
        let mut reached: AHashSet<HalfEdgeKey> = AHashSet::with_capacity(self.half_edge_count());

        for &v in self.vertex_keys() {
            let name = format!("{:?}", v);
            let mut open = Vec::new();
            for a in self.vertices[v].group_half_edges() {
                if !self.half_edges.is_live(a) {
                    found.push(InvariantViolation::DeadReference {
                        entity: name.clone(),
                        target: "half-edge",
                    });
                    continue;
                }
                if self.origin(a) != Some(v) {
                    found.push(InvariantViolation::ForeignOutgoing(name.clone()));
                    continue;
                }
                if reached.contains(&a) {
                    found.push(InvariantViolation::SharedGroup(name.clone()));
                    continue;
                }

                let mut ring: Vec<HalfEdgeKey> = Vec::new();
                let mut in_ring: AHashSet<HalfEdgeKey> = AHashSet::new();
                let mut closed = true;
                for g in self.group_outgoing(a) {
                    if ring.len() >= max_loop || !in_ring.insert(g) {
                        closed = false;
                        break;
                    }
                    ring.push(g);
                }
                if !closed {
                    found.push(InvariantViolation::OpenLoop(name.clone(), max_loop));
                    continue;
                }
                let runs = ring
                    .iter()
                    .filter(|&&g| self.half_edges[g].face.is_none())
                    .count();
                if runs > 1 {
                    found.push(InvariantViolation::MergedRuns(name.clone()));
                }
                if runs > 0 && self.half_edges[a].face.is_some() {
                    found.push(InvariantViolation::InteriorOutgoing(name.clone()));
                }
                open.push(runs > 0);
                reached.extend(ring);
            }
            // open groups come first
            if open.first() == Some(&false) && open.contains(&true) {
                found.push(InvariantViolation::InteriorOutgoing(name));
            }
        }

        for &h in self.half_edge_keys() {
            if reached.contains(&h) {
                continue;
            }
            if self.origin(h).is_some_and(|v| self.vertices.is_live(v)) {
                found.push(InvariantViolation::UnreachableArc(format!("{:?}", h)));
            }
        }
    }

    fn check_faces(&self, max_loop: usize, found: &mut Vec<InvariantViolation>) {
        for &f in self.face_keys() {
            let h = self.faces[f].half_edge;
            let name = format!("{:?}", f);
            if !self.half_edges.is_live(h) {
                found.push(InvariantViolation::DeadReference {
                    entity: name,
                    target: "half-edge",
                });
                continue;
            }
            if self.half_edges[h].face != Some(f) {
                found.push(InvariantViolation::FaceMismatch(name));
                continue;
            }
            let degree = self.loop_half_edges(h).take(max_loop + 1).count();
            if degree > max_loop {
                found.push(InvariantViolation::OpenLoop(name, max_loop));
            } else if degree < 3 {
                found.push(InvariantViolation::DegenerateFace(name));
            }
        }
    }

    /// Every boundary arc lies on a `next` cycle that comes back to it
    fn check_boundary_loops(&self, max_loop: usize, found: &mut Vec<InvariantViolation>) {
        let mut seen: AHashSet<HalfEdgeKey> = AHashSet::new();
        for &h in self.half_edge_keys() {
            if self.half_edges[h].face.is_some() || seen.contains(&h) {
                continue;
            }
            let mut arc = h;
            let mut steps = 0;
            let closed = loop {
                if !seen.insert(arc) {
                    break arc == h;
                }
                steps += 1;
                if steps > max_loop {
                    break false;
                }
                match self.half_edges.get(arc) {
                    Some(he) => arc = he.next,
                    None => break false,
                }
            };
            if !closed {
                found.push(InvariantViolation::OpenLoop(format!("{:?}", h), max_loop));
            }
        }
    }
}
