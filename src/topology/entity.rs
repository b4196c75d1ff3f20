// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Vertex, half-edge, edge and face records
//!
//! Records carry only connectivity plus one payload slot each. What goes in
//! the payload is chosen per mesh through [`Kinds`], so derived meshes (UVs,
//! skin weights, smoothing groups) reuse every algorithm unchanged.

use super::keys::{EdgeKey, FaceKey, HalfEdgeKey, VertexKey};
use std::fmt;

/// Payload types attached to each entity kind of a mesh
pub trait Kinds: 'static {
    type Vertex: Clone + Default + fmt::Debug;
    type HalfEdge: Clone + Default + fmt::Debug;
    type Edge: Clone + Default + fmt::Debug;
    type Face: Clone + Default + fmt::Debug;
}

/// Pure topology: no payload on any entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Plain;

impl Kinds for Plain {
    type Vertex = ();
    type HalfEdge = ();
    type Edge = ();
    type Face = ();
}

/// Construction strategy for entity payloads
///
/// Every entity created by an operation (new edges in `add_face`, the
/// second face of `connect_vertices`, everything in `deserialize_into`)
/// takes its payload from here.
pub struct Factory<K: Kinds> {
    pub vertex: fn() -> K::Vertex,
    pub half_edge: fn() -> K::HalfEdge,
    pub edge: fn() -> K::Edge,
    pub face: fn() -> K::Face,
}

impl<K: Kinds> Default for Factory<K> {
    fn default() -> Self {
        Self {
            vertex: <K::Vertex as Default>::default,
            half_edge: <K::HalfEdge as Default>::default,
            edge: <K::Edge as Default>::default,
            face: <K::Face as Default>::default,
        }
    }
}

impl<K: Kinds> Clone for Factory<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: Kinds> Copy for Factory<K> {}

impl<K: Kinds> fmt::Debug for Factory<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory").finish_non_exhaustive()
    }
}

/// Vertex with one outgoing half-edge per manifold group
///
/// Each group is one `next(twin)` rotation holding at most one boundary
/// arc, and that arc is the one stored for it. Groups with a boundary arc
/// come first, so `half_edge` is a boundary arc whenever the vertex is on
/// the boundary and `add_face` can find a free run in O(1).
#[derive(Debug, Clone)]
pub struct Vertex<D> {
    pub(crate) half_edge: Option<HalfEdgeKey>,
    /// Further groups of a singular vertex, in cyclic order after the first
    pub(crate) extra_groups: Vec<HalfEdgeKey>,
    pub data: D,
}

impl<D> Vertex<D> {
    pub fn new(data: D) -> Self {
        Self {
            half_edge: None,
            extra_groups: Vec::new(),
            data,
        }
    }

    /// Outgoing half-edge of the first group, `None` for an isolated vertex
    pub fn half_edge(&self) -> Option<HalfEdgeKey> {
        self.half_edge
    }

    /// One outgoing half-edge per manifold group
    pub fn group_half_edges(&self) -> impl Iterator<Item = HalfEdgeKey> + '_ {
        self.half_edge.into_iter().chain(self.extra_groups.iter().copied())
    }

    pub fn group_count(&self) -> usize {
        self.half_edge.map_or(0, |_| 1 + self.extra_groups.len())
    }

    pub fn is_isolated(&self) -> bool {
        self.half_edge.is_none()
    }
}

/// Directed arc pointing at `vert`
#[derive(Debug, Clone)]
pub struct HalfEdge<D> {
    pub(crate) twin: HalfEdgeKey,
    pub(crate) next: HalfEdgeKey,
    pub(crate) prev: HalfEdgeKey,
    pub(crate) vert: VertexKey,
    pub(crate) edge: EdgeKey,
    pub(crate) face: Option<FaceKey>,
    pub data: D,
}

impl<D> HalfEdge<D> {
    /// Unlinked arc; every reference starts out null
    pub fn new(data: D) -> Self {
        Self {
            twin: HalfEdgeKey::default(),
            next: HalfEdgeKey::default(),
            prev: HalfEdgeKey::default(),
            vert: VertexKey::default(),
            edge: EdgeKey::default(),
            face: None,
            data,
        }
    }

    pub fn twin(&self) -> HalfEdgeKey {
        self.twin
    }

    pub fn next(&self) -> HalfEdgeKey {
        self.next
    }

    pub fn prev(&self) -> HalfEdgeKey {
        self.prev
    }

    /// Destination vertex
    pub fn vert(&self) -> VertexKey {
        self.vert
    }

    pub fn edge(&self) -> EdgeKey {
        self.edge
    }

    /// Owning face, `None` on the boundary
    pub fn face(&self) -> Option<FaceKey> {
        self.face
    }

    pub fn is_boundary(&self) -> bool {
        self.face.is_none()
    }
}

/// Undirected edge; the other half-edge is reached through `twin`
#[derive(Debug, Clone)]
pub struct Edge<D> {
    pub(crate) half_edge: HalfEdgeKey,
    pub data: D,
}

impl<D> Edge<D> {
    pub fn new(data: D) -> Self {
        Self {
            half_edge: HalfEdgeKey::default(),
            data,
        }
    }

    pub fn half_edge(&self) -> HalfEdgeKey {
        self.half_edge
    }
}

/// Polygon of any degree, walked through `next`
#[derive(Debug, Clone)]
pub struct Face<D> {
    pub(crate) half_edge: HalfEdgeKey,
    pub data: D,
}

impl<D> Face<D> {
    pub fn new(data: D) -> Self {
        Self {
            half_edge: HalfEdgeKey::default(),
            data,
        }
    }

    pub fn half_edge(&self) -> HalfEdgeKey {
        self.half_edge
    }
}
