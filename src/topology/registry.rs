// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Entity registry: the four collections that make up a mesh
//!
//! All structural edits go through `insert_*` / `delete_*`. Deletion is
//! deferred: the record stays readable until [`Mesh::clear_invalid`], so a
//! compound edit can still follow links out of entities it just removed.

use super::arena::Arena;
use super::entity::{Edge, Face, Factory, HalfEdge, Kinds, Plain, Vertex};
use super::keys::{EdgeKey, FaceKey, HalfEdgeKey, VertexKey};
use crate::error::{TopologyError, TopologyResult};
use ahash::AHashMap;
use std::fmt;

/// Editable half-edge mesh
///
/// `K` selects the payload carried by each entity kind; [`Plain`] carries
/// nothing.
pub struct Mesh<K: Kinds = Plain> {
    pub(crate) vertices: Arena<VertexKey, Vertex<K::Vertex>>,
    pub(crate) half_edges: Arena<HalfEdgeKey, HalfEdge<K::HalfEdge>>,
    pub(crate) edges: Arena<EdgeKey, Edge<K::Edge>>,
    pub(crate) faces: Arena<FaceKey, Face<K::Face>>,
    pub(crate) factory: Factory<K>,
}

impl<K: Kinds> Mesh<K> {
    /// Empty mesh using `Default` payloads
    pub fn new() -> Self {
        Self::with_factory(Factory::default())
    }

    /// Empty mesh whose new entities take their payload from `factory`
    pub fn with_factory(factory: Factory<K>) -> Self {
        Self {
            vertices: Arena::new(),
            half_edges: Arena::new(),
            edges: Arena::new(),
            faces: Arena::new(),
            factory,
        }
    }

    /// Pre-size for roughly `vertex_count` vertices and `face_count` faces
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        let edge_count = vertex_count + face_count;
        Self {
            vertices: Arena::with_capacity(vertex_count),
            half_edges: Arena::with_capacity(edge_count * 2),
            edges: Arena::with_capacity(edge_count),
            faces: Arena::with_capacity(face_count),
            factory: Factory::default(),
        }
    }

    pub fn factory(&self) -> &Factory<K> {
        &self.factory
    }

    // ---------------------------------------------------------------------
    // Counts
    // ---------------------------------------------------------------------

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn half_edge_count(&self) -> usize {
        self.half_edges.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Entities waiting on the invalidation lists
    pub fn invalid_count(&self) -> usize {
        self.vertices.invalid_len()
            + self.half_edges.invalid_len()
            + self.edges.invalid_len()
            + self.faces.invalid_len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.len() == 0 && self.faces.len() == 0 && self.edges.len() == 0
    }

    // ---------------------------------------------------------------------
    // Live collections, in collection order
    // ---------------------------------------------------------------------

    pub fn vertex_keys(&self) -> &[VertexKey] {
        self.vertices.live()
    }

    pub fn half_edge_keys(&self) -> &[HalfEdgeKey] {
        self.half_edges.live()
    }

    pub fn edge_keys(&self) -> &[EdgeKey] {
        self.edges.live()
    }

    pub fn face_keys(&self) -> &[FaceKey] {
        self.faces.live()
    }

    // ---------------------------------------------------------------------
    // Validity
    // ---------------------------------------------------------------------

    pub fn is_valid_vertex(&self, v: VertexKey) -> bool {
        self.vertices.is_live(v)
    }

    pub fn is_valid_half_edge(&self, h: HalfEdgeKey) -> bool {
        self.half_edges.is_live(h)
    }

    pub fn is_valid_edge(&self, e: EdgeKey) -> bool {
        self.edges.is_live(e)
    }

    pub fn is_valid_face(&self, f: FaceKey) -> bool {
        self.faces.is_live(f)
    }

    pub(crate) fn require_vertex(&self, v: VertexKey) -> TopologyResult<()> {
        if self.vertices.is_live(v) {
            Ok(())
        } else {
            Err(TopologyError::stale("vertex"))
        }
    }

    pub(crate) fn require_half_edge(&self, h: HalfEdgeKey) -> TopologyResult<()> {
        if self.half_edges.is_live(h) {
            Ok(())
        } else {
            Err(TopologyError::stale("half-edge"))
        }
    }

    pub(crate) fn require_edge(&self, e: EdgeKey) -> TopologyResult<()> {
        if self.edges.is_live(e) {
            Ok(())
        } else {
            Err(TopologyError::stale("edge"))
        }
    }

    pub(crate) fn require_face(&self, f: FaceKey) -> TopologyResult<()> {
        if self.faces.is_live(f) {
            Ok(())
        } else {
            Err(TopologyError::stale("face"))
        }
    }

    // ---------------------------------------------------------------------
    // Record access (live or pending reclamation)
    // ---------------------------------------------------------------------

    pub fn vertex_entry(&self, v: VertexKey) -> TopologyResult<&Vertex<K::Vertex>> {
        self.vertices.get(v).ok_or(TopologyError::stale("vertex"))
    }

    pub fn half_edge_entry(&self, h: HalfEdgeKey) -> TopologyResult<&HalfEdge<K::HalfEdge>> {
        self.half_edges.get(h).ok_or(TopologyError::stale("half-edge"))
    }

    pub fn edge_entry(&self, e: EdgeKey) -> TopologyResult<&Edge<K::Edge>> {
        self.edges.get(e).ok_or(TopologyError::stale("edge"))
    }

    pub fn face_entry(&self, f: FaceKey) -> TopologyResult<&Face<K::Face>> {
        self.faces.get(f).ok_or(TopologyError::stale("face"))
    }

    // ---------------------------------------------------------------------
    // Insertion
    // ---------------------------------------------------------------------

    /// Low-level insertion; the caller is responsible for linking
    pub fn insert_vertex(&mut self, vertex: Vertex<K::Vertex>) -> VertexKey {
        self.vertices.insert(vertex)
    }

    /// Low-level insertion; the caller is responsible for linking
    pub fn insert_half_edge(&mut self, half_edge: HalfEdge<K::HalfEdge>) -> HalfEdgeKey {
        self.half_edges.insert(half_edge)
    }

    /// Low-level insertion; the caller is responsible for linking
    pub fn insert_edge(&mut self, edge: Edge<K::Edge>) -> EdgeKey {
        self.edges.insert(edge)
    }

    /// Low-level insertion; the caller is responsible for linking
    pub fn insert_face(&mut self, face: Face<K::Face>) -> FaceKey {
        self.faces.insert(face)
    }

    /// New isolated vertex with a factory payload
    pub fn add_vertex(&mut self) -> VertexKey {
        let data = (self.factory.vertex)();
        self.insert_vertex(Vertex::new(data))
    }

    /// New isolated vertex carrying `data`
    pub fn add_vertex_with(&mut self, data: K::Vertex) -> VertexKey {
        self.insert_vertex(Vertex::new(data))
    }

    // ---------------------------------------------------------------------
    // Deferred deletion
    // ---------------------------------------------------------------------

    /// Invalidate a vertex; returns false if it was not live
    pub fn delete_vertex(&mut self, v: VertexKey) -> bool {
        self.vertices.invalidate(v)
    }

    pub fn delete_half_edge(&mut self, h: HalfEdgeKey) -> bool {
        self.half_edges.invalidate(h)
    }

    pub fn delete_edge(&mut self, e: EdgeKey) -> bool {
        self.edges.invalidate(e)
    }

    pub fn delete_face(&mut self, f: FaceKey) -> bool {
        self.faces.invalidate(f)
    }

    /// Invalidate an edge together with both of its half-edges
    pub fn delete_edge_whole(&mut self, e: EdgeKey) -> bool {
        let Some(edge) = self.edges.get(e) else {
            return false;
        };
        let h = edge.half_edge;
        if !self.edges.invalidate(e) {
            return false;
        }
        if let Some(twin) = self.half_edges.get(h).map(|he| he.twin) {
            self.half_edges.invalidate(twin);
        }
        self.half_edges.invalidate(h);
        true
    }

    /// Invalidate every vertex with no incident edge; returns how many
    pub fn delete_isolated_vertices(&mut self) -> usize {
        let isolated: Vec<VertexKey> = self
            .vertices
            .live()
            .iter()
            .copied()
            .filter(|&v| self.vertices[v].half_edge.is_none())
            .collect();
        for &v in &isolated {
            self.vertices.invalidate(v);
        }
        isolated.len()
    }

    /// Free everything on the invalidation lists
    ///
    /// Keys of reclaimed entities stop resolving after this call.
    pub fn clear_invalid(&mut self) -> usize {
        let freed = self.vertices.clear_invalid()
            + self.half_edges.clear_invalid()
            + self.edges.clear_invalid()
            + self.faces.clear_invalid();
        if freed > 0 {
            log::debug!("reclaimed {} invalidated entities", freed);
        }
        freed
    }

    /// Drop every entity, live or pending
    pub fn clear(&mut self) {
        self.clear_invalid();
        self.vertices.clear();
        self.half_edges.clear();
        self.edges.clear();
        self.faces.clear();
    }

    /// Move all live entities of `other` into this mesh
    ///
    /// Keys from `other` do not survive the move; every link is rewritten
    /// to the keys allocated here. `other` is left empty.
    pub fn merge_with(&mut self, other: &mut Mesh<K>) {
        other.clear_invalid();

        let vertices = other.vertices.drain_live();
        let half_edges = other.half_edges.drain_live();
        let edges = other.edges.drain_live();
        let faces = other.faces.drain_live();

        log::debug!(
            "merging {} vertices, {} half-edges, {} edges, {} faces",
            vertices.len(),
            half_edges.len(),
            edges.len(),
            faces.len()
        );

        let mut vertex_map: AHashMap<VertexKey, VertexKey> = AHashMap::with_capacity(vertices.len());
        let mut half_edge_map: AHashMap<HalfEdgeKey, HalfEdgeKey> =
            AHashMap::with_capacity(half_edges.len());
        let mut edge_map: AHashMap<EdgeKey, EdgeKey> = AHashMap::with_capacity(edges.len());
        let mut face_map: AHashMap<FaceKey, FaceKey> = AHashMap::with_capacity(faces.len());

        for (old, vertex) in vertices {
            vertex_map.insert(old, self.vertices.insert(vertex));
        }
        for (old, half_edge) in half_edges {
            half_edge_map.insert(old, self.half_edges.insert(half_edge));
        }
        for (old, edge) in edges {
            edge_map.insert(old, self.edges.insert(edge));
        }
        for (old, face) in faces {
            face_map.insert(old, self.faces.insert(face));
        }

        let remap_he = |h: HalfEdgeKey| half_edge_map.get(&h).copied().unwrap_or_default();

        for &new in vertex_map.values() {
            let vertex = &mut self.vertices[new];
            vertex.half_edge = vertex.half_edge.map(remap_he);
            for h in &mut vertex.extra_groups {
                *h = remap_he(*h);
            }
        }
        for &new in half_edge_map.values() {
            let he = &mut self.half_edges[new];
            he.twin = remap_he(he.twin);
            he.next = remap_he(he.next);
            he.prev = remap_he(he.prev);
            he.vert = vertex_map.get(&he.vert).copied().unwrap_or_default();
            he.edge = edge_map.get(&he.edge).copied().unwrap_or_default();
            he.face = he.face.and_then(|f| face_map.get(&f).copied());
        }
        for &new in edge_map.values() {
            let edge = &mut self.edges[new];
            edge.half_edge = remap_he(edge.half_edge);
        }
        for &new in face_map.values() {
            let face = &mut self.faces[new];
            face.half_edge = remap_he(face.half_edge);
        }
    }
}

impl<K: Kinds> Default for Mesh<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Kinds> Clone for Mesh<K> {
    fn clone(&self) -> Self {
        Self {
            vertices: self.vertices.clone(),
            half_edges: self.half_edges.clone(),
            edges: self.edges.clone(),
            faces: self.faces.clone(),
            factory: self.factory,
        }
    }
}

impl<K: Kinds> fmt::Debug for Mesh<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mesh")
            .field("vertices", &self.vertex_count())
            .field("half_edges", &self.half_edge_count())
            .field("edges", &self.edge_count())
            .field("faces", &self.face_count())
            .field("invalid", &self.invalid_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mesh() {
        let mesh: Mesh = Mesh::new();
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.invalid_count(), 0);
    }

    #[test]
    fn test_delete_is_deferred() {
        let mut mesh: Mesh = Mesh::new();
        let v = mesh.add_vertex();

        assert!(mesh.delete_vertex(v));
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.invalid_count(), 1);
        assert!(!mesh.is_valid_vertex(v));
        assert!(mesh.vertex_entry(v).is_ok());

        assert_eq!(mesh.clear_invalid(), 1);
        assert_eq!(
            mesh.vertex_entry(v).unwrap_err(),
            TopologyError::stale("vertex")
        );
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut mesh: Mesh = Mesh::new();
        let a = mesh.add_vertex();
        mesh.add_vertex();
        mesh.delete_vertex(a);

        mesh.clear();
        assert!(mesh.is_empty());
        assert_eq!(mesh.invalid_count(), 0);
    }

    #[test]
    fn test_merge_moves_isolated_vertices() {
        let mut a: Mesh = Mesh::new();
        let mut b: Mesh = Mesh::new();
        a.add_vertex();
        b.add_vertex();
        b.add_vertex();
        let gone = b.add_vertex();
        b.delete_vertex(gone);

        a.merge_with(&mut b);
        assert_eq!(a.vertex_count(), 3);
        assert!(b.is_empty());
        assert_eq!(b.invalid_count(), 0);
    }

    #[test]
    fn test_merge_moves_connected_meshes() {
        let mut a: Mesh = Mesh::new();
        let va: Vec<_> = (0..4).map(|_| a.add_vertex()).collect();
        a.add_face(&[va[0], va[1], va[2]]).unwrap();
        a.add_face(&[va[0], va[2], va[3]]).unwrap();

        // bowtie pinched at vb[0], plus a triangle left pending
        let mut b: Mesh = Mesh::new();
        let vb: Vec<_> = (0..8).map(|_| b.add_vertex()).collect();
        b.add_face(&[vb[0], vb[1], vb[2]]).unwrap();
        b.add_face(&[vb[0], vb[3], vb[4]]).unwrap();
        let dropped = b.add_face(&[vb[5], vb[6], vb[7]]).unwrap();
        b.remove_face(dropped).unwrap();
        assert!(b.invalid_count() > 0);

        a.merge_with(&mut b);

        assert!(b.is_empty());
        assert_eq!(b.invalid_count(), 0);
        assert_eq!(a.vertex_count(), 4 + 5);
        assert_eq!(a.edge_count(), 5 + 6);
        assert_eq!(a.half_edge_count(), 2 * (5 + 6));
        assert_eq!(a.face_count(), 2 + 2);
        assert_eq!(a.invalid_count(), 0);
        assert_eq!(a.boundary_loops().len(), 3);
        let singular: Vec<_> = a
            .vertex_keys()
            .iter()
            .copied()
            .filter(|&v| a.is_singular_vertex(v))
            .collect();
        assert_eq!(singular.len(), 1);
        assert_eq!(a.valence(singular[0]), 4);
        assert!(a.is_valid());
    }

    #[test]
    fn test_delete_isolated_vertices() {
        let mut mesh: Mesh = Mesh::new();
        let v: Vec<_> = (0..4).map(|_| mesh.add_vertex()).collect();
        mesh.add_face(&v[..3]).unwrap();

        assert_eq!(mesh.delete_isolated_vertices(), 1);
        assert!(!mesh.is_valid_vertex(v[3]));
        assert_eq!(mesh.vertex_count(), 3);
    }
}
