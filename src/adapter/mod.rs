// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Typed access to mesh entities
//!
//! Views pair a key with the mesh it lives in, so navigation returns the
//! next typed entity directly and `data()` hands back the payload the
//! mesh's [`Kinds`] picked for that entity kind.

mod geometry;
pub mod skin;
pub mod uv;

pub use geometry::{NormalCache, Positioned};
pub use skin::{BoneWeight, SkinKinds, SkinMesh, SkinVertex, MAX_INFLUENCES};
pub use uv::{Corner, UvFace, UvKinds, UvMesh, UvVertex};

use crate::topology::{EdgeKey, FaceKey, HalfEdgeKey, Kinds, Mesh, VertexKey};

/// A vertex together with its mesh
pub struct VertexRef<'a, K: Kinds> {
    mesh: &'a Mesh<K>,
    key: VertexKey,
}

/// A half-edge together with its mesh
pub struct HalfEdgeRef<'a, K: Kinds> {
    mesh: &'a Mesh<K>,
    key: HalfEdgeKey,
}

/// An edge together with its mesh
pub struct EdgeRef<'a, K: Kinds> {
    mesh: &'a Mesh<K>,
    key: EdgeKey,
}

/// A face together with its mesh
pub struct FaceRef<'a, K: Kinds> {
    mesh: &'a Mesh<K>,
    key: FaceKey,
}

macro_rules! view_common {
    ($view:ident, $key:ty) => {
        impl<'a, K: Kinds> $view<'a, K> {
            pub fn key(&self) -> $key {
                self.key
            }

            pub fn mesh(&self) -> &'a Mesh<K> {
                self.mesh
            }
        }

        impl<K: Kinds> Clone for $view<'_, K> {
            fn clone(&self) -> Self {
                *self
            }
        }

        impl<K: Kinds> Copy for $view<'_, K> {}

        impl<K: Kinds> PartialEq for $view<'_, K> {
            fn eq(&self, other: &Self) -> bool {
                self.key == other.key && std::ptr::eq(self.mesh, other.mesh)
            }
        }

        impl<K: Kinds> std::fmt::Debug for $view<'_, K> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_tuple(stringify!($view)).field(&self.key).finish()
            }
        }
    };
}

view_common!(VertexRef, VertexKey);
view_common!(HalfEdgeRef, HalfEdgeKey);
view_common!(EdgeRef, EdgeKey);
view_common!(FaceRef, FaceKey);

impl<'a, K: Kinds> VertexRef<'a, K> {
    pub fn data(&self) -> &'a K::Vertex {
        &self.mesh.vertices[self.key].data
    }

    /// Stored outgoing half-edge, `None` when isolated
    pub fn half_edge(&self) -> Option<HalfEdgeRef<'a, K>> {
        self.mesh.vertex_half_edge(self.key).and_then(|h| self.mesh.half_edge(h))
    }

    pub fn outgoing(&self) -> impl Iterator<Item = HalfEdgeRef<'a, K>> + 'a {
        let mesh = self.mesh;
        mesh.outgoing(self.key).map(move |key| HalfEdgeRef { mesh, key })
    }

    pub fn neighbours(&self) -> impl Iterator<Item = VertexRef<'a, K>> + 'a {
        let mesh = self.mesh;
        mesh.vertex_vertices(self.key).map(move |key| VertexRef { mesh, key })
    }

    pub fn faces(&self) -> impl Iterator<Item = FaceRef<'a, K>> + 'a {
        let mesh = self.mesh;
        mesh.vertex_faces(self.key).map(move |key| FaceRef { mesh, key })
    }

    pub fn valence(&self) -> usize {
        self.mesh.valence(self.key)
    }

    pub fn is_boundary(&self) -> bool {
        self.mesh.is_boundary_vertex(self.key)
    }
}

impl<'a, K: Kinds> HalfEdgeRef<'a, K> {
    fn record(&self) -> &'a crate::topology::HalfEdge<K::HalfEdge> {
        &self.mesh.half_edges[self.key]
    }

    pub fn data(&self) -> &'a K::HalfEdge {
        &self.record().data
    }

    pub fn twin(&self) -> HalfEdgeRef<'a, K> {
        HalfEdgeRef {
            mesh: self.mesh,
            key: self.record().twin,
        }
    }

    pub fn next(&self) -> HalfEdgeRef<'a, K> {
        HalfEdgeRef {
            mesh: self.mesh,
            key: self.record().next,
        }
    }

    pub fn prev(&self) -> HalfEdgeRef<'a, K> {
        HalfEdgeRef {
            mesh: self.mesh,
            key: self.record().prev,
        }
    }

    /// Vertex the arc points at
    pub fn dest(&self) -> VertexRef<'a, K> {
        VertexRef {
            mesh: self.mesh,
            key: self.record().vert,
        }
    }

    pub fn origin(&self) -> VertexRef<'a, K> {
        self.twin().dest()
    }

    pub fn edge(&self) -> EdgeRef<'a, K> {
        EdgeRef {
            mesh: self.mesh,
            key: self.record().edge,
        }
    }

    /// Owning face, `None` on the boundary
    pub fn face(&self) -> Option<FaceRef<'a, K>> {
        let mesh = self.mesh;
        self.record().face.map(|key| FaceRef { mesh, key })
    }

    pub fn is_boundary(&self) -> bool {
        self.record().face.is_none()
    }
}

impl<'a, K: Kinds> EdgeRef<'a, K> {
    pub fn data(&self) -> &'a K::Edge {
        &self.mesh.edges[self.key].data
    }

    pub fn half_edge(&self) -> HalfEdgeRef<'a, K> {
        HalfEdgeRef {
            mesh: self.mesh,
            key: self.mesh.edges[self.key].half_edge,
        }
    }

    pub fn vertices(&self) -> (VertexRef<'a, K>, VertexRef<'a, K>) {
        let h = self.half_edge();
        (h.origin(), h.dest())
    }

    /// Faces on the stored side and on the twin side
    pub fn faces(&self) -> (Option<FaceRef<'a, K>>, Option<FaceRef<'a, K>>) {
        let h = self.half_edge();
        (h.face(), h.twin().face())
    }

    pub fn is_boundary(&self) -> bool {
        self.mesh.is_boundary_edge(self.key)
    }
}

impl<'a, K: Kinds> FaceRef<'a, K> {
    pub fn data(&self) -> &'a K::Face {
        &self.mesh.faces[self.key].data
    }

    pub fn half_edge(&self) -> HalfEdgeRef<'a, K> {
        HalfEdgeRef {
            mesh: self.mesh,
            key: self.mesh.faces[self.key].half_edge,
        }
    }

    pub fn half_edges(&self) -> impl Iterator<Item = HalfEdgeRef<'a, K>> + 'a {
        let mesh = self.mesh;
        mesh.face_half_edges(self.key).map(move |key| HalfEdgeRef { mesh, key })
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexRef<'a, K>> + 'a {
        let mesh = self.mesh;
        mesh.face_vertices(self.key).map(move |key| VertexRef { mesh, key })
    }

    pub fn degree(&self) -> usize {
        self.mesh.face_degree(self.key)
    }
}

impl<K: Kinds> Mesh<K> {
    /// Typed view of a live vertex
    pub fn vertex(&self, key: VertexKey) -> Option<VertexRef<'_, K>> {
        self.is_valid_vertex(key).then_some(VertexRef { mesh: self, key })
    }

    pub fn half_edge(&self, key: HalfEdgeKey) -> Option<HalfEdgeRef<'_, K>> {
        self.is_valid_half_edge(key).then_some(HalfEdgeRef { mesh: self, key })
    }

    pub fn edge(&self, key: EdgeKey) -> Option<EdgeRef<'_, K>> {
        self.is_valid_edge(key).then_some(EdgeRef { mesh: self, key })
    }

    pub fn face(&self, key: FaceKey) -> Option<FaceRef<'_, K>> {
        self.is_valid_face(key).then_some(FaceRef { mesh: self, key })
    }

    /// Views of every live vertex in collection order
    pub fn vertices(&self) -> impl Iterator<Item = VertexRef<'_, K>> + '_ {
        self.vertex_keys().iter().map(move |&key| VertexRef { mesh: self, key })
    }

    pub fn edges(&self) -> impl Iterator<Item = EdgeRef<'_, K>> + '_ {
        self.edge_keys().iter().map(move |&key| EdgeRef { mesh: self, key })
    }

    pub fn faces(&self) -> impl Iterator<Item = FaceRef<'_, K>> + '_ {
        self.face_keys().iter().map(move |&key| FaceRef { mesh: self, key })
    }

    pub fn vertex_data_mut(&mut self, key: VertexKey) -> Option<&mut K::Vertex> {
        self.vertices.get_mut(key).map(|v| &mut v.data)
    }

    pub fn half_edge_data_mut(&mut self, key: HalfEdgeKey) -> Option<&mut K::HalfEdge> {
        self.half_edges.get_mut(key).map(|h| &mut h.data)
    }

    pub fn edge_data_mut(&mut self, key: EdgeKey) -> Option<&mut K::Edge> {
        self.edges.get_mut(key).map(|e| &mut e.data)
    }

    pub fn face_data_mut(&mut self, key: FaceKey) -> Option<&mut K::Face> {
        self.faces.get_mut(key).map(|f| &mut f.data)
    }
}
