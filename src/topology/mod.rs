// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Half-edge mesh topology
//!
//! Each undirected edge is a pair of twin half-edges. A half-edge points at
//! its destination vertex, the next and previous arcs of its loop, its edge
//! and, unless it lies on the boundary, its face. Every operation either
//! completes and leaves the mesh well formed, or returns an error without
//! touching it.

mod add_face;
mod arena;
mod circulators;
mod collapse;
mod connect;
pub mod entity;
mod invariants;
pub mod keys;
mod navigate;
mod registry;
mod remove;

pub use circulators::{HalfEdgeWalk, Step, VertexWalk};
pub use entity::{Edge, Face, Factory, HalfEdge, Kinds, Plain, Vertex};
pub use invariants::{InvariantViolation, MeshStats};
pub use keys::{EdgeKey, FaceKey, HalfEdgeKey, VertexKey};
pub use registry::Mesh;
pub use remove::RemovedFace;
