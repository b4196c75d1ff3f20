// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Polytopo half-edge mesh engine
//!
//! An editable polygon mesh stored as half-edges. Faces can be added,
//! removed, merged, split and collapsed while the connectivity stays
//! consistent, including meshes with boundaries and non-manifold vertices.
//! Topology round-trips through a compact binary blob, and payloads for
//! each entity kind are chosen per mesh through [`Kinds`].

pub mod adapter;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod topology;

pub use adapter::{
    EdgeRef, FaceRef, HalfEdgeRef, SkinMesh, UvMesh, VertexRef,
};
pub use config::CheckConfig;
pub use error::{TopologyError, TopologyResult};
pub use topology::{
    EdgeKey, FaceKey, HalfEdgeKey, InvariantViolation, Kinds, Mesh, MeshStats, Plain,
    RemovedFace, VertexKey,
};
