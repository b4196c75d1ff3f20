// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Generation-checked handles for mesh entities
//!
//! A key stays comparable after its entity is reclaimed; looking it up
//! afterwards simply fails instead of reading reused memory.

use slotmap::new_key_type;

new_key_type! {
    /// Handle to a vertex
    pub struct VertexKey;
}

new_key_type! {
    /// Handle to one directed arc of an edge
    pub struct HalfEdgeKey;
}

new_key_type! {
    /// Handle to an undirected edge (a twin pair of half-edges)
    pub struct EdgeKey;
}

new_key_type! {
    /// Handle to a polygon
    pub struct FaceKey;
}
