// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Error types for topology operations
//!
//! Every rejected operation returns one of these before touching the mesh,
//! so an `Err` always means "nothing changed".

use thiserror::Error;

/// Result alias used throughout the topology core
pub type TopologyResult<T> = Result<T, TopologyError>;

/// Reasons a topology operation can refuse to run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    /// A key refers to an entity that was reclaimed or never existed
    #[error("stale {kind} handle")]
    StaleHandle { kind: &'static str },

    /// Fewer than three corners, or the same vertex listed twice
    #[error("invalid polygon: {0}")]
    InvalidPolygon(&'static str),

    /// The vertex already has faces all around it
    #[error("complex vertex: no free boundary run at vertex")]
    ComplexVertex,

    /// The directed arc already borders a face; an edge would get a third face
    #[error("complex edge: arc already borders a face")]
    ComplexEdge,

    /// Closing the polygon would swallow a different manifold group
    #[error("another manifold group lies between the reused arcs")]
    GroupBetween,

    /// At least one side of the edge has no face
    #[error("edge lies on the mesh boundary")]
    BoundaryEdge,

    /// Both sides of the edge belong to the same face
    #[error("both sides of the edge belong to the same face")]
    SameFace,

    /// The two faces share every edge of one of them
    #[error("faces share their whole boundary")]
    WholeFace,

    /// The operation would join two vertices that already have a common neighbour
    #[error("operation would create a duplicate edge")]
    DuplicateEdge,

    /// The collapse would leave a degenerate or dangling piece behind
    #[error("degenerate collapse: {0}")]
    DegenerateCollapse(&'static str),

    /// Both endpoints are on the boundary while the edge is interior
    #[error("collapse would pinch two boundary runs together")]
    PinchedBoundary,

    /// The two vertices do not share exactly one face
    #[error("vertices do not share exactly one face")]
    NotConnectable,

    /// The two vertices are already joined by an edge
    #[error("vertices are already connected")]
    AlreadyConnected,

    /// The two vertices cannot be welded
    #[error("vertices cannot be welded: {0}")]
    NotWeldable(&'static str),

    /// The blob is truncated or references ids outside its own counts
    #[error("malformed blob: {0}")]
    MalformedBlob(String),
}

impl TopologyError {
    pub(crate) fn stale(kind: &'static str) -> Self {
        Self::StaleHandle { kind }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TopologyError::stale("vertex").to_string(),
            "stale vertex handle"
        );
        assert_eq!(
            TopologyError::NotWeldable("isolated vertex").to_string(),
            "vertices cannot be welded: isolated vertex"
        );
    }
}
