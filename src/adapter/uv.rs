// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Textured polygon mesh: positions, per-corner UVs, smoothing groups

use super::geometry::{NormalCache, Positioned};
use crate::error::TopologyResult;
use crate::topology::{EdgeKey, FaceKey, Kinds, Mesh, VertexKey};
use nalgebra::{Point2, Point3, Vector3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UvVertex {
    pub position: Point3<f64>,
}

impl Default for UvVertex {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
        }
    }
}

impl Positioned for UvVertex {
    fn position(&self) -> Point3<f64> {
        self.position
    }

    fn set_position(&mut self, position: Point3<f64>) {
        self.position = position;
    }
}

/// Texture coordinate of the corner a half-edge points into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corner {
    pub uv: Point2<f64>,
}

impl Default for Corner {
    fn default() -> Self {
        Self {
            uv: Point2::origin(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UvFace {
    /// Bit set; faces sharing any bit are shaded smooth across their edge
    pub smoothing_groups: u32,
    pub material: u32,
    #[serde(skip)]
    pub normal: Option<Vector3<f64>>,
}

impl NormalCache for UvFace {
    fn cached_normal(&self) -> Option<Vector3<f64>> {
        self.normal
    }

    fn set_cached_normal(&mut self, normal: Option<Vector3<f64>>) {
        self.normal = normal;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UvKinds;

impl Kinds for UvKinds {
    type Vertex = UvVertex;
    type HalfEdge = Corner;
    type Edge = ();
    type Face = UvFace;
}

pub type UvMesh = Mesh<UvKinds>;

impl Mesh<UvKinds> {
    /// Flat `rows` x `cols` grid of unit quads in the XY plane, UVs spanning [0, 1]
    pub fn grid(rows: usize, cols: usize) -> TopologyResult<Self> {
        let mut mesh = Self::with_capacity((rows + 1) * (cols + 1), rows * cols);
        let mut points = Vec::with_capacity((rows + 1) * (cols + 1));
        for r in 0..=rows {
            for c in 0..=cols {
                points.push(mesh.add_point(Point3::new(c as f64, r as f64, 0.0)));
            }
        }

        let uv = |r: usize, c: usize| {
            Point2::new(c as f64 / cols.max(1) as f64, r as f64 / rows.max(1) as f64)
        };
        let at = |r: usize, c: usize| points[r * (cols + 1) + c];
        for r in 0..rows {
            for c in 0..cols {
                let corners = [
                    (at(r, c), uv(r, c)),
                    (at(r, c + 1), uv(r, c + 1)),
                    (at(r + 1, c + 1), uv(r + 1, c + 1)),
                    (at(r + 1, c), uv(r + 1, c)),
                ];
                mesh.add_uv_face(&corners, 1, 0)?;
            }
        }
        Ok(mesh)
    }

    pub fn add_point(&mut self, position: Point3<f64>) -> VertexKey {
        self.add_vertex_with(UvVertex { position })
    }

    /// Add a face whose corners carry their own texture coordinates
    pub fn add_uv_face(
        &mut self,
        corners: &[(VertexKey, Point2<f64>)],
        smoothing_groups: u32,
        material: u32,
    ) -> TopologyResult<FaceKey> {
        let keys: Vec<VertexKey> = corners.iter().map(|&(v, _)| v).collect();
        let face = UvFace {
            smoothing_groups,
            material,
            normal: None,
        };
        let f = self.add_face_with(&keys, face)?;

        let arcs: Vec<_> = self.face_half_edges(f).collect();
        for h in arcs {
            let dest = self.dest_of(h);
            if let Some(&(_, uv)) = corners.iter().find(|&&(v, _)| v == dest) {
                self.half_edges[h].data.uv = uv;
            }
        }
        Ok(f)
    }

    /// Texture coordinate of `v` as seen from face `f`
    pub fn corner_uv(&self, f: FaceKey, v: VertexKey) -> Option<Point2<f64>> {
        self.face_half_edges(f)
            .find(|&h| self.dest_of(h) == v)
            .map(|h| self.half_edges[h].data.uv)
    }

    /// True when both faces of `e` exist and share a smoothing group
    pub fn smoothing_groups_share(&self, e: EdgeKey) -> bool {
        let Some(h) = self.edge_half_edge(e) else {
            return false;
        };
        let groups = |f: Option<FaceKey>| f.map(|f| self.faces[f].data.smoothing_groups);
        match (groups(self.face_of(h)), self.twin(h).and_then(|t| groups(self.face_of(t)))) {
            (Some(a), Some(b)) => a & b != 0,
            _ => false,
        }
    }

    /// UV seam: an interior edge whose endpoints differ in UV across it
    pub fn is_uv_seam(&self, e: EdgeKey) -> bool {
        let Some(h) = self.edge_half_edge(e) else {
            return false;
        };
        let t = self.twin_of(h);
        let (Some(left), Some(right)) = (self.face_of(h), self.face_of(t)) else {
            return false;
        };
        let (a, b) = (self.origin_of(h), self.dest_of(h));
        self.corner_uv(left, a) != self.corner_uv(right, a)
            || self.corner_uv(left, b) != self.corner_uv(right, b)
    }
}
