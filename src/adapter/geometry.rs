// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Geometry helpers for meshes whose vertices carry a position

use crate::topology::{FaceKey, Kinds, Mesh, VertexKey};
use nalgebra::{Point3, Vector3};

/// Vertex payload with a position in space
pub trait Positioned {
    fn position(&self) -> Point3<f64>;
    fn set_position(&mut self, position: Point3<f64>);
}

/// Face payload that caches its normal
pub trait NormalCache {
    fn cached_normal(&self) -> Option<Vector3<f64>>;
    fn set_cached_normal(&mut self, normal: Option<Vector3<f64>>);
}

impl<K: Kinds> Mesh<K>
where
    K::Vertex: Positioned,
{
    pub fn position(&self, v: VertexKey) -> Option<Point3<f64>> {
        self.vertex_entry(v).ok().map(|vertex| vertex.data.position())
    }

    /// Unit normal of a face of any degree (Newell's method)
    ///
    /// `None` for a stale key or a face with no area.
    pub fn face_normal(&self, f: FaceKey) -> Option<Vector3<f64>> {
        if !self.is_valid_face(f) {
            return None;
        }
        let points: Vec<Point3<f64>> = self
            .face_vertices(f)
            .map(|v| self.vertices[v].data.position())
            .collect();

        let mut normal = Vector3::zeros();
        for (i, current) in points.iter().enumerate() {
            let next = &points[(i + 1) % points.len()];
            normal.x += (current.y - next.y) * (current.z + next.z);
            normal.y += (current.z - next.z) * (current.x + next.x);
            normal.z += (current.x - next.x) * (current.y + next.y);
        }
        normal.try_normalize(f64::EPSILON)
    }

    /// Average of the face's corner positions
    pub fn face_centroid(&self, f: FaceKey) -> Option<Point3<f64>> {
        if !self.is_valid_face(f) {
            return None;
        }
        let mut sum = Vector3::zeros();
        let mut count = 0usize;
        for v in self.face_vertices(f) {
            sum += self.vertices[v].data.position().coords;
            count += 1;
        }
        (count > 0).then(|| Point3::from(sum / count as f64))
    }
}

impl<K: Kinds> Mesh<K>
where
    K::Vertex: Positioned,
    K::Face: NormalCache,
{
    /// Refresh every face's cached normal; returns how many faces have none
    pub fn recompute_face_normals(&mut self) -> usize {
        let normals: Vec<(FaceKey, Option<Vector3<f64>>)> = self
            .face_keys()
            .iter()
            .map(|&f| (f, self.face_normal(f)))
            .collect();

        let mut degenerate = 0;
        for (f, normal) in normals {
            if normal.is_none() {
                degenerate += 1;
            }
            self.faces[f].data.set_cached_normal(normal);
        }
        degenerate
    }
}
