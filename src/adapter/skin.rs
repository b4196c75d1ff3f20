// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Skinned mesh: vertices carry bone influences

use super::geometry::Positioned;
use crate::topology::{Kinds, Mesh, VertexKey};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

pub const MAX_INFLUENCES: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoneWeight {
    pub bone: u16,
    pub weight: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinVertex {
    pub position: Point3<f64>,
    pub weights: [BoneWeight; MAX_INFLUENCES],
}

impl Default for SkinVertex {
    fn default() -> Self {
        Self {
            position: Point3::origin(),
            weights: [BoneWeight::default(); MAX_INFLUENCES],
        }
    }
}

impl SkinVertex {
    /// Keep the strongest influences and scale them to sum to one
    ///
    /// With no positive weight the vertex stays unbound (all zero).
    pub fn new(position: Point3<f64>, influences: &[BoneWeight]) -> Self {
        let mut sorted: Vec<BoneWeight> = influences
            .iter()
            .copied()
            .filter(|w| w.weight > 0.0)
            .collect();
        sorted.sort_by(|a, b| b.weight.total_cmp(&a.weight));
        sorted.truncate(MAX_INFLUENCES);

        let total: f32 = sorted.iter().map(|w| w.weight).sum();
        let mut weights = [BoneWeight::default(); MAX_INFLUENCES];
        if total > 0.0 {
            for (slot, w) in weights.iter_mut().zip(&sorted) {
                *slot = BoneWeight {
                    bone: w.bone,
                    weight: w.weight / total,
                };
            }
        }
        Self { position, weights }
    }

    /// Bone with the largest weight
    pub fn dominant_bone(&self) -> Option<u16> {
        self.weights
            .iter()
            .filter(|w| w.weight > 0.0)
            .max_by(|a, b| a.weight.total_cmp(&b.weight))
            .map(|w| w.bone)
    }
}

impl Positioned for SkinVertex {
    fn position(&self) -> Point3<f64> {
        self.position
    }

    fn set_position(&mut self, position: Point3<f64>) {
        self.position = position;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkinKinds;

impl Kinds for SkinKinds {
    type Vertex = SkinVertex;
    type HalfEdge = ();
    type Edge = ();
    type Face = ();
}

pub type SkinMesh = Mesh<SkinKinds>;

impl Mesh<SkinKinds> {
    pub fn add_skinned_vertex(
        &mut self,
        position: Point3<f64>,
        influences: &[BoneWeight],
    ) -> VertexKey {
        self.add_vertex_with(SkinVertex::new(position, influences))
    }

    /// Vertices whose dominant bone is `bone`
    pub fn vertices_bound_to(&self, bone: u16) -> Vec<VertexKey> {
        self.vertex_keys()
            .iter()
            .copied()
            .filter(|&v| self.vertices[v].data.dominant_bone() == Some(bone))
            .collect()
    }
}
