// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Flat binary form of mesh connectivity
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! header   u32 vertices, u32 half-edges, u32 edges, u32 faces
//! vertex   i32 half-edge
//! halfedge i32 twin, next, prev, vertex, edge, face
//! edge     i32 half-edge
//! face     i32 half-edge
//! ```
//!
//! Ids are dense indices into the tables in collection order; `-1` marks
//! an absent optional link. Payloads are not part of the blob.

use crate::error::{TopologyError, TopologyResult};
use crate::topology::{
    Edge, EdgeKey, Face, FaceKey, HalfEdge, HalfEdgeKey, Kinds, Mesh, Vertex, VertexKey,
};
use bytemuck::{Pod, Zeroable};
use slotmap::{Key, SecondaryMap};
use std::mem::size_of;

const NONE: i32 = -1;

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct Header {
    vertices: u32,
    half_edges: u32,
    edges: u32,
    faces: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct VertexRecord {
    half_edge: i32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct HalfEdgeRecord {
    twin: i32,
    next: i32,
    prev: i32,
    vert: i32,
    edge: i32,
    face: i32,
}

/// Edges and faces share the single-link layout
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct LinkRecord {
    half_edge: i32,
}

/// Keys allocated by [`deserialize_into`], in blob order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedRange {
    pub vertices: Vec<VertexKey>,
    pub half_edges: Vec<HalfEdgeKey>,
    pub edges: Vec<EdgeKey>,
    pub faces: Vec<FaceKey>,
}

/// Dense ids for the live keys of one collection
struct Ids<K: Key>(SecondaryMap<K, i32>);

impl<K: Key> Ids<K> {
    fn new(keys: &[K]) -> Self {
        let mut map = SecondaryMap::with_capacity(keys.len());
        for (i, &key) in keys.iter().enumerate() {
            map.insert(key, i as i32);
        }
        Self(map)
    }

    fn of(&self, key: K) -> i32 {
        self.0.get(key).copied().unwrap_or(NONE)
    }

    fn of_opt(&self, key: Option<K>) -> i32 {
        key.map_or(NONE, |k| self.of(k))
    }
}

/// Encode the live connectivity of `mesh`
pub fn serialize<K: Kinds>(mesh: &Mesh<K>) -> Vec<u8> {
    let vertex_ids = Ids::new(mesh.vertex_keys());
    let half_edge_ids = Ids::new(mesh.half_edge_keys());
    let edge_ids = Ids::new(mesh.edge_keys());
    let face_ids = Ids::new(mesh.face_keys());

    let header = Header {
        vertices: (mesh.vertex_count() as u32).to_le(),
        half_edges: (mesh.half_edge_count() as u32).to_le(),
        edges: (mesh.edge_count() as u32).to_le(),
        faces: (mesh.face_count() as u32).to_le(),
    };
    let mut out = Vec::with_capacity(
        size_of::<Header>()
            + mesh.vertex_count() * size_of::<VertexRecord>()
            + mesh.half_edge_count() * size_of::<HalfEdgeRecord>()
            + (mesh.edge_count() + mesh.face_count()) * size_of::<LinkRecord>(),
    );
    out.extend_from_slice(bytemuck::bytes_of(&header));

    for &v in mesh.vertex_keys() {
        let record = VertexRecord {
            half_edge: half_edge_ids.of_opt(mesh.vertex_half_edge(v)).to_le(),
        };
        out.extend_from_slice(bytemuck::bytes_of(&record));
    }
    for &h in mesh.half_edge_keys() {
        let he = &mesh.half_edges[h];
        let record = HalfEdgeRecord {
            twin: half_edge_ids.of(he.twin).to_le(),
            next: half_edge_ids.of(he.next).to_le(),
            prev: half_edge_ids.of(he.prev).to_le(),
            vert: vertex_ids.of(he.vert).to_le(),
            edge: edge_ids.of(he.edge).to_le(),
            face: face_ids.of_opt(he.face).to_le(),
        };
        out.extend_from_slice(bytemuck::bytes_of(&record));
    }
    for &e in mesh.edge_keys() {
        let record = LinkRecord {
            half_edge: half_edge_ids.of(mesh.edges[e].half_edge).to_le(),
        };
        out.extend_from_slice(bytemuck::bytes_of(&record));
    }
    for &f in mesh.face_keys() {
        let record = LinkRecord {
            half_edge: half_edge_ids.of(mesh.faces[f].half_edge).to_le(),
        };
        out.extend_from_slice(bytemuck::bytes_of(&record));
    }

    out
}

/// Sequential reader over the blob
struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn read<T: Pod>(&mut self) -> TopologyResult<T> {
        let end = self.offset + size_of::<T>();
        let chunk = self.bytes.get(self.offset..end).ok_or_else(|| {
            TopologyError::MalformedBlob(format!("truncated at byte {}", self.offset))
        })?;
        self.offset = end;
        Ok(bytemuck::pod_read_unaligned(chunk))
    }

    fn table<T: Pod>(&mut self, count: usize) -> TopologyResult<Vec<T>> {
        (0..count).map(|_| self.read()).collect()
    }
}

/// Resolve a raw id against the keys allocated for its table
fn resolve<K: Key>(raw: i32, keys: &[K], what: &str) -> TopologyResult<K> {
    let id = i32::from_le(raw);
    usize::try_from(id)
        .ok()
        .and_then(|i| keys.get(i).copied())
        .ok_or_else(|| TopologyError::MalformedBlob(format!("{} id {} out of range", what, id)))
}

fn resolve_opt<K: Key>(raw: i32, keys: &[K], what: &str) -> TopologyResult<Option<K>> {
    if i32::from_le(raw) == NONE {
        Ok(None)
    } else {
        resolve(raw, keys, what).map(Some)
    }
}

/// Decode a blob and add its entities to `mesh`
///
/// Entities are created through the mesh's factory and appended after
/// whatever the mesh already holds. The whole blob is validated first; on
/// error the mesh is left as it was.
pub fn deserialize_into<K: Kinds>(mesh: &mut Mesh<K>, bytes: &[u8]) -> TopologyResult<DecodedRange> {
    let mut reader = Reader { bytes, offset: 0 };
    let header: Header = reader.read()?;
    let counts = [
        u32::from_le(header.vertices) as usize,
        u32::from_le(header.half_edges) as usize,
        u32::from_le(header.edges) as usize,
        u32::from_le(header.faces) as usize,
    ];
    let expected = size_of::<Header>()
        + counts[0] * size_of::<VertexRecord>()
        + counts[1] * size_of::<HalfEdgeRecord>()
        + (counts[2] + counts[3]) * size_of::<LinkRecord>();
    if bytes.len() < expected {
        return Err(TopologyError::MalformedBlob(format!(
            "expected {} bytes, found {}",
            expected,
            bytes.len()
        )));
    }

    let vertex_records: Vec<VertexRecord> = reader.table(counts[0])?;
    let half_edge_records: Vec<HalfEdgeRecord> = reader.table(counts[1])?;
    let edge_records: Vec<LinkRecord> = reader.table(counts[2])?;
    let face_records: Vec<LinkRecord> = reader.table(counts[3])?;

    // Check every id against the counts before anything is allocated
    let in_range = |raw: i32, len: usize, optional: bool| {
        let id = i32::from_le(raw);
        (optional && id == NONE) || (id >= 0 && (id as usize) < len)
    };
    let ids_ok = vertex_records
        .iter()
        .all(|r| in_range(r.half_edge, counts[1], true))
        && half_edge_records.iter().all(|r| {
            in_range(r.twin, counts[1], false)
                && in_range(r.next, counts[1], false)
                && in_range(r.prev, counts[1], false)
                && in_range(r.vert, counts[0], false)
                && in_range(r.edge, counts[2], false)
                && in_range(r.face, counts[3], true)
        })
        && edge_records
            .iter()
            .chain(&face_records)
            .all(|r| in_range(r.half_edge, counts[1], false));
    if !ids_ok {
        return Err(TopologyError::MalformedBlob("id out of range".to_string()));
    }

    let factory = *mesh.factory();
    let range = DecodedRange {
        vertices: (0..counts[0])
            .map(|_| mesh.insert_vertex(Vertex::new((factory.vertex)())))
            .collect(),
        half_edges: (0..counts[1])
            .map(|_| mesh.insert_half_edge(HalfEdge::new((factory.half_edge)())))
            .collect(),
        edges: (0..counts[2])
            .map(|_| mesh.insert_edge(Edge::new((factory.edge)())))
            .collect(),
        faces: (0..counts[3])
            .map(|_| mesh.insert_face(Face::new((factory.face)())))
            .collect(),
    };

    for (record, &v) in vertex_records.iter().zip(&range.vertices) {
        mesh.vertices[v].half_edge = resolve_opt(record.half_edge, &range.half_edges, "half-edge")?;
    }
    for (record, &h) in half_edge_records.iter().zip(&range.half_edges) {
        let he = HalfEdge {
            twin: resolve(record.twin, &range.half_edges, "half-edge")?,
            next: resolve(record.next, &range.half_edges, "half-edge")?,
            prev: resolve(record.prev, &range.half_edges, "half-edge")?,
            vert: resolve(record.vert, &range.vertices, "vertex")?,
            edge: resolve(record.edge, &range.edges, "edge")?,
            face: resolve_opt(record.face, &range.faces, "face")?,
            data: (factory.half_edge)(),
        };
        mesh.half_edges[h] = he;
    }
    for (record, &e) in edge_records.iter().zip(&range.edges) {
        mesh.edges[e].half_edge = resolve(record.half_edge, &range.half_edges, "half-edge")?;
    }
    for (record, &f) in face_records.iter().zip(&range.faces) {
        mesh.faces[f].half_edge = resolve(record.half_edge, &range.half_edges, "half-edge")?;
    }

    mesh.restore_groups(&range.vertices, &range.half_edges);

    log::debug!(
        "decoded {} vertices, {} half-edges, {} edges, {} faces",
        counts[0],
        counts[1],
        counts[2],
        counts[3]
    );
    Ok(range)
}

/// Decode a blob into a fresh mesh
pub fn deserialize<K: Kinds>(bytes: &[u8]) -> TopologyResult<Mesh<K>> {
    let mut mesh = Mesh::new();
    deserialize_into(&mut mesh, bytes)?;
    Ok(mesh)
}
