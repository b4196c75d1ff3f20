// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Signed container for topology blobs on disk
//!
//! ```text
//! magic    "PTOP"
//! version  u32
//! lengths  u32 topology, u32 payload (0 when absent)
//! digest   SHA-256 over topology then payload
//! body     topology blob, then payload JSON
//! ```

use super::codec::{self, DecodedRange};
use crate::topology::{Kinds, Mesh};
use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;
use thiserror::Error;

pub const MAGIC: [u8; 4] = *b"PTOP";
pub const VERSION: u32 = 1;

const HEADER_LEN: usize = 4 + 4 + 4 + 4 + 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("not a polytopo file")]
    BadMagic,
    #[error("unsupported format version {0}")]
    UnsupportedVersion(u32),
    #[error("file is truncated")]
    Truncated,
    #[error("checksum mismatch")]
    DigestMismatch,
}

/// Sections of a parsed envelope, borrowed from the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<'a> {
    pub topology: &'a [u8],
    pub payload: Option<&'a [u8]>,
}

/// Per-entity payloads, each table in blob order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadTable<V, H, E, F> {
    pub vertices: Vec<V>,
    pub half_edges: Vec<H>,
    pub edges: Vec<E>,
    pub faces: Vec<F>,
}

fn digest(topology: &[u8], payload: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(topology);
    hasher.update(payload);
    hasher.finalize().into()
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

/// Wrap a topology blob and optional payload section
pub fn write_envelope(topology: &[u8], payload: Option<&[u8]>) -> Vec<u8> {
    let payload = payload.unwrap_or_default();
    let mut out = Vec::with_capacity(HEADER_LEN + topology.len() + payload.len());
    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&(topology.len() as u32).to_le_bytes());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(&digest(topology, payload));
    out.extend_from_slice(topology);
    out.extend_from_slice(payload);
    out
}

/// Parse and verify an envelope
pub fn read_envelope(bytes: &[u8]) -> std::result::Result<Envelope<'_>, EnvelopeError> {
    if bytes.len() < 4 || bytes[..4] != MAGIC {
        return Err(EnvelopeError::BadMagic);
    }
    if bytes.len() < HEADER_LEN {
        return Err(EnvelopeError::Truncated);
    }
    let version = read_u32(bytes, 4);
    if version != VERSION {
        return Err(EnvelopeError::UnsupportedVersion(version));
    }
    let topology_len = read_u32(bytes, 8) as usize;
    let payload_len = read_u32(bytes, 12) as usize;

    let body = &bytes[HEADER_LEN..];
    if body.len() < topology_len + payload_len {
        return Err(EnvelopeError::Truncated);
    }
    let topology = &body[..topology_len];
    let payload = &body[topology_len..topology_len + payload_len];
    if digest(topology, payload)[..] != bytes[16..HEADER_LEN] {
        return Err(EnvelopeError::DigestMismatch);
    }

    Ok(Envelope {
        topology,
        payload: (payload_len > 0).then_some(payload),
    })
}

/// Encode connectivity and every payload
pub fn encode<K: Kinds>(mesh: &Mesh<K>) -> Result<Vec<u8>>
where
    K::Vertex: Serialize,
    K::HalfEdge: Serialize,
    K::Edge: Serialize,
    K::Face: Serialize,
{
    let table = PayloadTable {
        vertices: mesh.vertex_keys().iter().map(|&v| &mesh.vertices[v].data).collect::<Vec<_>>(),
        half_edges: mesh
            .half_edge_keys()
            .iter()
            .map(|&h| &mesh.half_edges[h].data)
            .collect::<Vec<_>>(),
        edges: mesh.edge_keys().iter().map(|&e| &mesh.edges[e].data).collect::<Vec<_>>(),
        faces: mesh.face_keys().iter().map(|&f| &mesh.faces[f].data).collect::<Vec<_>>(),
    };
    let payload = serde_json::to_vec(&table).context("Failed to serialize payload table")?;
    Ok(write_envelope(&codec::serialize(mesh), Some(&payload)))
}

/// Encode connectivity alone
pub fn encode_topology<K: Kinds>(mesh: &Mesh<K>) -> Vec<u8> {
    write_envelope(&codec::serialize(mesh), None)
}

/// Decode an envelope, restoring payloads when the file carries them
pub fn decode<K: Kinds>(bytes: &[u8]) -> Result<Mesh<K>>
where
    K::Vertex: DeserializeOwned,
    K::HalfEdge: DeserializeOwned,
    K::Edge: DeserializeOwned,
    K::Face: DeserializeOwned,
{
    let envelope = read_envelope(bytes)?;
    let mut mesh = Mesh::new();
    let range = codec::deserialize_into(&mut mesh, envelope.topology)?;

    if let Some(payload) = envelope.payload {
        let table: PayloadTable<K::Vertex, K::HalfEdge, K::Edge, K::Face> =
            serde_json::from_slice(payload).context("Failed to parse payload table")?;
        attach_payloads(&mut mesh, &range, table)?;
    }
    Ok(mesh)
}

/// Decode connectivity, ignoring any payload section
pub fn decode_topology<K: Kinds>(bytes: &[u8]) -> Result<Mesh<K>> {
    let envelope = read_envelope(bytes)?;
    Ok(codec::deserialize(envelope.topology)?)
}

fn attach_payloads<K: Kinds>(
    mesh: &mut Mesh<K>,
    range: &DecodedRange,
    table: PayloadTable<K::Vertex, K::HalfEdge, K::Edge, K::Face>,
) -> Result<()> {
    if table.vertices.len() != range.vertices.len()
        || table.half_edges.len() != range.half_edges.len()
        || table.edges.len() != range.edges.len()
        || table.faces.len() != range.faces.len()
    {
        bail!("payload table does not match topology counts");
    }
    for (data, &v) in table.vertices.into_iter().zip(&range.vertices) {
        mesh.vertices[v].data = data;
    }
    for (data, &h) in table.half_edges.into_iter().zip(&range.half_edges) {
        mesh.half_edges[h].data = data;
    }
    for (data, &e) in table.edges.into_iter().zip(&range.edges) {
        mesh.edges[e].data = data;
    }
    for (data, &f) in table.faces.into_iter().zip(&range.faces) {
        mesh.faces[f].data = data;
    }
    Ok(())
}

/// Write a mesh with its payloads to `path`
pub fn save<K: Kinds>(mesh: &Mesh<K>, path: impl AsRef<Path>) -> Result<()>
where
    K::Vertex: Serialize,
    K::HalfEdge: Serialize,
    K::Edge: Serialize,
    K::Face: Serialize,
{
    let bytes = encode(mesh)?;
    std::fs::write(path.as_ref(), bytes)
        .with_context(|| format!("Failed to write mesh file: {:?}", path.as_ref()))
}

/// Read a mesh with its payloads from `path`
pub fn load<K: Kinds>(path: impl AsRef<Path>) -> Result<Mesh<K>>
where
    K::Vertex: DeserializeOwned,
    K::HalfEdge: DeserializeOwned,
    K::Edge: DeserializeOwned,
    K::Face: DeserializeOwned,
{
    let bytes = std::fs::read(path.as_ref())
        .with_context(|| format!("Failed to read mesh file: {:?}", path.as_ref()))?;
    decode(&bytes).with_context(|| format!("Failed to decode mesh file: {:?}", path.as_ref()))
}

/// Read only the connectivity stored in `path`
pub fn load_topology<K: Kinds>(path: impl AsRef<Path>) -> Result<Mesh<K>> {
    let bytes = std::fs::read(path.as_ref())
        .with_context(|| format!("Failed to read mesh file: {:?}", path.as_ref()))?;
    decode_topology(&bytes)
        .with_context(|| format!("Failed to decode mesh file: {:?}", path.as_ref()))
}
