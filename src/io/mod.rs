// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! I/O module - binary codec and on-disk envelope

pub mod codec;
pub mod envelope;

pub use codec::{deserialize, deserialize_into, serialize, DecodedRange};
pub use envelope::{
    decode, decode_topology, encode, encode_topology, load, load_topology, read_envelope, save,
    write_envelope, Envelope, EnvelopeError, PayloadTable,
};
