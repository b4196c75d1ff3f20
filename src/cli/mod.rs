// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI subsystem for the polytopo tool

pub mod inspect;
pub mod reporter;

pub use inspect::{inspect_file, Inspection};
pub use reporter::Reporter;
