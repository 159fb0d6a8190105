// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # columns - reflective schemas for plain C data
//!
//! Describes the memory layout of C structs and unions as ordered column
//! tables, and transcodes native values laid out that way to and from a
//! compact MessagePack wire value without per-type marshalling code.
//!
//! ## Quick Start
//!
//! ```rust
//! use columns::{decode, encode, ObjectBuilder, WidthClass};
//!
//! // struct Sample { uint32_t id; uint8_t len; uint16_t values[4]; }
//! let sample = ObjectBuilder::new("Sample", 16)
//!     .number("id", 0, WidthClass::UInt32)
//!     .number("len", 4, WidthClass::UInt8)
//!     .flexible_array("values", 6, WidthClass::UInt16, 4)
//!     .build()
//!     .unwrap();
//!
//! let mut native = [0u8; 16];
//! native[0..4].copy_from_slice(&42u32.to_ne_bytes());
//! native[4] = 2;
//! native[6..8].copy_from_slice(&10u16.to_ne_bytes());
//! native[8..10].copy_from_slice(&20u16.to_ne_bytes());
//!
//! let mut wire = [0u8; 64];
//! let written = encode(&sample, &native, &mut wire).unwrap();
//!
//! let mut copy = [0u8; 16];
//! let consumed = decode(&sample, &mut copy, &wire[..written]).unwrap();
//! assert_eq!(consumed, written);
//! assert_eq!(copy, native);
//! ```
//!
//! ## Wire Shape
//!
//! | Column | Wire value |
//! |--------|------------|
//! | `Number` | one scalar (int, float or bool) |
//! | `Object` | composite of the nested table's children |
//! | `Union` | members spliced into the parent composite |
//! | `FixedArray` | composite of exactly `capacity` elements |
//! | `FlexibleArray` | composite of `count` elements, count taken from the preceding column |
//!
//! The schema, not the wire bytes, decides how each position is read.
//!
//! ## Modules Overview
//!
//! - [`schema`] - width classes, columns, tables, objects, registry
//! - [`transcode`] - encode/decode entry points and errors
//! - [`wire`] - MessagePack framing cursors

mod native;
pub mod schema;
pub mod transcode;
pub mod wire;

pub use schema::{
    Column, ColumnKind, ColumnTable, Element, Object, ObjectBuilder, Registry, SchemaError,
    UnionBuilder, WidthClass,
};
pub use transcode::{decode, encode, encode_to_vec, TranscodeError};
pub use wire::{Scalar, WireError};
