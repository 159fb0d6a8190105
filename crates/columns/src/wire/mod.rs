// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! MessagePack framing for scalars and composites.
//!
//! The byte-level codec is `rmp`'s low-level API. This module adapts it to the
//! engine: bounds-checked cursors over caller buffers, the [`Scalar`] value
//! model and a single [`WireError`] type. Only integers, floats, booleans and
//! array headers are driven; every other value is reported by its [`Shape`].

pub mod reader;
pub mod writer;

pub use reader::WireReader;
pub use writer::WireWriter;

use rmp::Marker;
use std::fmt;

/// One wire scalar as read or written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Int(i64),
    UInt(u64),
    F32(f32),
    F64(f64),
    Bool(bool),
}

impl Scalar {
    /// Two's-complement bit pattern, ready to be truncated to a narrower width.
    ///
    /// Floats go through a saturating integer cast.
    pub fn to_bits64(self) -> u64 {
        match self {
            Self::Int(v) => v as u64,
            Self::UInt(v) => v,
            Self::F32(v) => float_to_bits64(f64::from(v)),
            Self::F64(v) => float_to_bits64(v),
            Self::Bool(v) => u64::from(v),
        }
    }

    pub fn to_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::UInt(v) => v as f64,
            Self::F32(v) => f64::from(v),
            Self::F64(v) => v,
            Self::Bool(v) => u8::from(v).into(),
        }
    }

    /// Narrowing to `f32` keeps the exact bits when the wire value already is one.
    pub fn to_f32(self) -> f32 {
        match self {
            Self::F32(v) => v,
            other => other.to_f64() as f32,
        }
    }

    pub fn is_truthy(self) -> bool {
        match self {
            Self::Int(v) => v != 0,
            Self::UInt(v) => v != 0,
            Self::F32(v) => v != 0.0,
            Self::F64(v) => v != 0.0,
            Self::Bool(v) => v,
        }
    }
}

fn float_to_bits64(v: f64) -> u64 {
    if v < 0.0 {
        v as i64 as u64
    } else {
        v as u64
    }
}

/// Coarse category of a wire value, used in mismatch reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Composite,
    Scalar,
    Nil,
    Str,
    Bin,
    Map,
    Ext,
}

impl Shape {
    pub(crate) fn of_marker(m: Marker) -> Self {
        match m {
            Marker::FixPos(_)
            | Marker::FixNeg(_)
            | Marker::True
            | Marker::False
            | Marker::U8
            | Marker::U16
            | Marker::U32
            | Marker::U64
            | Marker::I8
            | Marker::I16
            | Marker::I32
            | Marker::I64
            | Marker::F32
            | Marker::F64 => Self::Scalar,
            Marker::FixArray(_) | Marker::Array16 | Marker::Array32 => Self::Composite,
            Marker::FixMap(_) | Marker::Map16 | Marker::Map32 => Self::Map,
            Marker::FixStr(_) | Marker::Str8 | Marker::Str16 | Marker::Str32 => Self::Str,
            Marker::Bin8 | Marker::Bin16 | Marker::Bin32 => Self::Bin,
            Marker::FixExt1
            | Marker::FixExt2
            | Marker::FixExt4
            | Marker::FixExt8
            | Marker::FixExt16
            | Marker::Ext8
            | Marker::Ext16
            | Marker::Ext32 => Self::Ext,
            Marker::Null | Marker::Reserved => Self::Nil,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Composite => "composite",
            Self::Scalar => "scalar",
            Self::Nil => "nil",
            Self::Str => "string",
            Self::Bin => "binary",
            Self::Map => "map",
            Self::Ext => "extension",
        };
        f.write_str(name)
    }
}

/// Framing-level failures.
#[derive(Debug, Clone, PartialEq)]
pub enum WireError {
    /// Output buffer cannot hold the next value.
    BufferExhausted { need: usize, have: usize },
    /// Input ended inside a value.
    Truncated { offset: usize },
    /// Marker byte that MessagePack never emits.
    Malformed { offset: usize, marker: u8 },
    /// Well-formed value of the wrong category.
    UnexpectedShape { offset: usize, found: Shape },
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferExhausted { need, have } => {
                write!(f, "buffer exhausted: need {} bytes, have {}", need, have)
            }
            Self::Truncated { offset } => write!(f, "input truncated at offset {}", offset),
            Self::Malformed { offset, marker } => {
                write!(f, "malformed marker 0x{:02x} at offset {}", marker, offset)
            }
            Self::UnexpectedShape { offset, found } => {
                write!(f, "unexpected {} at offset {}", found, offset)
            }
        }
    }
}

impl std::error::Error for WireError {}

pub type WireResult<T> = core::result::Result<T, WireError>;
