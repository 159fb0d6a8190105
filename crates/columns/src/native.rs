// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Host-order scalar access into caller-owned memory blocks.
//!
//! Every access is checked against the block length; nothing here touches
//! memory outside the slice it is given.

use crate::schema::WidthClass;
use crate::transcode::TranscodeError;
use crate::wire::Scalar;

fn span(size: usize, at: usize, len: usize) -> Result<core::ops::Range<usize>, TranscodeError> {
    match at.checked_add(len) {
        Some(end) if end <= size => Ok(at..end),
        _ => Err(TranscodeError::NativeOutOfBounds {
            offset: at,
            len,
            size,
        }),
    }
}

fn load<const N: usize>(block: &[u8], at: usize) -> Result<[u8; N], TranscodeError> {
    let range = span(block.len(), at, N)?;
    let mut raw = [0u8; N];
    raw.copy_from_slice(&block[range]);
    Ok(raw)
}

fn store(block: &mut [u8], at: usize, bytes: &[u8]) -> Result<(), TranscodeError> {
    let range = span(block.len(), at, bytes.len())?;
    block[range].copy_from_slice(bytes);
    Ok(())
}

/// Read one scalar of `width` at `at`.
pub(crate) fn read(block: &[u8], at: usize, width: WidthClass) -> Result<Scalar, TranscodeError> {
    let scalar = match width {
        WidthClass::Int8 => Scalar::Int(i8::from_ne_bytes(load(block, at)?).into()),
        WidthClass::Int16 => Scalar::Int(i16::from_ne_bytes(load(block, at)?).into()),
        WidthClass::Int32 => Scalar::Int(i32::from_ne_bytes(load(block, at)?).into()),
        WidthClass::Int64 => Scalar::Int(i64::from_ne_bytes(load(block, at)?)),
        WidthClass::UInt8 => Scalar::UInt(u8::from_ne_bytes(load(block, at)?).into()),
        WidthClass::UInt16 => Scalar::UInt(u16::from_ne_bytes(load(block, at)?).into()),
        WidthClass::UInt32 => Scalar::UInt(u32::from_ne_bytes(load(block, at)?).into()),
        WidthClass::UInt64 => Scalar::UInt(u64::from_ne_bytes(load(block, at)?)),
        WidthClass::Float32 => Scalar::F32(f32::from_ne_bytes(load(block, at)?)),
        WidthClass::Float64 => Scalar::F64(f64::from_ne_bytes(load(block, at)?)),
        WidthClass::Bool => Scalar::Bool(load::<1>(block, at)?[0] != 0),
        reserved => return Err(TranscodeError::UnsupportedWidthClass(reserved)),
    };
    Ok(scalar)
}

/// Store `value` as `width` at `at`, truncating integers like a C assignment.
pub(crate) fn write(
    block: &mut [u8],
    at: usize,
    width: WidthClass,
    value: Scalar,
) -> Result<(), TranscodeError> {
    let bits = value.to_bits64();
    match width {
        WidthClass::Int8 => store(block, at, &(bits as i8).to_ne_bytes()),
        WidthClass::Int16 => store(block, at, &(bits as i16).to_ne_bytes()),
        WidthClass::Int32 => store(block, at, &(bits as i32).to_ne_bytes()),
        WidthClass::Int64 => store(block, at, &(bits as i64).to_ne_bytes()),
        WidthClass::UInt8 => store(block, at, &(bits as u8).to_ne_bytes()),
        WidthClass::UInt16 => store(block, at, &(bits as u16).to_ne_bytes()),
        WidthClass::UInt32 => store(block, at, &(bits as u32).to_ne_bytes()),
        WidthClass::UInt64 => store(block, at, &bits.to_ne_bytes()),
        WidthClass::Float32 => store(block, at, &value.to_f32().to_ne_bytes()),
        WidthClass::Float64 => store(block, at, &value.to_f64().to_ne_bytes()),
        WidthClass::Bool => store(block, at, &[u8::from(value.is_truthy())]),
        reserved => Err(TranscodeError::UnsupportedWidthClass(reserved)),
    }
}

/// Element count held by a length field; negative values clamp to zero.
pub(crate) fn read_count(block: &[u8], at: usize, width: WidthClass) -> Result<u64, TranscodeError> {
    match read(block, at, width)? {
        Scalar::Int(v) => Ok(v.max(0) as u64),
        Scalar::UInt(v) => Ok(v),
        // length fields are validated as integers when the table is built
        _ => Err(TranscodeError::UnsupportedWidthClass(width)),
    }
}

pub(crate) fn write_count(
    block: &mut [u8],
    at: usize,
    width: WidthClass,
    count: usize,
) -> Result<(), TranscodeError> {
    write(block, at, width, Scalar::UInt(count as u64))
}
