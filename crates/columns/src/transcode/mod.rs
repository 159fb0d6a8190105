// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema-driven transcoding between native memory blocks and wire values.
//!
//! Both directions run the same walk ([`walk`]) and differ only in their
//! leaf operations. A failure stops the walk at the failing column: later
//! siblings are not visited and the top-level call returns the error. On a
//! failed decode, columns visited before the failure may already have been
//! written to the destination.

mod decoder;
mod encoder;
mod walk;

use crate::schema::{Object, WidthClass};
use crate::wire::WireError;
use decoder::Decoder;
use encoder::Encoder;
use std::fmt;

/// Errors for encode/decode calls.
#[derive(Debug, Clone, PartialEq)]
pub enum TranscodeError {
    /// Output buffer too small; retry with more space.
    BufferExhausted { need: usize, have: usize },
    /// Wire value disagrees with the schema (arity or scalar vs composite).
    ShapeMismatch { expected: String, found: String },
    /// Input ended inside the top-level value.
    Truncated { offset: usize },
    /// Input contains a byte the framing never produces.
    Malformed { offset: usize, marker: u8 },
    /// Schema references a reserved width class. Schema/engine skew: fatal.
    UnsupportedWidthClass(WidthClass),
    /// Native block smaller than the schema requires.
    NativeOutOfBounds { offset: usize, len: usize, size: usize },
    /// Length field holds more elements than the flexible array can store.
    CountExceedsCapacity {
        column: String,
        count: u64,
        capacity: usize,
    },
    /// Flexible array without a `Number` column before it.
    MissingLengthField { column: String },
    /// Composite arity beyond what an array header can frame.
    ArityTooLarge { arity: usize },
}

impl TranscodeError {
    /// Programming-level invariant violation, not meant to be retried.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedWidthClass(_) | Self::MissingLengthField { .. }
        )
    }
}

impl fmt::Display for TranscodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferExhausted { need, have } => {
                write!(f, "output buffer exhausted: need {} bytes, have {}", need, have)
            }
            Self::ShapeMismatch { expected, found } => {
                write!(f, "shape mismatch: expected {}, found {}", expected, found)
            }
            Self::Truncated { offset } => write!(f, "input truncated at offset {}", offset),
            Self::Malformed { offset, marker } => {
                write!(f, "malformed input: marker 0x{:02x} at offset {}", marker, offset)
            }
            Self::UnsupportedWidthClass(width) => {
                write!(f, "unsupported width class {}", width)
            }
            Self::NativeOutOfBounds { offset, len, size } => write!(
                f,
                "native access of {} bytes at offset {} outside block of {} bytes",
                len, offset, size
            ),
            Self::CountExceedsCapacity {
                column,
                count,
                capacity,
            } => write!(
                f,
                "flexible array {} count {} exceeds capacity {}",
                column, count, capacity
            ),
            Self::MissingLengthField { column } => {
                write!(f, "flexible array {} has no length field", column)
            }
            Self::ArityTooLarge { arity } => {
                write!(f, "composite arity {} exceeds u32::MAX", arity)
            }
        }
    }
}

impl std::error::Error for TranscodeError {}

impl From<WireError> for TranscodeError {
    fn from(e: WireError) -> Self {
        match e {
            WireError::BufferExhausted { need, have } => Self::BufferExhausted { need, have },
            WireError::Truncated { offset } => Self::Truncated { offset },
            WireError::Malformed { offset, marker } => Self::Malformed { offset, marker },
            WireError::UnexpectedShape { found, .. } => Self::ShapeMismatch {
                expected: "wire value".into(),
                found: found.to_string(),
            },
        }
    }
}

fn report(op: &str, object: &Object, err: &TranscodeError) {
    if err.is_fatal() {
        log::error!("[columns] {} {}: {}", op, object.name(), err);
    } else {
        log::debug!("[columns] {} {} failed: {}", op, object.name(), err);
    }
}

fn check_block(object: &Object, len: usize) -> Result<(), TranscodeError> {
    if len < object.size() {
        return Err(TranscodeError::NativeOutOfBounds {
            offset: 0,
            len: object.size(),
            size: len,
        });
    }
    Ok(())
}

/// Encode the native value in `source` into `out`.
///
/// Returns the number of bytes written. `source` must hold at least
/// `object.size()` bytes laid out as the record the schema describes.
pub fn encode(object: &Object, source: &[u8], out: &mut [u8]) -> Result<usize, TranscodeError> {
    let result = check_block(object, source.len()).and_then(|()| {
        let mut encoder = Encoder::new(source, out);
        walk::walk_object(&mut encoder, object, 0)?;
        Ok(encoder.finish())
    });
    if let Err(ref err) = result {
        report("encode", object, err);
    }
    result
}

/// Encode into a growing buffer, retrying on `BufferExhausted`.
pub fn encode_to_vec(object: &Object, source: &[u8]) -> Result<Vec<u8>, TranscodeError> {
    let mut capacity = object.size().max(64);
    loop {
        let mut buf = vec![0u8; capacity];
        match encode(object, source, &mut buf) {
            Ok(len) => {
                buf.truncate(len);
                return Ok(buf);
            }
            Err(TranscodeError::BufferExhausted { .. }) if capacity < usize::MAX / 2 => {
                capacity *= 2;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Decode one top-level wire value from the front of `input` into
/// `destination`.
///
/// Returns the number of bytes consumed, which may be less than
/// `input.len()`.
pub fn decode(
    object: &Object,
    destination: &mut [u8],
    input: &[u8],
) -> Result<usize, TranscodeError> {
    let result = check_block(object, destination.len()).and_then(|()| {
        let mut decoder = Decoder::new(destination, input);
        walk::walk_object(&mut decoder, object, 0)?;
        Ok(decoder.finish())
    });
    if let Err(ref err) = result {
        report("decode", object, err);
    }
    result
}
